// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Freehand stroke outlining and rasterization.
//!
//! A stroke's centerline describes a closed outline polygon with round caps,
//! which smooths into a quadratic path (the vector form, logged as SVG).
//! On the raster the same shape is painted as a union of segment quads and
//! vertex discs, so self-crossing strokes stay solid.

use crate::models::stroke::Stroke;
use crate::util::geometry::denormalize_coordinates;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;
use std::f64::consts::PI;

/// Brush parameters. Thinning, smoothing and streamlining are all disabled,
/// so the outline keeps a constant width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushOptions {
    pub size: f64,
    /// Segments used for each half-circle cap.
    pub cap_segments: usize,
}

pub const BRUSH: BrushOptions = BrushOptions {
    size: 8.0,
    cap_segments: 8,
};

/// Closed outline polygon around a centerline given in pixel coordinates.
pub fn stroke_outline(points: &[(f64, f64)], options: &BrushOptions) -> Vec<(f64, f64)> {
    let radius = options.size / 2.0;
    let mut centerline: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for &point in points {
        if centerline.last() != Some(&point) {
            centerline.push(point);
        }
    }

    match centerline.len() {
        0 => Vec::new(),
        1 => circle(centerline[0], radius, options.cap_segments * 2),
        _ => outline_polyline(&centerline, radius, options.cap_segments),
    }
}

fn circle(center: (f64, f64), radius: f64, segments: usize) -> Vec<(f64, f64)> {
    (0..segments)
        .map(|i| {
            let t = 2.0 * PI * i as f64 / segments as f64;
            (center.0 + radius * t.cos(), center.1 + radius * t.sin())
        })
        .collect()
}

fn unit(from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    (dx / len, dy / len)
}

fn outline_polyline(centerline: &[(f64, f64)], radius: f64, cap_segments: usize) -> Vec<(f64, f64)> {
    let n = centerline.len();

    // Tangent at each point: segment direction at the ends, averaged inside.
    let tangents: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            if i == 0 {
                unit(centerline[0], centerline[1])
            } else if i == n - 1 {
                unit(centerline[n - 2], centerline[n - 1])
            } else {
                let a = unit(centerline[i - 1], centerline[i]);
                let b = unit(centerline[i], centerline[i + 1]);
                let sum = (a.0 + b.0, a.1 + b.1);
                let len = (sum.0 * sum.0 + sum.1 * sum.1).sqrt();
                if len < 1e-9 {
                    // Full reversal, fall back to the incoming direction
                    a
                } else {
                    (sum.0 / len, sum.1 / len)
                }
            }
        })
        .collect();

    let offset = |i: usize, side: f64| {
        let (tx, ty) = tangents[i];
        let (px, py) = centerline[i];
        (px - ty * radius * side, py + tx * radius * side)
    };

    // Cap around `center`, sweeping from the left side through `facing` to
    // the right side.
    let cap = |center: (f64, f64), tangent: (f64, f64), facing: f64| {
        let normal = (-tangent.1, tangent.0);
        (1..cap_segments)
            .map(move |k| {
                let t = PI * k as f64 / cap_segments as f64;
                let (c, s) = (t.cos(), t.sin() * facing);
                (
                    center.0 + radius * (c * normal.0 + s * tangent.0),
                    center.1 + radius * (c * normal.1 + s * tangent.1),
                )
            })
    };

    let mut outline = Vec::with_capacity(2 * n + 2 * cap_segments);
    outline.extend((0..n).map(|i| offset(i, 1.0)));
    outline.extend(cap(centerline[n - 1], tangents[n - 1], 1.0));
    outline.extend((0..n).rev().map(|i| offset(i, -1.0)));
    outline.extend(cap(centerline[0], tangents[0], -1.0).collect::<Vec<_>>().into_iter().rev());
    outline
}

/// One path command of a smoothed outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    QuadTo { cx: f64, cy: f64, x: f64, y: f64 },
    Close,
}

/// Closed quadratic path through the midpoints of an outline polygon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokePath {
    pub commands: Vec<PathCommand>,
}

impl StrokePath {
    /// Each polygon vertex becomes the control point of a curve ending at the
    /// midpoint of the following edge.
    pub fn from_outline(outline: &[(f64, f64)]) -> Self {
        let Some(&(x0, y0)) = outline.first() else {
            return Self::default();
        };

        let mut commands = Vec::with_capacity(outline.len() + 2);
        commands.push(PathCommand::MoveTo(x0, y0));
        for (i, &(x, y)) in outline.iter().enumerate() {
            let (nx, ny) = outline[(i + 1) % outline.len()];
            commands.push(PathCommand::QuadTo {
                cx: x,
                cy: y,
                x: (x + nx) / 2.0,
                y: (y + ny) / 2.0,
            });
        }
        commands.push(PathCommand::Close);
        Self { commands }
    }

    /// SVG path data for the outline.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        for command in &self.commands {
            if !svg.is_empty() {
                svg.push(' ');
            }
            let piece = match *command {
                PathCommand::MoveTo(x, y) => format!("M{:.2},{:.2}", x, y),
                PathCommand::QuadTo { cx, cy, x, y } => {
                    format!("Q{:.2},{:.2} {:.2},{:.2}", cx, cy, x, y)
                }
                PathCommand::Close => "Z".to_string(),
            };
            svg.push_str(&piece);
        }
        svg
    }
}

/// Centerline of a stroke scaled onto a `width` x `height` raster.
pub fn stroke_pixels(stroke: &Stroke, width: u32, height: u32) -> Vec<(f64, f64)> {
    stroke
        .points
        .iter()
        .map(|p| denormalize_coordinates(p, width, height))
        .collect()
}

/// Outline path of a stroke scaled onto a `width` x `height` raster.
pub fn stroke_path(stroke: &Stroke, width: u32, height: u32, options: &BrushOptions) -> StrokePath {
    StrokePath::from_outline(&stroke_outline(&stroke_pixels(stroke, width, height), options))
}

/// Paint a stroke onto the raster as overlapping pieces: a quad along every
/// centerline segment and a disc at every vertex.
///
/// The pieces are filled one at a time, so where a stroke crosses itself the
/// overlap stays painted (nonzero coverage) instead of cancelling out.
pub fn fill_stroke(canvas: &mut RgbaImage, points: &[(f64, f64)], options: &BrushOptions, color: Rgba<u8>) {
    let radius = options.size / 2.0;
    let mut centerline: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for &point in points {
        if centerline.last() != Some(&point) {
            centerline.push(point);
        }
    }

    for pair in centerline.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (tx, ty) = unit(a, b);
        let (nx, ny) = (-ty * radius, tx * radius);
        fill_convex(
            canvas,
            &[
                (a.0 + nx, a.1 + ny),
                (b.0 + nx, b.1 + ny),
                (b.0 - nx, b.1 - ny),
                (a.0 - nx, a.1 - ny),
            ],
            color,
        );
    }
    for &(x, y) in &centerline {
        draw_filled_circle_mut(
            canvas,
            (x.round() as i32, y.round() as i32),
            radius.round() as i32,
            color,
        );
    }
}

fn fill_convex(canvas: &mut RgbaImage, corners: &[(f64, f64)], color: Rgba<u8>) {
    let mut polygon: Vec<PixelPoint<i32>> = Vec::with_capacity(corners.len());
    for &(x, y) in corners {
        let point = PixelPoint::new(x.round() as i32, y.round() as i32);
        if polygon.last() != Some(&point) {
            polygon.push(point);
        }
    }
    // The rasterizer rejects an explicitly closed polygon
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    // Segments shorter than a pixel are covered by the vertex discs
    if polygon.len() < 3 {
        return;
    }
    draw_polygon_mut(canvas, &polygon, color);
}

/// Composite strokes onto the raster in recorded order.
pub fn composite_strokes(canvas: &mut RgbaImage, strokes: &[Stroke]) {
    let (width, height) = canvas.dimensions();
    for stroke in strokes {
        let pixels = stroke_pixels(stroke, width, height);
        if log::log_enabled!(log::Level::Trace) {
            let path = stroke_path(stroke, width, height, &BRUSH);
            log::trace!("Stroke path: {}", path.to_svg());
        }
        fill_stroke(canvas, &pixels, &BRUSH, Rgba(stroke.color.rgba()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stroke::{Point, StrokeColor, PALETTE};

    fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_single_point_outline_is_a_circle() {
        let outline = stroke_outline(&[(10.0, 10.0), (10.0, 10.0)], &BRUSH);
        assert_eq!(outline.len(), BRUSH.cap_segments * 2);
        for point in outline {
            assert!((distance(point, (10.0, 10.0)) - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_straight_outline_keeps_constant_width() {
        let outline = stroke_outline(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)], &BRUSH);
        // Left side runs forward at y = +4, right side backward at y = -4
        assert_eq!(outline[0], (0.0, 4.0));
        assert_eq!(outline[2], (100.0, 4.0));
        let right_start = 3 + BRUSH.cap_segments - 1;
        assert!((outline[right_start].1 + 4.0).abs() < 1e-9);
        assert!((outline[right_start].0 - 100.0).abs() < 1e-9);
        // Every vertex stays within the brush radius of the centerline
        for &(x, y) in &outline {
            let nearest_x = x.clamp(0.0, 100.0);
            assert!(distance((x, y), (nearest_x, 0.0)) <= 4.0 + 1e-9);
        }
        // Caps reach past both ends
        assert!(outline.iter().any(|&(x, _)| x > 103.9));
        assert!(outline.iter().any(|&(x, _)| x < -3.9));
    }

    #[test]
    fn test_empty_stroke_has_no_outline() {
        assert!(stroke_outline(&[], &BRUSH).is_empty());
        assert!(StrokePath::from_outline(&[]).commands.is_empty());
    }

    #[test]
    fn test_svg_path_uses_midpoints() {
        let path = StrokePath::from_outline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(
            path.to_svg(),
            "M0.00,0.00 Q0.00,0.00 5.00,0.00 Q10.00,0.00 10.00,5.00 Q10.00,10.00 5.00,5.00 Z"
        );
    }

    #[test]
    fn test_composite_paints_stroke_color() {
        let mut canvas = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let mut stroke = Stroke::new(Point::new(0.2, 0.5), PALETTE[2]);
        stroke.push(Point::new(0.8, 0.5));
        composite_strokes(&mut canvas, &[stroke]);

        assert_eq!(canvas.get_pixel(50, 50).0, [213, 40, 40, 255]);
        assert_eq!(canvas.get_pixel(50, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_later_strokes_draw_on_top() {
        let mut canvas = RgbaImage::new(60, 60);
        let horizontal = {
            let mut s = Stroke::new(Point::new(0.1, 0.5), StrokeColor([1, 2, 3]));
            s.push(Point::new(0.9, 0.5));
            s
        };
        let vertical = {
            let mut s = Stroke::new(Point::new(0.5, 0.1), StrokeColor([9, 8, 7]));
            s.push(Point::new(0.5, 0.9));
            s
        };
        composite_strokes(&mut canvas, &[horizontal, vertical]);
        assert_eq!(canvas.get_pixel(30, 30).0, [9, 8, 7, 255]);
    }

    #[test]
    fn test_self_crossing_stroke_stays_solid() {
        let mut canvas = RgbaImage::new(100, 100);
        let mut stroke = Stroke::new(Point::new(0.2, 0.5), StrokeColor([9, 9, 9]));
        for (x, y) in [(0.8, 0.5), (0.8, 0.8), (0.5, 0.8), (0.5, 0.2)] {
            stroke.push(Point::new(x, y));
        }
        composite_strokes(&mut canvas, &[stroke]);

        assert_eq!(canvas.get_pixel(30, 50).0, [9, 9, 9, 255]);
        assert_eq!(canvas.get_pixel(50, 30).0, [9, 9, 9, 255]);
        // Covered by both the first and the last segment
        assert_eq!(canvas.get_pixel(50, 50).0, [9, 9, 9, 255]);
        assert_eq!(canvas.get_pixel(65, 65).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_single_point_stroke_paints_a_dot() {
        let mut canvas = RgbaImage::new(20, 20);
        fill_stroke(&mut canvas, &[(10.0, 10.0), (10.0, 10.0)], &BRUSH, Rgba([1, 1, 1, 255]));
        assert_eq!(canvas.get_pixel(10, 10).0, [1, 1, 1, 255]);
        assert_eq!(canvas.get_pixel(12, 10).0, [1, 1, 1, 255]);
        assert_eq!(canvas.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }
}
