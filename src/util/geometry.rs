// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module letterboxes media into the canvas viewport, converts between
//! screen and normalized media coordinates, and resolves which detection box
//! the pointer is hovering.

use crate::models::stroke::Point;

/// Intrinsic pixel size of the active image or camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaDimensions {
    pub width: u32,
    pub height: u32,
}

/// Observed size of the rendering viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerDimensions {
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned rectangle in pixels, measured from the container origin
/// (or the screen origin for hover tests).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub width: f32,
    pub height: f32,
    pub top: f32,
    pub left: f32,
}

impl FitRect {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Strict containment: points on an edge are outside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.left && x < self.left + self.width && y > self.top && y < self.top + self.height
    }
}

/// Largest rectangle with the media's aspect ratio that fits the container,
/// centered on both axes.
///
/// Returns `None` while either size is still unknown (zero).
pub fn fit_media(media: MediaDimensions, container: ContainerDimensions) -> Option<FitRect> {
    if media.width == 0 || media.height == 0 {
        return None;
    }
    if !(container.width > 0.0 && container.height > 0.0)
        || !container.width.is_finite()
        || !container.height.is_finite()
    {
        return None;
    }

    let aspect_ratio = media.width as f32 / media.height as f32;
    let container_aspect_ratio = container.width / container.height;

    let (width, height) = if aspect_ratio > container_aspect_ratio {
        // Media is wider - fit to width
        (container.width, container.width / aspect_ratio)
    } else {
        // Media is taller - fit to height
        (container.height * aspect_ratio, container.height)
    };

    Some(FitRect {
        width,
        height,
        top: (container.height - height) / 2.0,
        left: (container.width - width) / 2.0,
    })
}

/// Index of the hovered rectangle, if any.
///
/// `rects[i]` is the on-screen rectangle of the i-th detection. When boxes
/// overlap the smallest one wins, so nested boxes stay reachable.
pub fn hovered_box(pointer_x: f32, pointer_y: f32, rects: &[FitRect]) -> Option<usize> {
    let mut by_area: Vec<(usize, &FitRect)> = rects.iter().enumerate().collect();
    // Sort smallest to largest
    by_area.sort_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()));

    by_area
        .into_iter()
        .find(|(_, rect)| rect.contains(pointer_x, pointer_y))
        .map(|(index, _)| index)
}

/// Convert a position inside a fit rectangle to normalized media coordinates.
pub fn normalize_in_rect(x: f32, y: f32, rect: &FitRect) -> Point {
    Point {
        x: ((x - rect.left) / rect.width) as f64,
        y: ((y - rect.top) / rect.height) as f64,
    }
}

/// Convert normalized media coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (f64, f64) {
    (point.x * width as f64, point.y * height as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(width: u32, height: u32) -> MediaDimensions {
        MediaDimensions { width, height }
    }

    fn container(width: f32, height: f32) -> ContainerDimensions {
        ContainerDimensions { width, height }
    }

    fn rect(left: f32, top: f32, width: f32, height: f32) -> FitRect {
        FitRect {
            width,
            height,
            top,
            left,
        }
    }

    #[test]
    fn test_fit_wide_media_letterboxes_vertically() {
        let fit = fit_media(media(1920, 1080), container(800.0, 800.0)).unwrap();
        assert_eq!(fit.width, 800.0);
        assert!((fit.height - 450.0).abs() < 0.001);
        assert_eq!(fit.left, 0.0);
        assert!((fit.top - 175.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_tall_media_pillarboxes() {
        let fit = fit_media(media(500, 1000), container(800.0, 600.0)).unwrap();
        assert_eq!(fit.height, 600.0);
        assert!((fit.width - 300.0).abs() < 0.001);
        assert!((fit.left - 250.0).abs() < 0.001);
        assert_eq!(fit.top, 0.0);
    }

    #[test]
    fn test_fit_preserves_aspect_and_stays_inside() {
        let medias = [(640, 480), (480, 640), (1, 1), (4000, 3), (7, 3000), (1280, 720)];
        let containers = [(800.0, 600.0), (320.0, 1000.0), (1.0, 1.0), (1234.5, 77.25)];

        for &(mw, mh) in &medias {
            for &(cw, ch) in &containers {
                let fit = fit_media(media(mw, mh), container(cw, ch)).unwrap();
                let ar = mw as f32 / mh as f32;
                assert!(((fit.width / fit.height) - ar).abs() / ar < 1e-3);
                assert!(fit.left >= -1e-3 && fit.top >= -1e-3);
                assert!(fit.left + fit.width <= cw + 1e-3);
                assert!(fit.top + fit.height <= ch + 1e-3);
                // Touches the container on at least one axis
                assert!((fit.width - cw).abs() < 1e-3 || (fit.height - ch).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_fit_unknown_dimensions() {
        assert!(fit_media(media(0, 100), container(800.0, 600.0)).is_none());
        assert!(fit_media(media(100, 100), container(0.0, 600.0)).is_none());
        assert!(fit_media(media(100, 100), container(800.0, 0.0)).is_none());
    }

    #[test]
    fn test_hover_prefers_nested_box() {
        // R2 (area 400) listed first, R1 (area 100) nested inside it
        let rects = [rect(0.0, 0.0, 20.0, 20.0), rect(5.0, 5.0, 10.0, 10.0)];
        assert_eq!(hovered_box(10.0, 10.0, &rects), Some(1));
        assert_eq!(hovered_box(2.0, 2.0, &rects), Some(0));
    }

    #[test]
    fn test_hover_misses_and_edges() {
        let rects = [rect(10.0, 10.0, 10.0, 10.0)];
        assert_eq!(hovered_box(5.0, 5.0, &rects), None);
        // Edges are exclusive
        assert_eq!(hovered_box(10.0, 15.0, &rects), None);
        assert_eq!(hovered_box(20.0, 15.0, &rects), None);
        assert_eq!(hovered_box(15.0, 15.0, &[]), None);
    }

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let fit = rect(100.0, 50.0, 640.0, 480.0);
        let point = normalize_in_rect(420.0, 290.0, &fit);
        assert!((point.x - 0.5).abs() < 1e-6);
        assert!((point.y - 0.5).abs() < 1e-6);

        let (px, py) = denormalize_coordinates(&point, 1920, 1080);
        assert!((px - 960.0).abs() < 0.001);
        assert!((py - 540.0).abs() < 0.001);
    }
}
