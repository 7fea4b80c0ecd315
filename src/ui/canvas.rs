// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas for media display, freehand drawing and detection boxes.
//!
//! The media is letterboxed into the available area. Strokes and boxes are
//! stored in normalized coordinates and mapped onto the fitted image rect
//! every frame, so resizing the window never invalidates them.

use crate::app::AppEvent;
use crate::compose::stroke::BRUSH;
use crate::models::bounding_box::BoundingBox;
use crate::models::session::Session;
use crate::models::stroke::Stroke;
use crate::util::geometry::{
    fit_media, hovered_box, normalize_in_rect, ContainerDimensions, FitRect,
};

const BOX_COLOR: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);

/// Display the canvas and translate pointer gestures into events.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    texture: Option<&egui::TextureHandle>,
    events: &mut Vec<AppEvent>,
) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let status_height = ui.spacing().interact_size.y + 8.0;
    let canvas_size = ui.available_size() - egui::vec2(0.0, status_height);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(canvas_size);

        let (Some(texture), Some(dimensions)) = (texture, session.media_dimensions()) else {
            welcome(ui);
            return;
        };

        let origin = ui.min_rect().min;
        let container = ContainerDimensions {
            width: canvas_size.x,
            height: canvas_size.y,
        };
        let Some(fit) = fit_media(dimensions, container) else {
            return;
        };
        let image_rect = egui::Rect::from_min_size(
            origin + egui::vec2(fit.left, fit.top),
            egui::vec2(fit.width, fit.height),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let sense = if session.draw_mode() {
            egui::Sense::drag()
        } else {
            egui::Sense::hover()
        };
        let response = ui.allocate_rect(image_rect, sense);
        if session.draw_mode() {
            handle_drawing(&response, &image_rect, events);
        }

        let painter = ui.painter_at(image_rect);
        for stroke in session.strokes() {
            draw_stroke(&painter, stroke, &image_rect);
        }

        let pointer = ui.ctx().pointer_hover_pos();
        draw_boxes(ui, session.boxes(), &image_rect, pointer, session.reveal_on_hover());
    });

    status_line(ui, session);
}

fn handle_drawing(response: &egui::Response, image_rect: &egui::Rect, events: &mut Vec<AppEvent>) {
    if response.hovered() || response.dragged() {
        response.ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
    }

    let fit = screen_fit(image_rect);
    let to_media = |pos: egui::Pos2| {
        let pos = image_rect.clamp(pos);
        normalize_in_rect(pos.x, pos.y, &fit)
    };

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(AppEvent::StrokeBegin(to_media(pos)));
        }
    } else if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(AppEvent::StrokeExtend(to_media(pos)));
        }
    }
    if response.drag_stopped() {
        events.push(AppEvent::StrokeEnd);
    }
}

fn screen_fit(rect: &egui::Rect) -> FitRect {
    FitRect {
        width: rect.width(),
        height: rect.height(),
        top: rect.min.y,
        left: rect.min.x,
    }
}

fn to_screen(image_rect: &egui::Rect, x: f64, y: f64) -> egui::Pos2 {
    egui::pos2(
        image_rect.min.x + x as f32 * image_rect.width(),
        image_rect.min.y + y as f32 * image_rect.height(),
    )
}

fn draw_stroke(painter: &egui::Painter, stroke: &Stroke, image_rect: &egui::Rect) {
    let [r, g, b] = stroke.color.0;
    let color = egui::Color32::from_rgb(r, g, b);
    let width = BRUSH.size as f32;

    let points: Vec<egui::Pos2> = stroke
        .points
        .iter()
        .map(|p| to_screen(image_rect, p.x, p.y))
        .collect();

    // Round caps and joins
    for point in &points {
        painter.circle_filled(*point, width / 2.0, color);
    }
    if points.len() > 1 {
        painter.add(egui::Shape::line(points, egui::Stroke::new(width, color)));
    }
}

/// Screen rectangle of every box, in box order.
fn box_rects(boxes: &[BoundingBox], image_rect: &egui::Rect) -> Vec<egui::Rect> {
    boxes
        .iter()
        .map(|b| {
            egui::Rect::from_min_size(
                to_screen(image_rect, b.x, b.y),
                egui::vec2(
                    b.width as f32 * image_rect.width(),
                    b.height as f32 * image_rect.height(),
                ),
            )
        })
        .collect()
}

/// Indices of the boxes to draw and which of them is hovered.
fn visible_boxes(
    rects: &[egui::Rect],
    image_rect: &egui::Rect,
    pointer: Option<egui::Pos2>,
    reveal_on_hover: bool,
) -> (Vec<usize>, Option<usize>) {
    let hovered = pointer.and_then(|pos| {
        let fits: Vec<FitRect> = rects.iter().map(screen_fit).collect();
        hovered_box(pos.x, pos.y, &fits)
    });
    let over_media = pointer.is_some_and(|pos| image_rect.contains(pos));

    let visible = if reveal_on_hover && over_media {
        hovered.into_iter().collect()
    } else {
        (0..rects.len()).collect()
    };
    (visible, hovered)
}

fn draw_boxes(
    ui: &egui::Ui,
    boxes: &[BoundingBox],
    image_rect: &egui::Rect,
    pointer: Option<egui::Pos2>,
    reveal_on_hover: bool,
) {
    if boxes.is_empty() {
        return;
    }
    let rects = box_rects(boxes, image_rect);
    let (visible, hovered) = visible_boxes(&rects, image_rect, pointer, reveal_on_hover);

    let painter = ui.painter();
    for index in visible {
        let rect = rects[index];
        let width = if hovered == Some(index) { 3.0 } else { 2.0 };
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(width, BOX_COLOR));

        let galley = painter.layout_no_wrap(
            boxes[index].label.clone(),
            egui::FontId::proportional(13.0),
            egui::Color32::WHITE,
        );
        let tag = egui::Rect::from_min_size(rect.min, galley.size() + egui::vec2(8.0, 4.0));
        painter.rect_filled(tag, 0.0, BOX_COLOR);
        painter.galley(tag.min + egui::vec2(4.0, 2.0), galley, egui::Color32::WHITE);
    }
}

fn welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Hydro AI")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Plant Health Analyzer")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Pick an example, upload a photo or start the camera")
                    .color(egui::Color32::from_gray(180)),
            );
        });
    });
}

fn status_line(ui: &mut egui::Ui, session: &Session) {
    ui.separator();
    ui.horizontal(|ui| {
        match session.media() {
            Some(media) => {
                let dims = media.dimensions();
                ui.label(format!("{} ({}x{})", media.name, dims.width, dims.height));
            }
            None => {
                ui.label("No image loaded");
            }
        }
        ui.separator();
        ui.label(format!("Detections: {}", session.boxes().len()));
        if session.draw_mode() {
            ui.separator();
            ui.label("Drawing");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(400.0, 200.0))
    }

    fn boxes() -> Vec<BoundingBox> {
        vec![
            BoundingBox {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
                label: "wilting".to_string(),
            },
            BoundingBox {
                x: 0.25,
                y: 0.25,
                width: 0.25,
                height: 0.25,
                label: "leaf spots".to_string(),
            },
        ]
    }

    #[test]
    fn test_box_rects_map_onto_image() {
        let rects = box_rects(&boxes(), &image_rect());
        assert_eq!(rects[0], image_rect());
        assert_eq!(rects[1].min, egui::pos2(200.0, 100.0));
        assert_eq!(rects[1].size(), egui::vec2(100.0, 50.0));
    }

    #[test]
    fn test_nested_box_wins_hover() {
        let rects = box_rects(&boxes(), &image_rect());
        let pointer = Some(egui::pos2(250.0, 120.0));

        let (visible, hovered) = visible_boxes(&rects, &image_rect(), pointer, false);
        assert_eq!(hovered, Some(1));
        assert_eq!(visible, vec![0, 1]);

        let (visible, _) = visible_boxes(&rects, &image_rect(), pointer, true);
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn test_reveal_mode_shows_all_when_pointer_outside() {
        let rects = box_rects(&boxes(), &image_rect());
        let (visible, hovered) =
            visible_boxes(&rects, &image_rect(), Some(egui::pos2(10.0, 10.0)), true);
        assert_eq!(hovered, None);
        assert_eq!(visible, vec![0, 1]);

        let (visible, _) = visible_boxes(&rects, &image_rect(), None, true);
        assert_eq!(visible, vec![0, 1]);
    }
}
