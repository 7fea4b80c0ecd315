// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image selection, detect type and drawing controls.
//!
//! This module provides the left-hand panel: the example image grid, the
//! upload and camera sources, the detect type selector and the freehand
//! drawing tools.

use crate::app::AppEvent;
use crate::io::media::{EXAMPLE_IMAGES, UPLOAD_EXTENSIONS};
use crate::models::bounding_box::DetectType;
use crate::models::session::Session;
use crate::models::stroke::PALETTE;
use std::path::PathBuf;

const GRID_COLUMNS: usize = 3;
const PREVIEW_SIZE: f32 = 72.0;

/// Open the native file picker for an image upload.
pub fn pick_upload() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &UPLOAD_EXTENSIONS)
        .pick_file()
}

/// Display the control panel.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    thumbnails: &[(&'static str, egui::TextureHandle)],
    camera_active: bool,
    events: &mut Vec<AppEvent>,
) {
    ui.add_space(8.0);
    ui.heading("📸 Image Selection");
    ui.add_space(4.0);
    example_grid(ui, session, thumbnails, events);

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("⬆ Upload Image").clicked() {
            if let Some(path) = pick_upload() {
                events.push(AppEvent::UploadImage(path));
            }
        }
        let camera_supported = cfg!(feature = "video-opencv");
        let (label, event) = if camera_active {
            ("⏹ Stop Camera", AppEvent::StopCamera)
        } else {
            ("🎥 Camera", AppEvent::StartCamera)
        };
        if ui
            .add_enabled(camera_supported, egui::Button::new(label))
            .on_disabled_hover_text("Built without camera support")
            .clicked()
        {
            events.push(event);
        }
    });
    if session.is_uploaded() {
        ui.label(egui::RichText::new("Using uploaded image").italics().weak());
    }

    ui.add_space(12.0);
    ui.separator();
    ui.heading("🎯 Detection Type");
    ui.label("Give me:");
    for detect_type in DetectType::ALL {
        if ui
            .radio(session.detect_type() == detect_type, detect_type.label())
            .clicked()
        {
            events.push(AppEvent::SetDetectType(detect_type));
        }
    }

    ui.add_space(12.0);
    ui.separator();
    drawing_controls(ui, session, events);
}

fn example_grid(
    ui: &mut egui::Ui,
    session: &Session,
    thumbnails: &[(&'static str, egui::TextureHandle)],
    events: &mut Vec<AppEvent>,
) {
    let active_name = session.media().map(|m| m.name.as_str());

    egui::Grid::new("example_images")
        .spacing(egui::vec2(6.0, 6.0))
        .show(ui, |ui| {
            for (index, name) in EXAMPLE_IMAGES.into_iter().enumerate() {
                let thumbnail = thumbnails.iter().find(|(n, _)| *n == name);
                let selected = active_name == Some(name);
                let response = match thumbnail {
                    Some((_, texture)) => {
                        let sized = egui::load::SizedTexture::new(
                            texture.id(),
                            fit_preview(texture.size_vec2()),
                        );
                        ui.add(egui::ImageButton::new(sized).selected(selected))
                    }
                    None => ui.add_sized(
                        [PREVIEW_SIZE, PREVIEW_SIZE],
                        egui::SelectableLabel::new(selected, name),
                    ),
                };
                if response.on_hover_text(name).clicked() {
                    events.push(AppEvent::SelectExample(name));
                }
                if index % GRID_COLUMNS == GRID_COLUMNS - 1 {
                    ui.end_row();
                }
            }
        });
}

/// Scale a preview so its longer side is `PREVIEW_SIZE`.
fn fit_preview(size: egui::Vec2) -> egui::Vec2 {
    let longest = size.x.max(size.y);
    if longest <= 0.0 {
        return egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE);
    }
    size * (PREVIEW_SIZE / longest)
}

fn drawing_controls(ui: &mut egui::Ui, session: &Session, events: &mut Vec<AppEvent>) {
    ui.heading("✏ Annotate");

    let mut draw_mode = session.draw_mode();
    if ui.toggle_value(&mut draw_mode, "Draw on image").changed() {
        events.push(AppEvent::SetDrawMode(draw_mode));
    }

    ui.add_enabled_ui(session.draw_mode(), |ui| {
        ui.horizontal_wrapped(|ui| {
            for color in PALETTE {
                let [r, g, b] = color.0;
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(22.0, 22.0), egui::Sense::click());
                let painter = ui.painter();
                painter.rect_filled(rect, 4.0, egui::Color32::from_rgb(r, g, b));
                if session.active_color() == color {
                    painter.rect_stroke(
                        rect.expand(2.0),
                        4.0,
                        egui::Stroke::new(2.0, egui::Color32::from_rgb(59, 130, 246)),
                    );
                }
                if response.clicked() {
                    events.push(AppEvent::SetColor(color));
                }
            }
        });
    });

    let has_strokes = !session.strokes().is_empty();
    if ui
        .add_enabled(has_strokes, egui::Button::new("Clear drawing"))
        .clicked()
    {
        events.push(AppEvent::ClearStrokes);
    }

    ui.add_space(8.0);
    let mut reveal = session.reveal_on_hover();
    if ui.checkbox(&mut reveal, "Reveal boxes on hover").changed() {
        events.push(AppEvent::SetRevealOnHover(reveal));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_preview_keeps_aspect() {
        let fitted = fit_preview(egui::vec2(96.0, 48.0));
        assert_eq!(fitted, egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE / 2.0));
        assert_eq!(fit_preview(egui::vec2(0.0, 0.0)), egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE));
    }
}
