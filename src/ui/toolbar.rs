// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Top bar: session reset, model selection and API key status.
//!
//! Laid out right to left inside the menu bar.

use crate::app::AppEvent;
use crate::models::session::{Session, MODEL_OPTIONS};

/// Display the top bar controls.
pub fn show(ui: &mut egui::Ui, session: &Session, has_api_key: bool, events: &mut Vec<AppEvent>) {
    ui.spacing_mut().item_spacing.x = 8.0;

    if has_api_key {
        ui.label(egui::RichText::new("● API key loaded").color(egui::Color32::from_rgb(74, 222, 128)));
    } else {
        ui.label(egui::RichText::new("● No API key").color(egui::Color32::from_rgb(248, 113, 113)))
            .on_hover_text("Set GEMINI_API_KEY or create gemini_api_token.txt");
    }

    ui.separator();

    let mut selected = session.model().to_string();
    egui::ComboBox::from_id_source("model_select")
        .selected_text(&selected)
        .show_ui(ui, |ui| {
            for model in MODEL_OPTIONS {
                ui.selectable_value(&mut selected, model.to_string(), model);
            }
        });
    if selected != session.model() {
        events.push(AppEvent::SetModel(selected));
    }

    ui.separator();

    if ui.button("Reset session").clicked() {
        events.push(AppEvent::ResetSession);
    }

    ui.separator();
    ui.label(
        egui::RichText::new("🌿 Hydro AI")
            .strong()
            .color(egui::Color32::from_rgb(74, 222, 128)),
    );
}
