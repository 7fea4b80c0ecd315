// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analyze button and sensitivity control.

use crate::app::AppEvent;
use crate::models::session::{Session, TEMPERATURE_MAX, TEMPERATURE_MIN, TEMPERATURE_STEP};

/// Display the prompt bar. Both controls are disabled while a request is
/// in flight.
pub fn show(ui: &mut egui::Ui, session: &Session, events: &mut Vec<AppEvent>) {
    let busy = session.is_busy();
    let can_analyze = !busy && session.media().is_some();

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let label = if busy { "Analyzing..." } else { "🔍 Analyze Image" };
        let button = egui::Button::new(egui::RichText::new(label).size(16.0))
            .min_size(egui::vec2(180.0, 36.0));
        if ui.add_enabled(can_analyze, button).clicked() {
            events.push(AppEvent::Analyze);
        }
        if busy {
            ui.spinner();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let mut temperature = session.temperature();
            ui.label(format!("{:.2}", temperature));
            let slider = egui::Slider::new(&mut temperature, TEMPERATURE_MIN..=TEMPERATURE_MAX)
                .step_by(TEMPERATURE_STEP as f64)
                .show_value(false);
            if ui.add_enabled(!busy, slider).changed() {
                events.push(AppEvent::SetTemperature(temperature));
            }
            ui.label("Sensitivity:");
        });
    });
    ui.add_space(6.0);
}
