// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Remediation advice panels, one per detected issue.

use crate::models::remedies::Remedy;

pub fn show(ui: &mut egui::Ui, panels: &[(String, &'static Remedy)]) {
    for (index, (label, remedy)) in panels.iter().enumerate() {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.heading(format!("🔍 Plant Health Analysis: Issue {}", index + 1));
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(format!("⚠ {}", capitalize(label)))
                    .size(16.0)
                    .color(egui::Color32::from_rgb(239, 68, 68)),
            );
            ui.add_space(4.0);

            ui.label(egui::RichText::new("Cause:").weak());
            ui.label(remedy.cause);
            ui.add_space(4.0);

            ui.label(egui::RichText::new("Recommended Solution:").weak());
            ui.label(remedy.remedy);
            ui.add_space(4.0);

            ui.label(egui::RichText::new("Steps to Fix:").weak());
            for (step_index, step) in remedy.steps.iter().enumerate() {
                ui.label(format!("{}. {}", step_index + 1, step));
            }
        });
        ui.add_space(8.0);
    }
}

fn capitalize(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_each_word() {
        assert_eq!(capitalize("yellowing leaves"), "Yellowing Leaves");
        assert_eq!(capitalize("wilting"), "Wilting");
        assert_eq!(capitalize(""), "");
    }
}
