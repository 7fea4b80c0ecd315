// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transient notice overlay.

use std::time::{Duration, Instant};

/// A message shown over the canvas until it expires.
#[derive(Debug, Clone)]
pub struct Notice {
    text: String,
    until: Instant,
}

impl Notice {
    pub fn new(text: impl Into<String>, seconds: f32) -> Self {
        Self {
            text: text.into(),
            until: Instant::now() + Duration::from_secs_f32(seconds.max(0.0)),
        }
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.until
    }

    pub fn remaining(&self) -> Duration {
        self.until.saturating_duration_since(Instant::now())
    }

    pub fn show(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("notice"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 64.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(egui::Color32::from_rgb(22, 101, 52))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(format!("🌿 {}", self.text))
                                .size(16.0)
                                .color(egui::Color32::WHITE),
                        );
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::new("healthy", 60.0);
        assert!(!notice.expired());
        assert!(notice.remaining() > Duration::from_secs(50));

        let gone = Notice::new("healthy", 0.0);
        assert!(gone.expired());
        assert_eq!(gone.remaining(), Duration::ZERO);
    }
}
