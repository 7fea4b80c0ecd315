// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hydro AI - Plant Health Analyzer
//!
//! A desktop application that sends plant photos or camera frames to a
//! Gemini vision model, draws the detected problem areas and suggests
//! remedies for each of them.

mod app;
mod compose;
mod config;
mod detection;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Hydro AI - Plant Health Analyzer"),
        ..Default::default()
    };

    eframe::run_native(
        "Hydro",
        options,
        Box::new(|_cc| Ok(Box::new(app::build()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
