// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Detection report serialization.
//!
//! This module handles exporting detection reports in YAML and JSON
//! formats, and reading them back.

use crate::models::report::DetectionReport;
use anyhow::{bail, Result};
use std::path::Path;

/// Export a report to YAML format.
pub fn export_yaml(data: &DetectionReport, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export a report to JSON format.
pub fn export_json(data: &DetectionReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export a report, picking the format from the file extension.
pub fn export_report(data: &DetectionReport, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

/// Import a report from YAML format.
pub fn import_yaml(path: &Path) -> Result<DetectionReport> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import a report from JSON format.
pub fn import_json(path: &Path) -> Result<DetectionReport> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Import a report, picking the format from the file extension.
pub fn import_report(path: &Path) -> Result<DetectionReport> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}
