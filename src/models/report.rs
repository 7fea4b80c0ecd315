// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Exportable record of one detection result.

use super::bounding_box::BoundingBox;
use serde::{Deserialize, Serialize};

/// Detections together with the settings that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub media_file: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub model: String,
    pub temperature: f32,
    pub detections: Vec<BoundingBox>,
}
