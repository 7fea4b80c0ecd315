// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Detected defect regions.

use serde::{Deserialize, Serialize};

/// A labeled detection rectangle in normalized media coordinates.
///
/// The origin is the top-left corner of the media and all four geometry
/// fields are fractions of the media width or height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

impl BoundingBox {
    /// Build a box from model output on the 0-1000 scale, ordered
    /// `[ymin, xmin, ymax, xmax]`.
    pub fn from_box_2d(box_2d: [f64; 4], label: String) -> Self {
        let [ymin, xmin, ymax, xmax] = box_2d;
        Self {
            x: xmin / 1000.0,
            y: ymin / 1000.0,
            width: (xmax - xmin) / 1000.0,
            height: (ymax - ymin) / 1000.0,
            label,
        }
    }
}

/// Kind of annotation requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectType {
    #[default]
    BoundingBoxes2d,
}

impl DetectType {
    pub const ALL: [DetectType; 1] = [DetectType::BoundingBoxes2d];

    pub fn label(self) -> &'static str {
        match self {
            DetectType::BoundingBoxes2d => "2D bounding boxes",
        }
    }
}
