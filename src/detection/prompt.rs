// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Instruction text sent alongside the captured image.

use crate::models::bounding_box::DetectType;

const BOUNDING_BOX_PROMPT: &str = "\
Detect defects in the hydroponic plant using 2-D bounding boxes. Focus exclusively on these plant health indicators:
  1. Leaf discoloration (yellowing, brown spots, or purple veins)
  2. Stunted growth or wilting (smaller-than-expected size or drooping)
  3. Curling/crisping leaf edges (upward/downward leaf curling or dry margins).

  IMPORTANT: Only mark genuine issues with high confidence. No overlapping bounding boxes.
  If the plant looks healthy, output an empty list: [].

  Output a JSON list with:
  - Either no issues, or one from the list above.
  - Each entry containing the 2D bounding box in \"box_2d\" as [ymin, xmin, ymax, xmax] coordinates, normalized to 0-1000.
  - A text label in \"label\" specifying the detected issue (e.g., 'yellowing leaves', 'wilting', 'curling edges', 'brown spots', 'purple veins', 'stunted growth').

  Format: [{\"box_2d\": [...], \"label\": ...}, ...]";

/// Instruction for the requested detect type.
pub fn instruction(detect_type: DetectType) -> &'static str {
    match detect_type {
        DetectType::BoundingBoxes2d => BOUNDING_BOX_PROMPT,
    }
}
