// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: detections, strokes, session state and remediation advice.

pub mod bounding_box;
pub mod remedies;
pub mod report;
pub mod session;
pub mod stroke;
