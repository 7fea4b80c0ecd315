// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster composition: freehand strokes and the capture sent for analysis.

pub mod capture;
pub mod stroke;
