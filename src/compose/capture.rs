// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Flattening the visible media into the image sent for analysis.

use super::stroke::composite_strokes;
use crate::models::stroke::Stroke;
use image::imageops::{self, FilterType};
use image::{ImageFormat, ImageResult, RgbaImage};
use std::io::Cursor;

/// Default bound on the longer side of the captured image.
pub const MAX_DIMENSION: u32 = 640;

/// Largest configurable capture side.
pub const MAX_DIMENSION_LIMIT: u32 = 4096;

/// Size of the capture raster for a source of the given size.
///
/// The source is scaled so that it fits `max_dimension` on both axes. Small
/// sources are scaled up.
pub fn capture_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let scale = f64::min(
        max_dimension as f64 / width as f64,
        max_dimension as f64 / height as f64,
    );
    // Tolerate representation error so that exact fits are not truncated
    let scaled = |side: u32| ((side as f64 * scale + 1e-6).floor() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Scale the source and draw the strokes on top of it.
pub fn flatten(source: &RgbaImage, strokes: &[Stroke], max_dimension: u32) -> RgbaImage {
    let (width, height) = capture_size(source.width(), source.height(), max_dimension);
    let mut canvas = imageops::resize(source, width, height, FilterType::Triangle);
    if !strokes.is_empty() {
        composite_strokes(&mut canvas, strokes);
    }
    canvas
}

/// Encode a raster as PNG.
pub fn encode_png(raster: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Capture what the user sees, minus UI chrome, as PNG bytes.
pub fn capture_png(source: &RgbaImage, strokes: &[Stroke], max_dimension: u32) -> ImageResult<Vec<u8>> {
    let flattened = flatten(source, strokes, max_dimension);
    log::debug!(
        "Captured {}x{} frame with {} strokes",
        flattened.width(),
        flattened.height(),
        strokes.len()
    );
    encode_png(&flattened)
}
