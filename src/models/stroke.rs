// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Freehand stroke data structures.
//!
//! Strokes are recorded in normalized media coordinates so they survive
//! window resizes and can be replayed at any raster resolution.

use serde::{Deserialize, Serialize};

/// A 2D point with normalized coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One of the fixed brush colors offered by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeColor(pub [u8; 3]);

impl StrokeColor {
    pub fn rgba(self) -> [u8; 4] {
        let [r, g, b] = self.0;
        [r, g, b, 255]
    }
}

/// The drawing palette, in display order.
pub const PALETTE: [StrokeColor; 8] = [
    StrokeColor([0, 0, 0]),
    StrokeColor([255, 255, 255]),
    StrokeColor([213, 40, 40]),
    StrokeColor([250, 123, 23]),
    StrokeColor([240, 186, 17]),
    StrokeColor([8, 161, 72]),
    StrokeColor([26, 115, 232]),
    StrokeColor([161, 66, 244]),
];

/// A freehand stroke: the points of one drag gesture and its color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: StrokeColor,
}

impl Stroke {
    /// Start a stroke at the given point.
    pub fn new(start: Point, color: StrokeColor) -> Self {
        Self {
            points: vec![start],
            color,
        }
    }

    /// Append a point to the stroke.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Number of recorded points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}
