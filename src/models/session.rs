// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state shared by the UI components.
//!
//! All mutation goes through the methods below so that the canvas, the
//! prompt bar and the feedback panels always observe a consistent state:
//! boxes are replaced wholesale and media changes clear the annotations
//! that belonged to the previous media.

use super::bounding_box::{BoundingBox, DetectType};
use super::stroke::{Point, Stroke, StrokeColor, PALETTE};
use crate::util::geometry::MediaDimensions;
use image::RgbaImage;
use std::sync::Arc;

/// Hosted models the user can choose from.
pub const MODEL_OPTIONS: [&str; 2] = ["models/gemini-2.0-flash-exp", "models/gemini-1.5-flash"];

pub const TEMPERATURE_MIN: f32 = 0.0;
pub const TEMPERATURE_MAX: f32 = 2.0;
pub const TEMPERATURE_STEP: f32 = 0.05;

/// Where the active media came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Example,
    Upload,
    Camera,
}

/// The image (or latest camera frame) currently on the canvas.
#[derive(Debug, Clone)]
pub struct ActiveMedia {
    pub name: String,
    pub kind: MediaKind,
    pub raster: Arc<RgbaImage>,
}

impl ActiveMedia {
    pub fn new(name: impl Into<String>, kind: MediaKind, raster: RgbaImage) -> Self {
        Self {
            name: name.into(),
            kind,
            raster: Arc::new(raster),
        }
    }

    pub fn dimensions(&self) -> MediaDimensions {
        MediaDimensions {
            width: self.raster.width(),
            height: self.raster.height(),
        }
    }
}

/// What `finish_analysis` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisApplied {
    /// Boxes replaced with a non-empty set.
    Boxes(usize),
    /// Boxes cleared; the "looks healthy" notice is due.
    Healthy,
    /// The media changed while the request was in flight.
    Stale,
}

/// Application session state.
#[derive(Debug)]
pub struct Session {
    media: Option<ActiveMedia>,
    boxes: Vec<BoundingBox>,
    strokes: Vec<Stroke>,
    stroke_in_progress: bool,
    active_color: StrokeColor,
    model: String,
    temperature: f32,
    detect_type: DetectType,
    reveal_on_hover: bool,
    draw_mode: bool,
    is_uploaded: bool,
    busy: bool,
    /// Bumped whenever the media is replaced or the session is reset.
    epoch: u64,
    /// Bumped whenever the raster changes, including camera frames.
    media_revision: u64,
}

impl Session {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        let mut session = Self {
            media: None,
            boxes: Vec::new(),
            strokes: Vec::new(),
            stroke_in_progress: false,
            active_color: PALETTE[2],
            model: model.into(),
            temperature: TEMPERATURE_MIN,
            detect_type: DetectType::default(),
            reveal_on_hover: false,
            draw_mode: false,
            is_uploaded: false,
            busy: false,
            epoch: 0,
            media_revision: 0,
        };
        session.set_temperature(temperature);
        session
    }

    // --- media -----------------------------------------------------------

    pub fn media(&self) -> Option<&ActiveMedia> {
        self.media.as_ref()
    }

    pub fn media_dimensions(&self) -> Option<MediaDimensions> {
        self.media.as_ref().map(ActiveMedia::dimensions)
    }

    pub fn media_revision(&self) -> u64 {
        self.media_revision
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_uploaded(&self) -> bool {
        self.is_uploaded
    }

    /// Activate new media. Strokes and boxes of the previous media are dropped.
    pub fn set_media(&mut self, media: ActiveMedia) {
        self.is_uploaded = media.kind == MediaKind::Upload;
        self.media = Some(media);
        self.clear_annotations();
        self.epoch += 1;
        self.media_revision += 1;
    }

    /// Replace the raster of a live camera stream without touching annotations.
    pub fn update_frame(&mut self, raster: RgbaImage) {
        if let Some(media) = self.media.as_mut() {
            if media.kind == MediaKind::Camera {
                media.raster = Arc::new(raster);
                self.media_revision += 1;
            }
        }
    }

    /// Forget the active media, strokes, boxes and uploaded flag.
    ///
    /// Model, temperature and detect type are user preferences and survive.
    pub fn reset(&mut self) {
        self.media = None;
        self.is_uploaded = false;
        self.clear_annotations();
        self.epoch += 1;
        self.media_revision += 1;
    }

    fn clear_annotations(&mut self) {
        self.strokes.clear();
        self.stroke_in_progress = false;
        self.boxes.clear();
    }

    // --- detections ------------------------------------------------------

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn replace_boxes(&mut self, boxes: Vec<BoundingBox>) {
        self.boxes = boxes;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark a detection request as in flight.
    ///
    /// Returns the epoch the request belongs to, or `None` if another request
    /// is still outstanding or there is nothing to analyze.
    pub fn try_begin_analysis(&mut self) -> Option<u64> {
        if self.busy || self.media.is_none() {
            return None;
        }
        self.busy = true;
        Some(self.epoch)
    }

    /// Apply a finished detection request. Always clears the busy flag.
    pub fn finish_analysis(&mut self, epoch: u64, boxes: Vec<BoundingBox>) -> AnalysisApplied {
        self.busy = false;
        if epoch != self.epoch {
            return AnalysisApplied::Stale;
        }
        if boxes.is_empty() {
            self.boxes.clear();
            AnalysisApplied::Healthy
        } else {
            let count = boxes.len();
            self.replace_boxes(boxes);
            AnalysisApplied::Boxes(count)
        }
    }

    // --- strokes ---------------------------------------------------------

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn begin_stroke(&mut self, point: Point) {
        self.strokes.push(Stroke::new(point, self.active_color));
        self.stroke_in_progress = true;
    }

    pub fn extend_stroke(&mut self, point: Point) {
        if !self.stroke_in_progress {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(point);
        }
    }

    /// Finish the current gesture, returning the number of points recorded.
    pub fn end_stroke(&mut self) -> Option<usize> {
        if !std::mem::take(&mut self.stroke_in_progress) {
            return None;
        }
        self.strokes.last().map(Stroke::point_count)
    }

    pub fn clear_strokes(&mut self) {
        self.strokes.clear();
        self.stroke_in_progress = false;
    }

    // --- preferences -----------------------------------------------------

    pub fn active_color(&self) -> StrokeColor {
        self.active_color
    }

    pub fn set_active_color(&mut self, color: StrokeColor) {
        self.active_color = color;
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Clamp to the supported range and snap to the slider step.
    pub fn set_temperature(&mut self, temperature: f32) {
        let clamped = if temperature.is_finite() {
            temperature.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX)
        } else {
            TEMPERATURE_MIN
        };
        let snapped = (clamped / TEMPERATURE_STEP).round() * TEMPERATURE_STEP;
        self.temperature = snapped.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX);
    }

    pub fn detect_type(&self) -> DetectType {
        self.detect_type
    }

    pub fn set_detect_type(&mut self, detect_type: DetectType) {
        self.detect_type = detect_type;
    }

    pub fn reveal_on_hover(&self) -> bool {
        self.reveal_on_hover
    }

    pub fn set_reveal_on_hover(&mut self, enabled: bool) {
        self.reveal_on_hover = enabled;
    }

    pub fn draw_mode(&self) -> bool {
        self.draw_mode
    }

    pub fn set_draw_mode(&mut self, enabled: bool) {
        self.draw_mode = enabled;
        if !enabled {
            self.stroke_in_progress = false;
        }
    }
}
