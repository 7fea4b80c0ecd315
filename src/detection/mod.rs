// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Plant defect detection through a hosted vision model.
//!
//! One analysis captures the visible media (strokes included), sends it
//! with a fixed instruction, and reads the reply back as bounding boxes.
//! Any failure along the way ends in an empty result, which the UI shows
//! the same way as a healthy plant.

pub mod client;
pub mod prompt;
pub mod response;

use crate::compose::capture::capture_png;
use crate::models::bounding_box::{BoundingBox, DetectType};
use crate::models::stroke::Stroke;
use client::{GenerateRequest, GenerativeModel};
use image::RgbaImage;
use response::{parse_detections, ParseError};
use std::sync::Arc;

/// Failures of a single analysis.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no Gemini API key configured")]
    MissingApiKey,
    #[error("active media has no pixels")]
    EmptyMedia,
    #[error("failed to encode capture: {0}")]
    Capture(#[from] image::ImageError),
    #[error("request failed: {0}")]
    Transport(#[source] Box<ureq::Error>),
    #[error("failed to read response body: {0}")]
    ResponseBody(#[source] std::io::Error),
    #[error("model returned no text")]
    EmptyResponse,
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Snapshot of everything one analysis needs, taken on the UI thread.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub source: Arc<RgbaImage>,
    pub strokes: Vec<Stroke>,
    pub detect_type: DetectType,
    pub model: String,
    pub temperature: f32,
    pub max_dimension: u32,
}

/// Run one analysis, keeping the failure reason.
pub fn run_detection(
    request: &AnalysisRequest,
    model: &dyn GenerativeModel,
) -> Result<Vec<BoundingBox>, DetectionError> {
    if request.source.width() == 0 || request.source.height() == 0 {
        return Err(DetectionError::EmptyMedia);
    }
    let image_png = capture_png(&request.source, &request.strokes, request.max_dimension)?;

    let reply = model.generate(&GenerateRequest {
        model: request.model.clone(),
        instruction: prompt::instruction(request.detect_type).to_string(),
        image_png,
        temperature: request.temperature,
    })?;

    Ok(parse_detections(&reply)?)
}

/// Run one analysis; failures are logged and read as "no issues found".
pub fn analyze(request: &AnalysisRequest, model: Option<&dyn GenerativeModel>) -> Vec<BoundingBox> {
    let result = match model {
        Some(model) => run_detection(request, model),
        None => Err(DetectionError::MissingApiKey),
    };

    match result {
        Ok(boxes) => {
            log::info!("Analysis found {} issue(s)", boxes.len());
            boxes
        }
        Err(e) => {
            log::error!("Analysis failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stroke::{Point, PALETTE};
    use std::sync::Mutex;

    /// Replies with canned text and remembers what it was sent.
    struct FakeModel {
        reply: Result<String, ()>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl FakeModel {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl GenerativeModel for FakeModel {
        fn generate(&self, request: &GenerateRequest) -> Result<String, DetectionError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(|_| DetectionError::EmptyResponse)
        }
    }

    fn request(strokes: Vec<Stroke>) -> AnalysisRequest {
        AnalysisRequest {
            source: Arc::new(RgbaImage::new(1280, 720)),
            strokes,
            detect_type: DetectType::BoundingBoxes2d,
            model: "models/gemini-2.0-flash-exp".to_string(),
            temperature: 0.5,
            max_dimension: 640,
        }
    }

    #[test]
    fn test_successful_analysis() {
        let model = FakeModel::replying("```json\n[{\"box_2d\":[100,200,300,400],\"label\":\"wilting\"}]\n```");
        let boxes = analyze(&request(Vec::new()), Some(&model));
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].label, "wilting");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "models/gemini-2.0-flash-exp");
        assert!((seen[0].temperature - 0.5).abs() < 1e-6);
        let sent = image::load_from_memory(&seen[0].image_png).unwrap();
        assert_eq!((sent.width(), sent.height()), (640, 360));
    }

    #[test]
    fn test_unparsable_reply_is_kept_as_error_but_analyzes_to_empty() {
        let model = FakeModel::replying("not json");
        assert!(matches!(
            run_detection(&request(Vec::new()), &model),
            Err(DetectionError::Parse(ParseError::InvalidJson(_)))
        ));
        assert!(analyze(&request(Vec::new()), Some(&model)).is_empty());
    }

    #[test]
    fn test_empty_list_is_empty() {
        let model = FakeModel::replying("[]");
        assert!(run_detection(&request(Vec::new()), &model).unwrap().is_empty());
    }

    #[test]
    fn test_transport_failure_analyzes_to_empty() {
        let model = FakeModel::failing();
        assert!(analyze(&request(Vec::new()), Some(&model)).is_empty());
    }

    #[test]
    fn test_missing_key_analyzes_to_empty() {
        assert!(analyze(&request(Vec::new()), None).is_empty());
    }

    #[test]
    fn test_empty_media_never_reaches_model() {
        let model = FakeModel::replying("[]");
        let mut empty = request(Vec::new());
        empty.source = Arc::new(RgbaImage::new(0, 0));
        assert!(matches!(run_detection(&empty, &model), Err(DetectionError::EmptyMedia)));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_strokes_are_sent_with_the_image() {
        let mut stroke = Stroke::new(Point::new(0.1, 0.5), PALETTE[5]);
        stroke.push(Point::new(0.9, 0.5));
        let model = FakeModel::replying("[]");
        run_detection(&request(vec![stroke]), &model).unwrap();

        let seen = model.seen.lock().unwrap();
        let sent = image::load_from_memory(&seen[0].image_png).unwrap().to_rgba8();
        assert_eq!(sent.get_pixel(320, 180).0, [8, 161, 72, 255]);
        assert_eq!(sent.get_pixel(320, 20).0, [0, 0, 0, 0]);
    }
}
