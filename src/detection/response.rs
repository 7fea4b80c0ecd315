// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Turning the model's free-form reply into bounding boxes.

use crate::models::bounding_box::BoundingBox;
use serde::Deserialize;
use serde_json::Value;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Why a reply could not be read as a detection list.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("reply is JSON but not a list")]
    NotAnArray,
    #[error("malformed detection entry: {0}")]
    MalformedEntry(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RawDetection {
    box_2d: [f64; 4],
    label: String,
}

/// The JSON payload of a reply, with any code fence removed.
///
/// A ```` ```json ```` fence takes precedence over a plain one. An unterminated
/// fence runs to the end of the text.
pub fn extract_json(text: &str) -> &str {
    let body = if let Some((_, rest)) = text.split_once(JSON_FENCE) {
        rest
    } else if let Some((_, rest)) = text.split_once(FENCE) {
        rest
    } else {
        return text.trim();
    };
    body.split_once(FENCE).map_or(body, |(inner, _)| inner).trim()
}

/// Parse a reply into normalized boxes.
pub fn parse_detections(text: &str) -> Result<Vec<BoundingBox>, ParseError> {
    let value: Value = serde_json::from_str(extract_json(text)).map_err(ParseError::InvalidJson)?;
    if !value.is_array() {
        return Err(ParseError::NotAnArray);
    }
    let raw: Vec<RawDetection> = serde_json::from_value(value).map_err(ParseError::MalformedEntry)?;

    Ok(raw
        .into_iter()
        .map(|entry| BoundingBox::from_box_2d(entry.box_2d, entry.label))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"[{"box_2d":[100,200,300,400],"label":"wilting"}]"#;

    fn assert_wilting(boxes: &[BoundingBox]) {
        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        assert!((b.x - 0.2).abs() < 1e-9);
        assert!((b.y - 0.1).abs() < 1e-9);
        assert!((b.width - 0.2).abs() < 1e-9);
        assert!((b.height - 0.2).abs() < 1e-9);
        assert_eq!(b.label, "wilting");
    }

    #[test]
    fn test_plain_array() {
        assert_wilting(&parse_detections(SINGLE).unwrap());
    }

    #[test]
    fn test_json_fence_matches_plain() {
        let fenced = format!("```json\n{}\n```", SINGLE);
        assert_eq!(parse_detections(&fenced).unwrap(), parse_detections(SINGLE).unwrap());
    }

    #[test]
    fn test_generic_fence_and_surrounding_prose() {
        let fenced = format!("Here you go:\n```\n{}\n```\nLet me know!", SINGLE);
        assert_wilting(&parse_detections(&fenced).unwrap());
    }

    #[test]
    fn test_json_fence_wins_over_earlier_plain_fence() {
        let text = format!("```\nnot this\n```\n```json\n{}\n```", SINGLE);
        assert_wilting(&parse_detections(&text).unwrap());
    }

    #[test]
    fn test_unterminated_fence() {
        let text = format!("```json\n{}", SINGLE);
        assert_wilting(&parse_detections(&text).unwrap());
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_detections("[]").unwrap().is_empty());
        assert!(parse_detections("```json\n[]\n```").unwrap().is_empty());
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(parse_detections("not json"), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_not_an_array() {
        let text = r#"{"box_2d":[1,2,3,4],"label":"wilting"}"#;
        assert!(matches!(parse_detections(text), Err(ParseError::NotAnArray)));
    }

    #[test]
    fn test_malformed_entry() {
        let text = r#"[{"box_2d":[1,2,3],"label":"wilting"}]"#;
        assert!(matches!(parse_detections(text), Err(ParseError::MalformedEntry(_))));
        let text = r#"[{"box_2d":[1,2,3,4]}]"#;
        assert!(matches!(parse_detections(text), Err(ParseError::MalformedEntry(_))));
    }

    #[test]
    fn test_multiple_entries_keep_order() {
        let text = r#"[
            {"box_2d": [0, 0, 500, 500], "label": "yellowing leaves"},
            {"box_2d": [500, 500, 1000, 1000], "label": "brown spots"}
        ]"#;
        let boxes = parse_detections(text).unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].label, "yellowing leaves");
        assert!((boxes[1].x - 0.5).abs() < 1e-9);
        assert!((boxes[1].height - 0.5).abs() < 1e-9);
    }
}
