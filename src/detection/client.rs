// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Gemini `generateContent` client.

use super::DetectionError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything the remote model needs for one analysis.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub instruction: String,
    pub image_png: Vec<u8>,
    pub temperature: f32,
}

/// A hosted model that answers an image plus instruction with text.
pub trait GenerativeModel: Send {
    fn generate(&self, request: &GenerateRequest) -> Result<String, DetectionError>;
}

const HARM_CATEGORIES: [&str; 5] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_CIVIC_INTEGRITY",
];

const SAFETY_THRESHOLD: &str = "BLOCK_ONLY_HIGH";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiRequestContent<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting<'a>>,
}

#[derive(Serialize, Debug)]
struct GeminiRequestContent<'a> {
    role: &'a str,
    parts: Vec<GeminiRequestPart<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
enum GeminiRequestPart<'a> {
    Text(&'a str),
    InlineData(InlineData<'a>),
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize, Debug)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize, Debug)]
struct SafetySetting<'a> {
    category: &'a str,
    threshold: &'a str,
}

/// Gemini API response structures
#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Deserialize, Debug)]
struct GeminiPart {
    text: Option<String>,
}

impl<'a> GeminiRequest<'a> {
    fn new(request: &'a GenerateRequest) -> Self {
        Self {
            contents: vec![GeminiRequestContent {
                role: "user",
                parts: vec![
                    GeminiRequestPart::Text(&request.instruction),
                    GeminiRequestPart::InlineData(InlineData {
                        mime_type: "image/png",
                        data: BASE64.encode(&request.image_png),
                    }),
                ],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
            safety_settings: HARM_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let parts = self.candidates?.into_iter().next()?.content?.parts?;
        let text: String = parts.into_iter().filter_map(|part| part.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Blocking HTTP client for the Gemini API. Runs on a worker thread.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: String, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/{}:generateContent", self.api_base, model)
    }
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<String, DetectionError> {
        let url = self.endpoint(&request.model);
        log::info!(
            "Sending {} byte image to {} (temperature {:.2})",
            request.image_png.len(),
            request.model,
            request.temperature
        );

        let response = self
            .agent
            .post(&url)
            .set("x-goog-api-key", &self.api_key)
            .send_json(GeminiRequest::new(request))
            .map_err(|e| DetectionError::Transport(Box::new(e)))?;

        let body: GeminiResponse = response.into_json().map_err(DetectionError::ResponseBody)?;
        let text = body.text().ok_or(DetectionError::EmptyResponse)?;
        log::debug!("Model reply: {}", text.chars().take(500).collect::<String>());
        Ok(text)
    }
}
