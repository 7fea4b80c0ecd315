// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from an optional YAML file; the Gemini API key comes from
//! the environment or a token file and is never written to the config.

use crate::compose::capture::{MAX_DIMENSION, MAX_DIMENSION_LIMIT};
use crate::models::session::{MODEL_OPTIONS, TEMPERATURE_MAX, TEMPERATURE_MIN};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "HYDRO_CONFIG";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
const APP_DIR: &str = "hydro";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initially selected model.
    pub model: String,
    /// Initial sampling temperature.
    pub temperature: f32,
    /// Bound on the longer side of the image sent to the model.
    pub max_dimension: u32,
    pub api_base: String,
    pub request_timeout_secs: u64,
    /// Directory holding the bundled example images.
    pub examples_dir: PathBuf,
    /// How long transient notices stay on screen.
    pub notice_secs: f32,
    pub camera_index: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: MODEL_OPTIONS[0].to_string(),
            temperature: 0.5,
            max_dimension: MAX_DIMENSION,
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            request_timeout_secs: 60,
            examples_dir: PathBuf::from("assets/examples"),
            notice_secs: 3.0,
            camera_index: 0,
        }
    }
}

impl AppConfig {
    /// Read a config file, filling missing fields with defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config.validated())
    }

    /// Load the first config file found, or defaults when there is none.
    pub fn load() -> Self {
        let Some(path) = config_candidates().into_iter().find(|p| p.exists()) else {
            log::info!("No config file found, using defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Replace out-of-range values with usable ones.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !MODEL_OPTIONS.contains(&self.model.as_str()) {
            log::warn!("Unknown model {:?}, using {}", self.model, defaults.model);
            self.model = defaults.model;
        }
        if !(TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&self.temperature) {
            log::warn!("Temperature {} out of range, clamping", self.temperature);
            self.temperature = if self.temperature.is_finite() {
                self.temperature.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX)
            } else {
                defaults.temperature
            };
        }
        if self.max_dimension == 0 {
            log::warn!("max_dimension must be positive, using {}", defaults.max_dimension);
            self.max_dimension = defaults.max_dimension;
        } else if self.max_dimension > MAX_DIMENSION_LIMIT {
            log::warn!("max_dimension {} too large, clamping to {}", self.max_dimension, MAX_DIMENSION_LIMIT);
            self.max_dimension = MAX_DIMENSION_LIMIT;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = defaults.request_timeout_secs;
        }
        if !(self.notice_secs.is_finite() && self.notice_secs > 0.0) {
            self.notice_secs = defaults.notice_secs;
        }
        self
    }
}

fn config_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        paths.push(PathBuf::from(path));
    }
    paths.push(PathBuf::from("hydro.yaml"));
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(APP_DIR).join("config.yaml"));
    }
    paths
}

/// Resolve the Gemini API key from the environment or a token file.
pub fn load_api_key() -> Option<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            log::info!("Using Gemini API key from {}", API_KEY_ENV);
            return Some(key);
        }
    }

    let mut paths = vec![PathBuf::from("gemini_api_token.txt")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(APP_DIR).join("gemini_api_token.txt"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".gemini_api_token"));
    }

    let key = paths.iter().find_map(|path| read_token(path));
    if key.is_none() {
        log::warn!(
            "Gemini API key not found. Set {} or create gemini_api_token.txt.",
            API_KEY_ENV
        );
    }
    key
}

fn read_token(path: &Path) -> Option<String> {
    let token = std::fs::read_to_string(path).ok()?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    log::info!("Loaded Gemini API key from {}", path.display());
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("temperature: 1.25\nmodel: models/gemini-1.5-flash\n");
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.temperature, 1.25);
        assert_eq!(config.model, "models/gemini-1.5-flash");
        assert_eq!(config.max_dimension, 640);
        assert_eq!(config.examples_dir, PathBuf::from("assets/examples"));
    }

    #[test]
    fn test_invalid_values_are_replaced() {
        let file = write_config("temperature: 9.0\nmodel: gpt\nmax_dimension: 0\nnotice_secs: -1\n");
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.temperature, 2.0);
        assert_eq!(config.model, MODEL_OPTIONS[0]);
        assert_eq!(config.max_dimension, 640);
        assert_eq!(config.notice_secs, 3.0);
    }

    #[test]
    fn test_oversized_capture_is_clamped() {
        let file = write_config("max_dimension: 100000\n");
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_dimension, MAX_DIMENSION_LIMIT);

        let file = write_config("max_dimension: 1024\n");
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_dimension, 1024);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = write_config("temperature: [not, a, number]\n");
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_token_file_is_trimmed() {
        let file = write_config("  secret-key\n");
        assert_eq!(read_token(file.path()).as_deref(), Some("secret-key"));
        let empty = write_config("\n");
        assert_eq!(read_token(empty.path()), None);
    }
}
