//! Process configuration: completion-service settings and storage paths.
//!
//! Everything is read from the environment exactly once, at the boundary.
//! The rest of the crate only ever sees an explicit `CompletionConfig`.

use std::path::PathBuf;

use thiserror::Error;

pub const APP_NAME: &str = "docucheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model served by the completion endpoint unless overridden.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default OpenAI-compatible API base.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GROQ_API_KEY is not set; the completion service requires a credential")]
    MissingApiKey,
}

/// Completion-service configuration passed into roster construction.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
}

impl CompletionConfig {
    pub fn new(model: &str, api_key: &str, base_url: &str) -> Self {
        Self {
            model: model.to_string(),
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// `GROQ_API_KEY` is required; model and base URL fall back to the
    /// Groq defaults the service was built against.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = std::env::var("DOCUCHECK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("DOCUCHECK_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        Ok(Self {
            model,
            api_key,
            base_url,
        })
    }
}

/// Directory uploaded documents are written to and processed from.
pub fn upload_dir() -> PathBuf {
    std::env::var("DOCUCHECK_UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("uploaded_files"))
}

/// Tesseract traineddata directory.
/// Honors `TESSDATA_PREFIX`, falling back to the Debian/Ubuntu system path.
pub fn tessdata_dir() -> PathBuf {
    std::env::var("TESSDATA_PREFIX")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/usr/share/tesseract-ocr/5/tessdata"))
}

pub fn default_log_filter() -> String {
    format!("warn,{APP_NAME}=info")
}
