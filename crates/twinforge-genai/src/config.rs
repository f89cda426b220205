//! Configuration for the generation service.
//!
//! Deserialized as the `generation` section of the server configuration.
//! Every field has a default so an empty section selects Gemini with the
//! fast and reasoning models the platform was tuned against.

use std::path::PathBuf;

use serde::Deserialize;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for twin synthesis.
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.5-flash";

/// Default model for optimization and file analysis.
pub const DEFAULT_REASONING_MODEL: &str = "gemini-2.5-pro";

/// Which provider API the service talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Google Gemini `generateContent` API.
    #[default]
    Gemini,
    /// `OpenAI`-compatible chat completions (works with `DeepSeek` and Ollama).
    #[serde(alias = "deepseek", alias = "ollama")]
    OpenAi,
}

/// Connection and model settings for the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Provider API flavour.
    pub backend: BackendType,
    /// Base API URL, without a trailing slash.
    pub api_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Model used for twin synthesis.
    pub fast_model: String,
    /// Model used for optimization and file analysis.
    pub reasoning_model: String,
    /// Directory of prompt templates overriding the compiled-in ones.
    pub prompts_dir: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Gemini,
            api_url: DEFAULT_GEMINI_API_URL.to_owned(),
            api_key: String::new(),
            fast_model: DEFAULT_FAST_MODEL.to_owned(),
            reasoning_model: DEFAULT_REASONING_MODEL.to_owned(),
            prompts_dir: None,
        }
    }
}
