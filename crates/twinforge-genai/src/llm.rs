//! Model provider backends.
//!
//! Enum dispatch over the supported provider APIs, avoiding the
//! dyn-compatibility issues with async trait methods. Every backend sends
//! a system and user message plus a JSON response schema, and returns the
//! raw model text. Decoding that text is the caller's job.

use serde_json::{Value, json};
use tracing::debug;

use crate::config::{BackendType, GenerationConfig};
use crate::error::LlmError;
use crate::prompt::RenderedPrompt;
use crate::schema::ResponseSchema;

// ---------------------------------------------------------------------------
// Unified backend enum
// ---------------------------------------------------------------------------

/// A model provider that turns a prompt into JSON text.
pub enum LlmBackend {
    /// Google Gemini `generateContent`.
    Gemini(GeminiBackend),
    /// `OpenAI`-compatible chat completions.
    OpenAi(OpenAiBackend),
}

impl LlmBackend {
    /// Send `prompt` to `model`, constraining the answer to `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the request fails, the provider answers with
    /// a non-success status, or the envelope holds no model text.
    pub async fn complete(
        &self,
        model: &str,
        prompt: &RenderedPrompt,
        schema: &ResponseSchema,
    ) -> Result<String, LlmError> {
        match self {
            Self::Gemini(backend) => backend.complete(model, prompt, schema).await,
            Self::OpenAi(backend) => backend.complete(model, prompt, schema).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::OpenAi(_) => "openai-compatible",
        }
    }
}

/// Send `body` as JSON and return the decoded response envelope.
async fn post_json(
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<Value, LlmError> {
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        return Err(LlmError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}

// ---------------------------------------------------------------------------
// Gemini backend
// ---------------------------------------------------------------------------

/// Backend for the Gemini `generateContent` API.
///
/// - Authenticates with the `x-goog-api-key` header
/// - The system prompt is a top-level `systemInstruction`
/// - JSON output is requested via `generationConfig.responseSchema`
/// - Model text lives at `candidates[0].content.parts[0].text`
pub struct GeminiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a Gemini backend.
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &RenderedPrompt,
        schema: &ResponseSchema,
    ) -> Result<String, LlmError> {
        let url = format!("{}/models/{model}:generateContent", self.api_url);
        debug!(%url, schema = schema.name, "calling gemini");

        let body = json!({
            "systemInstruction": {"parts": [{"text": prompt.system}]},
            "contents": [
                {"role": "user", "parts": [{"text": prompt.user}]}
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema.schema,
            }
        });

        let request = self.client.post(&url).header("x-goog-api-key", &self.api_key);
        let envelope = post_json(request, &body).await?;
        extract_gemini_content(&envelope)
    }
}

/// Extract the model text from a Gemini `generateContent` response.
fn extract_gemini_content(json: &Value) -> Result<String, LlmError> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(LlmError::MissingContent(
            "candidates[0].content.parts[0].text",
        ))
}

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Backend for `OpenAI`-compatible chat completions APIs.
///
/// Sends requests to `{api_url}/chat/completions` with a `json_schema`
/// response format.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl OpenAiBackend {
    /// Create an `OpenAI`-compatible backend.
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &RenderedPrompt,
        schema: &ResponseSchema,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.api_url);
        debug!(%url, schema = schema.name, "calling openai-compatible backend");

        let body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": schema.name, "schema": schema.schema}
            }
        });

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key));
        let envelope = post_json(request, &body).await?;
        extract_openai_content(&envelope)
    }
}

/// Extract the model text from an `OpenAI` chat completions response.
fn extract_openai_content(json: &Value) -> Result<String, LlmError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(LlmError::MissingContent("choices[0].message.content"))
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create a backend from configuration.
pub fn create_backend(config: &GenerationConfig) -> LlmBackend {
    match config.backend {
        BackendType::Gemini => LlmBackend::Gemini(GeminiBackend::new(config)),
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
    }
}
