//! The generation service: three typed operations over a model provider.
//!
//! Callers never see prompts, schemas or provider envelopes. Each
//! operation renders its prompt, makes exactly one provider call, and
//! decodes the answer into a `twinforge-types` value. Input problems are
//! rejected before any call is made. Nothing is retried.

use std::collections::BTreeMap;
use std::time::Instant;

use minijinja::context;
use rand::Rng;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use twinforge_types::{
    DigitalTwin, FileAnalysis, GeneratedProperties, GenerationStatus, ModelGeneration,
    TwinGeneration, TwinGenerationRequest, TwinOptimization, TwinType,
};

use crate::config::GenerationConfig;
use crate::error::{GenAiError, LlmError, Operation};
use crate::llm::{LlmBackend, create_backend};
use crate::parse::decode;
use crate::prompt::{PromptEngine, RenderedPrompt};
use crate::schema::{RawTwin, ResponseSchema, analysis_schema, optimization_schema, twin_schema};

/// Largest number of bytes of a text upload shown to the model.
pub const PREVIEW_LIMIT_BYTES: usize = 2048;

/// Range of the estimated model build time, in minutes.
const ESTIMATED_MINUTES: core::ops::Range<u32> = 5..15;

/// Typed façade over a model provider.
pub struct GenerationService {
    backend: LlmBackend,
    prompts: PromptEngine,
    fast_model: String,
    reasoning_model: String,
}

impl GenerationService {
    /// Build the service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Template`] if the prompt templates cannot be
    /// loaded.
    pub fn new(config: &GenerationConfig) -> Result<Self, GenAiError> {
        let prompts = match &config.prompts_dir {
            Some(dir) => PromptEngine::from_dir(dir)?,
            None => PromptEngine::builtin()?,
        };
        if config.api_key.is_empty() {
            warn!("no generation API key configured, the provider may reject calls");
        }
        Ok(Self::from_parts(
            create_backend(config),
            prompts,
            config.fast_model.clone(),
            config.reasoning_model.clone(),
        ))
    }

    /// Assemble a service from an existing backend and prompt engine.
    pub const fn from_parts(
        backend: LlmBackend,
        prompts: PromptEngine,
        fast_model: String,
        reasoning_model: String,
    ) -> Self {
        Self {
            backend,
            prompts,
            fast_model,
            reasoning_model,
        }
    }

    /// Name of the provider backend, for logging and the status page.
    pub const fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Synthesize a twin from a natural-language prompt.
    ///
    /// # Errors
    ///
    /// - [`GenAiError::InvalidRequest`] if the prompt is blank or the type
    ///   is missing. No provider call is made.
    /// - [`GenAiError::GenerationFailed`] if the call or decoding fails.
    pub async fn generate_twin(
        &self,
        request: &TwinGenerationRequest,
    ) -> Result<TwinGeneration, GenAiError> {
        let prompt = request.prompt.trim();
        let requested_type = match request.twin_type {
            Some(twin_type) if !prompt.is_empty() => twin_type,
            _ => {
                return Err(GenAiError::InvalidRequest(
                    "prompt and type are required".to_owned(),
                ));
            }
        };

        let specifications = request
            .specifications
            .as_ref()
            .and_then(|spec| serde_json::to_string(spec).ok());
        let rendered = self.prompts.render(
            Operation::GenerateTwin,
            &context! {
                prompt => prompt,
                twin_type => requested_type.as_str(),
                specifications => specifications,
            },
        )?;

        let raw: RawTwin = self
            .call(Operation::GenerateTwin, &self.fast_model, &rendered, &twin_schema())
            .await?;

        let twin_type = raw
            .twin_type
            .as_deref()
            .and_then(|t| t.parse::<TwinType>().ok())
            .unwrap_or(requested_type);
        let estimated_time = rand::rng().random_range(ESTIMATED_MINUTES);

        Ok(TwinGeneration {
            name: raw.name,
            description: raw.description,
            twin_type,
            properties: GeneratedProperties {
                dimensions: raw.dimensions,
                materials: raw.materials,
                features: raw.features,
                specifications: BTreeMap::new(),
            },
            model_generation: ModelGeneration {
                status: GenerationStatus::Processing,
                estimated_time,
                progress: 0,
            },
        })
    }

    /// Suggest optimizations of `twin` for `use_case`.
    ///
    /// # Errors
    ///
    /// - [`GenAiError::InvalidRequest`] if the use case is blank. No
    ///   provider call is made.
    /// - [`GenAiError::GenerationFailed`] if the call or decoding fails.
    pub async fn optimize_twin(
        &self,
        twin: &DigitalTwin,
        use_case: &str,
    ) -> Result<TwinOptimization, GenAiError> {
        let use_case = use_case.trim();
        if use_case.is_empty() {
            return Err(GenAiError::InvalidRequest("useCase is required".to_owned()));
        }

        let properties = twin
            .properties
            .as_ref()
            .and_then(|p| serde_json::to_string(p).ok());
        let rendered = self.prompts.render(
            Operation::OptimizeTwin,
            &context! {
                use_case => use_case,
                twin_name => &twin.name,
                twin_type => twin.twin_type.as_str(),
                twin_description => &twin.description,
                twin_properties => properties,
            },
        )?;

        self.call(
            Operation::OptimizeTwin,
            &self.reasoning_model,
            &rendered,
            &optimization_schema(),
        )
        .await
    }

    /// Analyze an uploaded file.
    ///
    /// Only the file's metadata and, for textual files, a short preview
    /// reach the model. Size limits are enforced by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::GenerationFailed`] if the call or decoding
    /// fails.
    pub async fn analyze_file(
        &self,
        bytes: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<FileAnalysis, GenAiError> {
        let rendered = self.prompts.render(
            Operation::AnalyzeFile,
            &context! {
                file_name => file_name,
                mime_type => mime_type,
                size_bytes => bytes.len(),
                preview => text_preview(bytes, mime_type),
            },
        )?;

        self.call(
            Operation::AnalyzeFile,
            &self.reasoning_model,
            &rendered,
            &analysis_schema(),
        )
        .await
    }

    /// Make one provider call and decode the answer.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        model: &str,
        prompt: &RenderedPrompt,
        schema: &ResponseSchema,
    ) -> Result<T, GenAiError> {
        let started = Instant::now();
        debug!(%operation, model, backend = self.backend.name(), "calling model provider");

        let outcome = match self.backend.complete(model, prompt, schema).await {
            Ok(text) => decode::<T>(&text).map_err(LlmError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(value) => {
                info!(
                    %operation,
                    model,
                    elapsed_ms = started.elapsed().as_millis(),
                    "generation completed"
                );
                Ok(value)
            }
            Err(source) => {
                warn!(%operation, model, error = %source, "generation failed");
                Err(GenAiError::failed(operation, source))
            }
        }
    }
}

/// The start of `bytes` as UTF-8 if the MIME type is textual.
///
/// At most [`PREVIEW_LIMIT_BYTES`] are taken, cut back to the last whole
/// character. Returns `None` for binary types and for text that is not
/// valid UTF-8.
pub fn text_preview(bytes: &[u8], mime_type: &str) -> Option<String> {
    let textual = mime_type.starts_with("text/")
        || ["json", "xml", "csv", "yaml"]
            .iter()
            .any(|kind| mime_type.contains(kind));
    if !textual {
        return None;
    }

    let head = bytes.get(..bytes.len().min(PREVIEW_LIMIT_BYTES))?;
    let text = match core::str::from_utf8(head) {
        Ok(text) => text,
        // A multi-byte character straddling the cut is dropped.
        Err(e) if e.error_len().is_none() => {
            core::str::from_utf8(head.get(..e.valid_up_to())?).ok()?
        }
        Err(_) => return None,
    };
    (!text.trim().is_empty()).then(|| text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_only_for_text() {
        assert_eq!(
            text_preview(b"width,height\n10,20\n", "text/csv").as_deref(),
            Some("width,height\n10,20\n")
        );
        assert_eq!(text_preview(b"\x89PNG\r\n", "image/png"), None);
        assert_eq!(text_preview(b"{}", "application/json").as_deref(), Some("{}"));
    }

    #[test]
    fn preview_is_capped_on_a_char_boundary() {
        // 1023 two-byte characters then one more straddling the 2048 cut.
        let mut bytes = "é".repeat(1023).into_bytes();
        bytes.push(b'a');
        bytes.extend_from_slice("é".as_bytes());
        let preview = text_preview(&bytes, "text/plain").unwrap_or_default();
        assert_eq!(preview.len(), 2047);
        assert!(preview.ends_with('a'));
    }

    #[test]
    fn invalid_utf8_has_no_preview() {
        assert_eq!(text_preview(&[0xff, 0xfe, 0x41], "text/plain"), None);
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected() {
        let Ok(service) = GenerationService::new(&GenerationConfig::default()) else {
            return;
        };
        let request = TwinGenerationRequest {
            prompt: "   ".to_owned(),
            twin_type: Some(TwinType::Industrial),
            specifications: None,
        };
        assert!(matches!(
            service.generate_twin(&request).await,
            Err(GenAiError::InvalidRequest(_))
        ));
    }
}
