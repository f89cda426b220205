//! Error types for the generation service.
//!
//! Callers see [`GenAiError`]. Everything that goes wrong between sending
//! a prompt and holding a typed result is a [`LlmError`], wrapped in
//! [`GenAiError::GenerationFailed`] together with the operation that was
//! running. Nothing is retried.

use core::fmt;

/// The three operations the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Synthesize a twin from a prompt.
    GenerateTwin,
    /// Suggest optimizations for an existing twin.
    OptimizeTwin,
    /// Analyze an uploaded file.
    AnalyzeFile,
}

impl Operation {
    /// File stem shared by this operation's prompt templates.
    pub const fn template_stem(self) -> &'static str {
        match self {
            Self::GenerateTwin => "generate",
            Self::OptimizeTwin => "optimize",
            Self::AnalyzeFile => "analyze",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GenerateTwin => "generate digital twin",
            Self::OptimizeTwin => "optimize digital twin",
            Self::AnalyzeFile => "analyze file",
        })
    }
}

/// Failures talking to a model provider or decoding what it returned.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request could not be sent or its body not read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The provider envelope did not contain any model text.
    #[error("response missing {0}")]
    MissingContent(&'static str),

    /// The model text was not the JSON shape the schema asked for.
    #[error("malformed model output: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors returned by the generation service.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The caller's request was incomplete. No provider call was made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The provider call or decoding of its result failed.
    #[error("failed to {operation}: {source}")]
    GenerationFailed {
        /// What was being attempted.
        operation: Operation,
        /// Underlying cause.
        #[source]
        source: LlmError,
    },

    /// A prompt template was missing or failed to render.
    #[error("prompt template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl GenAiError {
    /// Wrap a provider failure for `operation`.
    pub const fn failed(operation: Operation, source: LlmError) -> Self {
        Self::GenerationFailed { operation, source }
    }
}
