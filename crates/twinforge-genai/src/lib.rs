//! Generative-model adapter for the Twinforge platform.
//!
//! Wraps an external model provider behind three typed operations:
//! twin synthesis, optimization suggestions and uploaded-file analysis.
//! The rest of the platform depends only on [`GenerationService`] and the
//! result types in `twinforge-types`, so the provider, model, prompt text
//! and response schema can all change without touching callers.
//!
//! # Modules
//!
//! - [`config`] -- Backend, endpoint and model selection
//! - [`service`] -- [`GenerationService`], the public entry point
//! - [`llm`] -- Provider backends (Gemini, `OpenAI`-compatible)
//! - [`prompt`] -- `minijinja` prompt templates
//! - [`schema`] -- Response schemas and raw model output shapes
//! - [`parse`] -- JSON recovery from model text
//! - [`error`] -- Adapter error types

pub mod config;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod schema;
pub mod service;

pub use config::{BackendType, GenerationConfig};
pub use error::{GenAiError, LlmError, Operation};
pub use service::GenerationService;
