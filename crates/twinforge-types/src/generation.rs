//! Request and result types for the generative-model adapter.
//!
//! The adapter hides the model provider entirely; callers only see these
//! typed values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DetectedType, GenerationStatus, TwinType};
use crate::ids::TwinId;
use crate::structs::{Dimensions, TwinProperties};

// ---------------------------------------------------------------------------
// Twin synthesis
// ---------------------------------------------------------------------------

/// Optional dimension hints for twin synthesis. Any axis may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DimensionHints {
    /// Preferred width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Preferred height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Preferred depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

/// Extra constraints a caller can attach to a synthesis prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TwinSpecifications {
    /// Size hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<DimensionHints>,
    /// Materials that should be used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    /// Features that should be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

/// A request to synthesize a digital twin from a natural-language prompt.
///
/// `prompt` and `type` are mandatory; they are modelled as defaults here
/// so the adapter can reject a missing value with its own
/// invalid-request error instead of a generic decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TwinGenerationRequest {
    /// What to build.
    #[serde(default)]
    pub prompt: String,
    /// Asset kind.
    #[serde(default, rename = "type")]
    pub twin_type: Option<TwinType>,
    /// Optional constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<TwinSpecifications>,
}

/// Properties produced by twin synthesis. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeneratedProperties {
    /// Overall size.
    pub dimensions: Dimensions,
    /// Construction materials.
    pub materials: Vec<String>,
    /// Notable features.
    pub features: Vec<String>,
    /// Free-form technical specifications (empty from synthesis).
    #[ts(type = "Record<string, unknown>")]
    pub specifications: BTreeMap<String, serde_json::Value>,
}

impl From<GeneratedProperties> for TwinProperties {
    fn from(generated: GeneratedProperties) -> Self {
        Self {
            dimensions: Some(generated.dimensions),
            materials: generated.materials,
            features: generated.features,
            specifications: generated.specifications,
            extra: BTreeMap::new(),
        }
    }
}

/// Status envelope for the 3D model that accompanies a synthesized twin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ModelGeneration {
    /// Where model generation stands.
    pub status: GenerationStatus,
    /// Estimated minutes until the model is ready.
    pub estimated_time: u32,
    /// Percent complete, 0 to 100.
    pub progress: u8,
}

/// The typed result of twin synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TwinGeneration {
    /// Generated display name.
    pub name: String,
    /// Generated description.
    pub description: String,
    /// Asset kind.
    #[serde(rename = "type")]
    pub twin_type: TwinType,
    /// Generated properties.
    pub properties: GeneratedProperties,
    /// Model generation status.
    pub model_generation: ModelGeneration,
}

/// A synthesis result after it has been persisted as a twin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTwin {
    /// Identifier of the stored twin.
    pub id: TwinId,
    /// The synthesis result, flattened alongside `id`.
    #[serde(flatten)]
    pub generation: TwinGeneration,
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

/// Estimated improvement deltas from applying the suggested optimizations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EstimatedImprovements {
    /// Efficiency delta.
    pub efficiency: f64,
    /// Accuracy delta.
    pub accuracy: f64,
    /// Performance delta.
    pub performance: f64,
}

/// The typed result of an optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TwinOptimization {
    /// Human-readable suggestions.
    pub suggestions: Vec<String>,
    /// Open map of technical optimization details.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub optimizations: BTreeMap<String, serde_json::Value>,
    /// Estimated improvement deltas.
    pub estimated_improvements: EstimatedImprovements,
}

// ---------------------------------------------------------------------------
// File analysis
// ---------------------------------------------------------------------------

/// The typed result of analyzing an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FileAnalysis {
    /// Free-text analysis.
    pub analysis: String,
    /// Estimated extent of the depicted asset.
    pub extracted_dimensions: Dimensions,
    /// Classification of the asset.
    pub detected_type: DetectedType,
    /// Suggested processing steps.
    pub processing_recommendations: Vec<String>,
}
