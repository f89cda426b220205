//! Response schemas sent to the model provider, and the raw shapes the
//! model answers with.
//!
//! The schemas use the JSON Schema subset that both Gemini
//! `responseSchema` and `OpenAI` `json_schema` accept.

use serde::Deserialize;
use serde_json::{Value, json};
use twinforge_types::Dimensions;

/// A named JSON schema constraining one operation's model output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    /// Schema name (required by `OpenAI`-compatible APIs).
    pub name: &'static str,
    /// The schema document.
    pub schema: Value,
}

fn dimensions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "width": {"type": "number"},
            "height": {"type": "number"},
            "depth": {"type": "number"}
        },
        "required": ["width", "height", "depth"]
    })
}

fn string_array() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

/// Schema for twin synthesis.
pub fn twin_schema() -> ResponseSchema {
    ResponseSchema {
        name: "digital_twin",
        schema: json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "description": {"type": "string"},
                "type": {"type": "string"},
                "dimensions": dimensions_schema(),
                "materials": string_array(),
                "features": string_array()
            },
            "required": ["name", "description", "type", "dimensions", "materials", "features"]
        }),
    }
}

/// Schema for optimization suggestions.
pub fn optimization_schema() -> ResponseSchema {
    ResponseSchema {
        name: "twin_optimization",
        schema: json!({
            "type": "object",
            "properties": {
                "suggestions": string_array(),
                "optimizations": {"type": "object"},
                "estimatedImprovements": {
                    "type": "object",
                    "properties": {
                        "efficiency": {"type": "number"},
                        "accuracy": {"type": "number"},
                        "performance": {"type": "number"}
                    },
                    "required": ["efficiency", "accuracy", "performance"]
                }
            },
            "required": ["suggestions", "optimizations", "estimatedImprovements"]
        }),
    }
}

/// Schema for uploaded-file analysis.
pub fn analysis_schema() -> ResponseSchema {
    ResponseSchema {
        name: "file_analysis",
        schema: json!({
            "type": "object",
            "properties": {
                "analysis": {"type": "string"},
                "extractedDimensions": dimensions_schema(),
                "detectedType": {
                    "type": "string",
                    "enum": ["architecture", "industrial", "agriculture", "unknown"]
                },
                "processingRecommendations": string_array()
            },
            "required": [
                "analysis",
                "extractedDimensions",
                "detectedType",
                "processingRecommendations"
            ]
        }),
    }
}

/// What the model returns for twin synthesis, before the service adds
/// the status envelope and normalizes the type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTwin {
    /// Generated display name.
    pub name: String,
    /// Generated description.
    pub description: String,
    /// Asset kind as the model spelled it.
    #[serde(default, rename = "type")]
    pub twin_type: Option<String>,
    /// Overall size.
    pub dimensions: Dimensions,
    /// Construction materials.
    #[serde(default)]
    pub materials: Vec<String>,
    /// Notable features.
    #[serde(default)]
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_requires_all_its_properties() {
        for schema in [twin_schema(), optimization_schema(), analysis_schema()] {
            let properties = schema.schema["properties"]
                .as_object()
                .map(|p| p.len())
                .unwrap_or_default();
            let required = schema.schema["required"]
                .as_array()
                .map(Vec::len)
                .unwrap_or_default();
            assert_eq!(properties, required, "{}", schema.name);
        }
    }

    #[test]
    fn raw_twin_tolerates_missing_lists() {
        let raw: Result<RawTwin, _> = serde_json::from_value(json!({
            "name": "Barn",
            "description": "A timber barn",
            "type": "Agriculture",
            "dimensions": {"width": 20, "height": 8, "depth": 40}
        }));
        let raw = raw.ok();
        assert!(raw.as_ref().is_some_and(|r| r.materials.is_empty()));
        assert_eq!(raw.and_then(|r| r.twin_type).as_deref(), Some("Agriculture"));
    }
}
