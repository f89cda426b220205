//! Integration tests for the generation service.
//!
//! A `wiremock` server stands in for the model provider so each test can
//! pin down the request the service sends and the reply it gets back.

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use serde_json::{Value, json};
use twinforge_genai::{BackendType, GenAiError, GenerationConfig, GenerationService, Operation};
use twinforge_types::{
    DetectedType, DigitalTwin, GenerationStatus, TwinGenerationRequest, TwinId, TwinStatus,
    TwinType,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";
const REASONING_PATH: &str = "/models/gemini-2.5-pro:generateContent";

fn gemini_config(server: &MockServer) -> GenerationConfig {
    GenerationConfig {
        api_url: server.uri(),
        api_key: "test-key".to_owned(),
        ..GenerationConfig::default()
    }
}

/// Wrap model text in a Gemini `generateContent` envelope.
fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

fn request(prompt: &str, twin_type: Option<TwinType>) -> TwinGenerationRequest {
    TwinGenerationRequest {
        prompt: prompt.to_owned(),
        twin_type,
        specifications: None,
    }
}

fn sample_twin() -> DigitalTwin {
    DigitalTwin {
        id: TwinId::new(2),
        name: "Smart Factory Line".to_owned(),
        description: Some("Industrial manufacturing facility".to_owned()),
        twin_type: TwinType::Industrial,
        user_id: None,
        status: TwinStatus::Active,
        properties: None,
        model_path: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn generate_twin_uses_fast_model_and_builds_envelope() {
    let server = MockServer::start().await;
    let model_text = json!({
        "name": "Riverside Library",
        "description": "A three-storey public library",
        "type": "Architecture",
        "dimensions": {"width": 40, "height": 12, "depth": 25},
        "materials": ["brick", "timber"],
        "features": ["reading rooms"]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&model_text)))
        .expect(1)
        .mount(&server)
        .await;

    let service = GenerationService::new(&gemini_config(&server)).unwrap();
    let generated = service
        .generate_twin(&request("a library by the river", Some(TwinType::Architecture)))
        .await
        .unwrap();

    assert_eq!(generated.name, "Riverside Library");
    assert_eq!(generated.twin_type, TwinType::Architecture);
    assert_eq!(generated.properties.materials, ["brick", "timber"]);
    assert!(generated.properties.specifications.is_empty());
    assert_eq!(generated.model_generation.status, GenerationStatus::Processing);
    assert_eq!(generated.model_generation.progress, 0);
    assert!((5..15).contains(&generated.model_generation.estimated_time));
}

#[tokio::test]
async fn unknown_model_type_falls_back_to_requested() {
    let server = MockServer::start().await;
    let model_text = json!({
        "name": "Greenhouse",
        "description": "Glass greenhouse",
        "type": "horticulture",
        "dimensions": {"width": 10, "height": 4, "depth": 30},
        "materials": [],
        "features": []
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&model_text)))
        .mount(&server)
        .await;

    let service = GenerationService::new(&gemini_config(&server)).unwrap();
    let generated = service
        .generate_twin(&request("a greenhouse", Some(TwinType::Agriculture)))
        .await
        .unwrap();

    assert_eq!(generated.twin_type, TwinType::Agriculture);
}

#[tokio::test]
async fn missing_type_makes_no_provider_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = GenerationService::new(&gemini_config(&server)).unwrap();
    let result = service.generate_twin(&request("a barn", None)).await;

    assert!(matches!(result, Err(GenAiError::InvalidRequest(_))));
}

#[tokio::test]
async fn provider_error_is_generation_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let service = GenerationService::new(&gemini_config(&server)).unwrap();
    let err = service
        .generate_twin(&request("a barn", Some(TwinType::Agriculture)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenAiError::GenerationFailed {
            operation: Operation::GenerateTwin,
            ..
        }
    ));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn malformed_model_output_is_generation_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_reply("{\"name\": \"Barn\"}")),
        )
        .mount(&server)
        .await;

    let service = GenerationService::new(&gemini_config(&server)).unwrap();
    let err = service
        .generate_twin(&request("a barn", Some(TwinType::Agriculture)))
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("failed to generate digital twin"));
}

#[tokio::test]
async fn optimize_twin_uses_reasoning_model_and_twin_context() {
    let server = MockServer::start().await;
    let model_text = json!({
        "suggestions": ["Add vibration monitoring to conveyors"],
        "optimizations": {"sampling_rate_hz": 50},
        "estimatedImprovements": {"efficiency": 12.5, "accuracy": 4.0, "performance": 8.0}
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path(REASONING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&model_text)))
        .expect(1)
        .mount(&server)
        .await;

    let service = GenerationService::new(&gemini_config(&server)).unwrap();
    let optimization = service
        .optimize_twin(&sample_twin(), "predictive maintenance")
        .await
        .unwrap();

    assert_eq!(optimization.suggestions.len(), 1);
    assert_eq!(optimization.optimizations["sampling_rate_hz"], 50);
    assert!(optimization.estimated_improvements.efficiency > 12.0);

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    let user_text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(user_text.contains("predictive maintenance"));
    assert!(user_text.contains("Smart Factory Line"));
    assert!(user_text.contains("industrial"));
}

#[tokio::test]
async fn blank_use_case_makes_no_provider_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = GenerationService::new(&gemini_config(&server)).unwrap();
    let result = service.optimize_twin(&sample_twin(), "  ").await;

    assert!(matches!(result, Err(GenAiError::InvalidRequest(_))));
}

#[tokio::test]
async fn analyze_file_sends_metadata_and_preview() {
    let server = MockServer::start().await;
    let model_text = format!(
        "```json\n{}\n```",
        json!({
            "analysis": "Floor plan of a small office",
            "extractedDimensions": {"width": 20, "height": 3.5, "depth": 15},
            "detectedType": "architecture",
            "processingRecommendations": ["Extrude walls to 3.5 m"]
        })
    );

    Mock::given(method("POST"))
        .and(path(REASONING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&model_text)))
        .expect(1)
        .mount(&server)
        .await;

    let service = GenerationService::new(&gemini_config(&server)).unwrap();
    let analysis = service
        .analyze_file(b"room,width,depth\nlobby,20,15\n", "plan.csv", "text/csv")
        .await
        .unwrap();

    assert_eq!(analysis.detected_type, DetectedType::Architecture);
    assert_eq!(analysis.processing_recommendations.len(), 1);

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    let user_text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(user_text.contains("plan.csv"));
    assert!(user_text.contains("29 bytes"));
    assert!(user_text.contains("lobby,20,15"));
}

#[tokio::test]
async fn openai_backend_sends_json_schema() {
    let server = MockServer::start().await;
    let model_text = json!({
        "analysis": "Binary CAD drawing",
        "extractedDimensions": {"width": 1, "height": 1, "depth": 1},
        "detectedType": "unknown",
        "processingRecommendations": []
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "response_format": {"type": "json_schema", "json_schema": {"name": "file_analysis"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": model_text}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = GenerationConfig {
        backend: BackendType::OpenAi,
        reasoning_model: "gpt-test".to_owned(),
        ..gemini_config(&server)
    };
    let service = GenerationService::new(&config).unwrap();
    let analysis = service
        .analyze_file(&[0_u8, 1, 2, 3], "part.dwg", "application/octet-stream")
        .await
        .unwrap();

    assert_eq!(analysis.detected_type, DetectedType::Unknown);
}
