//! Endpoints backed by the generation adapter.
//!
//! No store lock is held while a model call is in flight; the only store
//! write (persisting a generated twin) happens after the call returns.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::{debug, info};
use twinforge_types::{GeneratedTwin, NewDigitalTwin, TwinGenerationRequest, TwinId};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::handlers::parse_id;
use crate::state::AppState;

/// Name of the multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// MIME type assumed when the client does not send one.
const FALLBACK_MIME: &str = "application/octet-stream";

/// Body of `POST /api/ai/optimize-twin/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    /// What the twin should be optimized for.
    #[serde(default)]
    pub use_case: String,
}

/// `POST /api/ai/generate-twin`
///
/// Synthesizes a twin and persists it under the default user. A request
/// without a prompt or type is rejected before any model call and leaves
/// the store untouched.
pub async fn generate_twin(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<TwinGenerationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let generation = state.generation.generate_twin(&request).await?;

    let twin = state.store.write().await.create_twin(NewDigitalTwin {
        name: generation.name.clone(),
        description: Some(generation.description.clone()),
        twin_type: generation.twin_type,
        user_id: Some(state.settings.default_user_id),
        properties: Some(generation.properties.clone().into()),
    });
    info!(twin_id = %twin.id, twin_type = %twin.twin_type, "generated twin stored");

    Ok(Json(GeneratedTwin {
        id: twin.id,
        generation,
    }))
}

/// `POST /api/ai/optimize-twin/:id`
pub async fn optimize_twin(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    JsonBody(request): JsonBody<OptimizeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TwinId = parse_id(&id_str)?;
    let twin = state
        .store
        .read()
        .await
        .get_twin(id)
        .ok_or_else(|| ApiError::not_found("digital twin"))?;

    let optimization = state
        .generation
        .optimize_twin(&twin, &request.use_case)
        .await?;
    Ok(Json(optimization))
}

/// `POST /api/upload/analyze`
///
/// Reads the multipart field named [`UPLOAD_FIELD`]. The file itself is
/// capped at [`ApiSettings::max_upload_bytes`](crate::state::ApiSettings);
/// the route's body limit only adds headroom for multipart framing.
pub async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut multipart =
        multipart.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "skipping multipart field");
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_owned();
        let mime_type = field.content_type().unwrap_or(FALLBACK_MIME).to_owned();
        let bytes = read_capped(field, state.settings.max_upload_bytes).await?;
        info!(%file_name, %mime_type, size = bytes.len(), "analyzing upload");

        let analysis = state
            .generation
            .analyze_file(&bytes, &file_name, &mime_type)
            .await?;
        return Ok(Json(analysis));
    }

    Err(ApiError::BadRequest("no file uploaded".to_owned()))
}

/// Collect a field's bytes, failing with 413 as soon as they exceed `limit`.
async fn read_capped(mut field: Field<'_>, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if chunk.len() > limit.saturating_sub(bytes.len()) {
            return Err(ApiError::PayloadTooLarge(format!(
                "file exceeds the {limit} byte upload limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Map a multipart read failure, keeping the body-limit case distinct.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(e.body_text())
    }
}
