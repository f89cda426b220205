//! Synthetic live-simulation metrics.
//!
//! There is no physics behind these numbers: each request draws a fresh
//! snapshot from fixed ranges so the dashboard has something that moves.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use rand::Rng;
use twinforge_types::{SimulationMetrics, TwinId};

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;

/// Draw one metrics snapshot from `rng`.
///
/// Production rate is 700 to 899 units/hr, energy efficiency 85 to 94 %,
/// equipment health 90 to 99 % and safety score 95 to 99 %.
pub fn sample_metrics<R: Rng>(rng: &mut R) -> SimulationMetrics {
    SimulationMetrics {
        production_rate: format!("{} units/hr", rng.random_range(700..900_u32)),
        energy_efficiency: format!("{}%", rng.random_range(85..95_u32)),
        equipment_health: format!("{}%", rng.random_range(90..100_u32)),
        safety_score: format!("{}%", rng.random_range(95..100_u32)),
    }
}

/// `GET /api/simulation/:twinId/metrics`
pub async fn twin_metrics(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TwinId = parse_id(&id_str)?;
    if state.store.read().await.get_twin(id).is_none() {
        return Err(ApiError::not_found("digital twin"));
    }
    Ok(Json(sample_metrics(&mut rand::rng())))
}
