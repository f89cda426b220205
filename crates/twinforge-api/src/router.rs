//! Axum router construction for the HTTP API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::{AppState, MULTIPART_OVERHEAD_BYTES};
use crate::{ai, handlers, simulation, ws};

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- realtime `WebSocket` channel
/// - `GET /api/dashboard/stats` -- dashboard aggregates
/// - `/api/projects`, `/api/digital-twins`, `/api/iot-devices`,
///   `/api/workflow-templates`, `/api/users` -- entity CRUD
/// - `POST /api/ai/generate-twin` -- synthesize and store a twin
/// - `POST /api/ai/optimize-twin/:id` -- optimization suggestions
/// - `POST /api/upload/analyze` -- multipart file analysis
/// - `GET /api/simulation/:twinId/metrics` -- synthetic metrics
///
/// The upload route carries its own body limit: the file ceiling from
/// [`ApiSettings::max_upload_bytes`](crate::state::ApiSettings) plus
/// [`MULTIPART_OVERHEAD_BYTES`] for framing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = DefaultBodyLimit::max(
        state
            .settings
            .max_upload_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES),
    );

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        // Dashboard
        .route("/api/dashboard/stats", get(handlers::dashboard_stats))
        // Projects
        .route(
            "/api/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(handlers::get_project).patch(handlers::update_project),
        )
        // Digital twins
        .route(
            "/api/digital-twins",
            get(handlers::list_twins).post(handlers::create_twin),
        )
        .route(
            "/api/digital-twins/{id}",
            get(handlers::get_twin).patch(handlers::update_twin),
        )
        // IoT devices
        .route(
            "/api/iot-devices",
            get(handlers::list_devices).post(handlers::create_device),
        )
        .route(
            "/api/iot-devices/{id}",
            get(handlers::get_device).patch(handlers::update_device),
        )
        // Marketplace
        .route(
            "/api/workflow-templates",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route("/api/workflow-templates/{id}", get(handlers::get_template))
        // Users
        .route("/api/users", post(handlers::create_user))
        .route("/api/users/{id}", get(handlers::get_user))
        // Generation
        .route("/api/ai/generate-twin", post(ai::generate_twin))
        .route("/api/ai/optimize-twin/{id}", post(ai::optimize_twin))
        .route(
            "/api/upload/analyze",
            post(ai::analyze_upload).layer(upload_limit),
        )
        // Simulation
        .route(
            "/api/simulation/{twin_id}/metrics",
            get(simulation::twin_metrics),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
