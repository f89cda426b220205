//! REST endpoint handlers for the entity collections.
//!
//! Each handler does at most one store operation and serializes the
//! result. Payloads are decoded and validated by the extractors before a
//! handler runs, so a rejected body never touches the store.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/dashboard/stats` | Dashboard aggregates |
//! | `GET` | `/api/projects` | Projects of the default user |
//! | `GET` | `/api/projects/:id` | Single project |
//! | `POST` | `/api/projects` | Create project |
//! | `PATCH` | `/api/projects/:id` | Update project |
//! | `GET` | `/api/digital-twins` | Twins of the default user |
//! | `GET` | `/api/digital-twins/:id` | Single twin |
//! | `POST` | `/api/digital-twins` | Create twin |
//! | `PATCH` | `/api/digital-twins/:id` | Update twin |
//! | `GET` | `/api/iot-devices` | Devices, optionally by `twinId` |
//! | `GET` | `/api/iot-devices/:id` | Single device |
//! | `POST` | `/api/iot-devices` | Create device |
//! | `PATCH` | `/api/iot-devices/:id` | Update device |
//! | `GET` | `/api/workflow-templates` | Templates, optionally by `category` |
//! | `GET` | `/api/workflow-templates/:id` | Single template |
//! | `POST` | `/api/workflow-templates` | Create template |
//! | `GET` | `/api/users/:id` | Single user |
//! | `POST` | `/api/users` | Register user |

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use tracing::info;
use twinforge_types::{
    DeviceId, DeviceUpdate, NewDigitalTwin, NewIotDevice, NewProject, NewUser,
    NewWorkflowTemplate, ProjectId, ProjectUpdate, TemplateId, TwinId, TwinUpdate, UserId,
};

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/iot-devices` endpoint.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesQuery {
    /// Only devices reporting into this twin.
    pub twin_id: Option<String>,
}

/// Query parameters for the `GET /api/workflow-templates` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct TemplatesQuery {
    /// Only templates in this marketplace category.
    pub category: Option<String>,
}

/// Parse a numeric identifier from a path or query segment.
pub(crate) fn parse_id<I: FromStr>(raw: &str) -> Result<I, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_parse_error| ApiError::InvalidId(raw.to_owned()))
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing collection sizes and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (twin_count, device_count, template_count, project_count) = {
        let store = state.store.read().await;
        (
            store.list_twins(None).len(),
            store.list_devices(None).len(),
            store.list_templates(None).len(),
            store.list_projects(None).len(),
        )
    };
    let clients = state.connected_clients();
    let backend = state.generation.backend_name();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Twinforge</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 720px; color: #1f2933; }}
        table {{ border-collapse: collapse; }}
        td {{ padding: 0.25rem 1.5rem 0.25rem 0; }}
        td.count {{ font-weight: 600; text-align: right; }}
    </style>
</head>
<body>
    <h1>Twinforge</h1>
    <p>Digital twin platform server, running. Generation backend: <code>{backend}</code></p>

    <table>
        <tr><td>Twins</td><td class="count">{twin_count}</td></tr>
        <tr><td>Devices</td><td class="count">{device_count}</td></tr>
        <tr><td>Templates</td><td class="count">{template_count}</td></tr>
        <tr><td>Projects</td><td class="count">{project_count}</td></tr>
        <tr><td>Socket clients</td><td class="count">{clients}</td></tr>
    </table>

    <h2>API</h2>
    <ul>
        <li><a href="/api/dashboard/stats">/api/dashboard/stats</a></li>
        <li><a href="/api/projects">/api/projects</a></li>
        <li><a href="/api/digital-twins">/api/digital-twins</a></li>
        <li><a href="/api/iot-devices">/api/iot-devices</a></li>
        <li><a href="/api/workflow-templates">/api/workflow-templates</a></li>
        <li><a href="/api/simulation/1/metrics">/api/simulation/:twinId/metrics</a></li>
    </ul>

    <p>Realtime readings: <code>ws://&lt;host&gt;/ws</code></p>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// `GET /api/dashboard/stats`
pub async fn dashboard_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(store.dashboard_stats(state.settings.default_user_id))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// `GET /api/projects`
pub async fn list_projects(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(store.list_projects(Some(state.settings.default_user_id)))
}

/// `GET /api/projects/:id`
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ProjectId = parse_id(&id_str)?;
    let store = state.store.read().await;
    store
        .get_project(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("project"))
}

/// `POST /api/projects`
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<NewProject>,
) -> impl IntoResponse {
    let project = state.store.write().await.create_project(payload);
    info!(project_id = %project.id, "project created");
    (StatusCode::CREATED, Json(project))
}

/// `PATCH /api/projects/:id`
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    ValidatedJson(update): ValidatedJson<ProjectUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ProjectId = parse_id(&id_str)?;
    let mut store = state.store.write().await;
    store
        .update_project(id, update)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("project"))
}

// ---------------------------------------------------------------------------
// Digital twins
// ---------------------------------------------------------------------------

/// `GET /api/digital-twins`
pub async fn list_twins(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(store.list_twins(Some(state.settings.default_user_id)))
}

/// `GET /api/digital-twins/:id`
pub async fn get_twin(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TwinId = parse_id(&id_str)?;
    let store = state.store.read().await;
    store
        .get_twin(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("digital twin"))
}

/// `POST /api/digital-twins`
///
/// The owner is taken from the payload as given; it is not defaulted.
pub async fn create_twin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<NewDigitalTwin>,
) -> impl IntoResponse {
    let twin = state.store.write().await.create_twin(payload);
    info!(twin_id = %twin.id, twin_type = %twin.twin_type, "digital twin created");
    (StatusCode::CREATED, Json(twin))
}

/// `PATCH /api/digital-twins/:id`
pub async fn update_twin(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    ValidatedJson(update): ValidatedJson<TwinUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TwinId = parse_id(&id_str)?;
    let mut store = state.store.write().await;
    store
        .update_twin(id, update)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("digital twin"))
}

// ---------------------------------------------------------------------------
// IoT devices
// ---------------------------------------------------------------------------

/// `GET /api/iot-devices?twinId=`
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DevicesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let twin = query
        .twin_id
        .as_deref()
        .map(parse_id::<TwinId>)
        .transpose()?;
    let store = state.store.read().await;
    Ok(Json(store.list_devices(twin)))
}

/// `GET /api/iot-devices/:id`
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: DeviceId = parse_id(&id_str)?;
    let store = state.store.read().await;
    store
        .get_device(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("device"))
}

/// `POST /api/iot-devices`
pub async fn create_device(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<NewIotDevice>,
) -> impl IntoResponse {
    let device = state.store.write().await.create_device(payload);
    info!(device_id = %device.id, device_type = %device.device_type, "device registered");
    (StatusCode::CREATED, Json(device))
}

/// `PATCH /api/iot-devices/:id`
pub async fn update_device(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    ValidatedJson(update): ValidatedJson<DeviceUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let id: DeviceId = parse_id(&id_str)?;
    let mut store = state.store.write().await;
    store
        .update_device(id, update)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("device"))
}

// ---------------------------------------------------------------------------
// Workflow templates
// ---------------------------------------------------------------------------

/// `GET /api/workflow-templates?category=`
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TemplatesQuery>,
) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(store.list_templates(query.category.as_deref()))
}

/// `GET /api/workflow-templates/:id`
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TemplateId = parse_id(&id_str)?;
    let store = state.store.read().await;
    store
        .get_template(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("template"))
}

/// `POST /api/workflow-templates`
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<NewWorkflowTemplate>,
) -> impl IntoResponse {
    let template = state.store.write().await.create_template(payload);
    info!(template_id = %template.id, category = %template.category, "template published");
    (StatusCode::CREATED, Json(template))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// `GET /api/users/:id`
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: UserId = parse_id(&id_str)?;
    let store = state.store.read().await;
    store
        .get_user(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("user"))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.store.write().await.create_user(payload)?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}
