//! Core entity structs for the Twinforge platform.
//!
//! These are the records held by the entity store and returned by the
//! HTTP API. Field names serialize in camelCase and the `kind` field of
//! each entity serializes as `type`, which is the shape the web client
//! consumes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DeviceStatus, DeviceType, TwinStatus, TwinType};
use crate::ids::{DeviceId, ProjectId, TemplateId, TwinId, UserId};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A registered platform user.
///
/// The password is an opaque credential blob; it is accepted on creation
/// and never serialized back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Login name (unique across users).
    pub username: String,
    /// Opaque credential blob.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password: String,
    /// Contact address (unique across users).
    pub email: String,
    /// Free-form role label (e.g. `engineer`).
    pub role: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Digital twins
// ---------------------------------------------------------------------------

/// Physical extent of an asset, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Dimensions {
    /// Extent along the x axis.
    pub width: f64,
    /// Extent along the vertical axis.
    pub height: f64,
    /// Extent along the z axis.
    pub depth: f64,
}

/// Descriptive properties attached to a digital twin.
///
/// The well-known keys have typed fields. Anything else a caller or the
/// seed data supplies (`floors`, `machinery`, `crops`, ...) is preserved
/// in [`TwinProperties::extra`] and flattened back into the same object
/// on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwinProperties {
    /// Overall size of the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Construction materials.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    /// Notable features or subsystems.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    /// Free-form technical specifications.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specifications: BTreeMap<String, serde_json::Value>,
    /// Any additional keys, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A stored digital twin of a building, factory or farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DigitalTwin {
    /// Store-assigned identifier.
    pub id: TwinId,
    /// Display name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// What kind of asset this twin models.
    #[serde(rename = "type")]
    pub twin_type: TwinType,
    /// Owning user, if any.
    pub user_id: Option<UserId>,
    /// Lifecycle status.
    pub status: TwinStatus,
    /// Dimensions, materials, features and other descriptive data.
    #[ts(type = "Record<string, unknown> | null")]
    pub properties: Option<TwinProperties>,
    /// Path to the generated 3D model artifact.
    pub model_path: Option<String>,
    /// When the twin was created.
    pub created_at: DateTime<Utc>,
    /// When the twin was last modified.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// IoT devices
// ---------------------------------------------------------------------------

/// A sensor or meter feeding data into a digital twin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct IotDevice {
    /// Store-assigned identifier.
    pub id: DeviceId,
    /// Display name.
    pub name: String,
    /// Measurement kind.
    #[serde(rename = "type")]
    #[ts(type = "string")]
    pub device_type: DeviceType,
    /// Where the device is installed.
    pub location: String,
    /// Twin the device reports into, if any.
    pub twin_id: Option<TwinId>,
    /// Connectivity status.
    pub status: DeviceStatus,
    /// Most recent observed value.
    pub last_value: Option<f64>,
    /// Unit of [`IotDevice::last_value`] (e.g. `°C`, `%`, `kW`).
    pub unit: Option<String>,
    /// Refreshed on every update, whether or not the value changed.
    pub last_update: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Marketplace
// ---------------------------------------------------------------------------

/// A reusable workflow template offered in the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WorkflowTemplate {
    /// Store-assigned identifier.
    pub id: TemplateId,
    /// Display name.
    pub name: String,
    /// Marketplace category (e.g. `Architecture`).
    pub category: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Price in dollars, never negative.
    pub price: f64,
    /// Average rating between 0 and 5.
    pub rating: f64,
    /// Download counter.
    pub downloads: u64,
    /// Preview image path.
    pub image_path: Option<String>,
    /// Opaque workflow graph (nodes and connections). Not validated.
    pub template: Option<serde_json::Value>,
    /// When the template was published.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// A user's project built around a digital twin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Project {
    /// Store-assigned identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Free-form project kind (e.g. `Industrial`).
    #[serde(rename = "type")]
    pub project_type: String,
    /// Owning user, if any.
    pub user_id: Option<UserId>,
    /// Twin the project works on. Not checked for existence.
    pub twin_id: Option<TwinId>,
    /// Completion percentage, 0 to 100.
    pub progress: u8,
    /// Free-form status label (e.g. `active`).
    pub status: String,
    /// When the project was last modified.
    pub last_updated: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Headline numbers for the dashboard landing page.
///
/// The trend strings are fixed presentation values; only the counts are
/// computed from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DashboardStats {
    /// Twins owned by the dashboard user.
    pub active_twins: usize,
    /// Trend label for active twins.
    pub active_twins_growth: String,
    /// Devices currently reporting.
    pub connected_devices: usize,
    /// Formatted data point volume (e.g. `3.0M`).
    pub data_points: String,
    /// Trend label for data points.
    pub data_points_growth: String,
    /// Average processing time label.
    pub processing_time: String,
    /// Trend label for processing time.
    pub processing_time_change: String,
    /// Accuracy label.
    pub accuracy_rate: String,
    /// Trend label for accuracy.
    pub accuracy_rate_change: String,
    /// Projects owned by the dashboard user.
    pub projects: usize,
    /// Templates in the marketplace.
    pub templates: usize,
}

/// A synthetic snapshot of live simulation metrics for one twin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SimulationMetrics {
    /// Throughput label, e.g. `812 units/hr`.
    pub production_rate: String,
    /// Energy efficiency percentage label.
    pub energy_efficiency: String,
    /// Equipment health percentage label.
    pub equipment_health: String,
    /// Safety score percentage label.
    pub safety_score: String,
}
