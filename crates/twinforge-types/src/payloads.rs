//! Create and partial-update payloads for every entity kind.
//!
//! Create payloads carry only the caller-supplied fields; the store fills
//! in identifiers, timestamps, statuses and counters. Update payloads are
//! explicit field-by-field patches:
//!
//! - A required field is `Option<T>`: absent (or `null`) leaves it alone.
//!   There is no way to clear a required field.
//! - A nullable field is `Option<Option<T>>`: absent leaves it alone,
//!   `null` clears it, a value replaces it.
//!
//! All payloads derive [`Validate`] so the HTTP layer can reject bad
//! input before anything reaches the store.

use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::enums::{DeviceStatus, DeviceType, TwinStatus, TwinType};
use crate::ids::{TwinId, UserId};
use crate::structs::TwinProperties;

/// Deserialize a present field (including an explicit `null`) as `Some`.
///
/// Combined with `#[serde(default)]` this distinguishes an absent key
/// (`None`) from `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Registration payload for a new user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Login name.
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Opaque credential blob.
    #[validate(length(min = 1))]
    pub password: String,
    /// Contact address.
    #[validate(email)]
    pub email: String,
    /// Role label; defaults to `user`.
    #[serde(default)]
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Digital twins
// ---------------------------------------------------------------------------

/// Creation payload for a digital twin.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDigitalTwin {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Optional long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Asset kind.
    #[serde(rename = "type")]
    pub twin_type: TwinType,
    /// Owning user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Descriptive properties.
    #[serde(default)]
    pub properties: Option<TwinProperties>,
}

/// Partial update for a digital twin.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TwinUpdate {
    /// New display name.
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New description, or `null` to clear it.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    /// New asset kind.
    #[serde(default, rename = "type")]
    pub twin_type: Option<TwinType>,
    /// New owner, or `null` to detach.
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: Option<Option<UserId>>,
    /// New lifecycle status.
    #[serde(default)]
    pub status: Option<TwinStatus>,
    /// Replacement properties, or `null` to clear them.
    #[serde(default, deserialize_with = "nullable")]
    pub properties: Option<Option<TwinProperties>>,
    /// New model artifact path, or `null` to clear it.
    #[serde(default, deserialize_with = "nullable")]
    pub model_path: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// IoT devices
// ---------------------------------------------------------------------------

/// Creation payload for an IoT device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewIotDevice {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Measurement kind.
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Where the device is installed.
    #[validate(length(min = 1))]
    pub location: String,
    /// Twin the device reports into.
    #[serde(default)]
    pub twin_id: Option<TwinId>,
    /// Unit of the reported value.
    #[serde(default)]
    pub unit: Option<String>,
}

/// Partial update for an IoT device.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    /// New display name.
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New measurement kind.
    #[serde(default, rename = "type")]
    pub device_type: Option<DeviceType>,
    /// New installation location.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub location: Option<String>,
    /// New twin, or `null` to detach.
    #[serde(default, deserialize_with = "nullable")]
    pub twin_id: Option<Option<TwinId>>,
    /// New connectivity status.
    #[serde(default)]
    pub status: Option<DeviceStatus>,
    /// New observed value, or `null` to clear it.
    #[serde(default, deserialize_with = "nullable")]
    pub last_value: Option<Option<f64>>,
    /// New unit, or `null` to clear it.
    #[serde(default, deserialize_with = "nullable")]
    pub unit: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// Marketplace
// ---------------------------------------------------------------------------

/// Creation payload for a workflow template.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkflowTemplate {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Marketplace category.
    #[validate(length(min = 1))]
    pub category: String,
    /// Optional long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Price in dollars.
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Opaque workflow graph.
    #[serde(default)]
    pub template: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Creation payload for a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Free-form project kind.
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub project_type: String,
    /// Owning user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Twin the project works on.
    #[serde(default)]
    pub twin_id: Option<TwinId>,
}

/// Partial update for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    /// New display name.
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New project kind.
    #[serde(default, rename = "type")]
    #[validate(length(min = 1))]
    pub project_type: Option<String>,
    /// New owner, or `null` to detach.
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: Option<Option<UserId>>,
    /// New twin, or `null` to detach.
    #[serde(default, deserialize_with = "nullable")]
    pub twin_id: Option<Option<TwinId>>,
    /// New completion percentage.
    #[serde(default)]
    #[validate(range(max = 100))]
    pub progress: Option<u8>,
    /// New status label.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub status: Option<String>,
}
