//! Field-by-field merges of partial updates onto stored entities.
//!
//! Each merge touches only the fields present in the patch and then
//! refreshes the entity's lifecycle timestamp. Identifiers and creation
//! timestamps are never patchable.

use chrono::{DateTime, Utc};
use twinforge_types::{
    DeviceUpdate, DigitalTwin, IotDevice, Project, ProjectUpdate, TwinUpdate,
};

/// Return `now`, or `previous` if the clock has gone backwards.
///
/// Lifecycle timestamps must never decrease across updates.
pub fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    previous.max(now)
}

/// Apply a [`TwinUpdate`] to a twin and refresh `updated_at`.
pub fn merge_twin(twin: &mut DigitalTwin, update: TwinUpdate, now: DateTime<Utc>) {
    if let Some(name) = update.name {
        twin.name = name;
    }
    if let Some(description) = update.description {
        twin.description = description;
    }
    if let Some(twin_type) = update.twin_type {
        twin.twin_type = twin_type;
    }
    if let Some(user_id) = update.user_id {
        twin.user_id = user_id;
    }
    if let Some(status) = update.status {
        twin.status = status;
    }
    if let Some(properties) = update.properties {
        twin.properties = properties;
    }
    if let Some(model_path) = update.model_path {
        twin.model_path = model_path;
    }
    twin.updated_at = advance(twin.updated_at, now);
}

/// Apply a [`DeviceUpdate`] to a device and refresh `last_update`.
///
/// The timestamp moves even when the patch is empty or repeats the
/// current value.
pub fn merge_device(device: &mut IotDevice, update: DeviceUpdate, now: DateTime<Utc>) {
    if let Some(name) = update.name {
        device.name = name;
    }
    if let Some(device_type) = update.device_type {
        device.device_type = device_type;
    }
    if let Some(location) = update.location {
        device.location = location;
    }
    if let Some(twin_id) = update.twin_id {
        device.twin_id = twin_id;
    }
    if let Some(status) = update.status {
        device.status = status;
    }
    if let Some(last_value) = update.last_value {
        device.last_value = last_value;
    }
    if let Some(unit) = update.unit {
        device.unit = unit;
    }
    device.last_update = advance(device.last_update, now);
}

/// Apply a [`ProjectUpdate`] to a project and refresh `last_updated`.
///
/// Progress is not required to be monotonic.
pub fn merge_project(project: &mut Project, update: ProjectUpdate, now: DateTime<Utc>) {
    if let Some(name) = update.name {
        project.name = name;
    }
    if let Some(project_type) = update.project_type {
        project.project_type = project_type;
    }
    if let Some(user_id) = update.user_id {
        project.user_id = user_id;
    }
    if let Some(twin_id) = update.twin_id {
        project.twin_id = twin_id;
    }
    if let Some(progress) = update.progress {
        project.progress = progress;
    }
    if let Some(status) = update.status {
        project.status = status;
    }
    project.last_updated = advance(project.last_updated, now);
}
