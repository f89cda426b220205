//! Sample data for a freshly started platform.
//!
//! One engineer owning three twins (an office complex, a factory line and
//! a farm), four devices reporting into them, three marketplace templates
//! and one project per twin. The shared id counter resumes at
//! [`FIRST_FREE_ID`] so new entities never collide with the samples.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};
use tracing::info;
use twinforge_types::{
    DeviceId, DeviceStatus, DeviceType, DigitalTwin, Dimensions, IotDevice, Project, ProjectId,
    TemplateId, TwinId, TwinProperties, TwinStatus, TwinType, User, UserId, WorkflowTemplate,
};

use crate::store::EntityStore;

/// First identifier handed out after seeding.
pub const FIRST_FREE_ID: u64 = 10;

/// Identifier of the sample user.
pub const SAMPLE_USER_ID: UserId = UserId::new(1);

/// `now` shifted back by `ago`, saturating at `now`.
fn before(now: DateTime<Utc>, ago: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(ago).unwrap_or(now)
}

/// Helper to build a sample twin owned by the sample user.
fn twin(
    id: u64,
    name: &str,
    description: &str,
    twin_type: TwinType,
    properties: TwinProperties,
    model_path: &str,
    now: DateTime<Utc>,
) -> DigitalTwin {
    DigitalTwin {
        id: TwinId::new(id),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        twin_type,
        user_id: Some(SAMPLE_USER_ID),
        status: TwinStatus::Active,
        properties: Some(properties),
        model_path: Some(model_path.to_owned()),
        created_at: now,
        updated_at: now,
    }
}

/// Helper to build [`TwinProperties`] with dimensions and extra keys.
fn properties(
    (width, height, depth): (f64, f64, f64),
    materials: &[&str],
    extra: &[(&str, Value)],
) -> TwinProperties {
    TwinProperties {
        dimensions: Some(Dimensions {
            width,
            height,
            depth,
        }),
        materials: materials.iter().map(|m| (*m).to_owned()).collect(),
        features: Vec::new(),
        specifications: BTreeMap::new(),
        extra: extra
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect(),
    }
}

/// Helper to build a sample device.
#[allow(clippy::too_many_arguments)]
fn device(
    id: u64,
    name: &str,
    device_type: DeviceType,
    location: &str,
    twin: u64,
    last_value: Option<f64>,
    unit: &str,
    last_update: DateTime<Utc>,
) -> IotDevice {
    IotDevice {
        id: DeviceId::new(id),
        name: name.to_owned(),
        device_type,
        location: location.to_owned(),
        twin_id: Some(TwinId::new(twin)),
        status: if last_value.is_some() {
            DeviceStatus::Connected
        } else {
            DeviceStatus::Disconnected
        },
        last_value,
        unit: Some(unit.to_owned()),
        last_update,
    }
}

/// Helper to build a sample marketplace template with an empty graph.
#[allow(clippy::too_many_arguments)]
fn template(
    id: u64,
    name: &str,
    category: &str,
    description: &str,
    price: f64,
    rating: f64,
    downloads: u64,
    image_path: &str,
    now: DateTime<Utc>,
) -> WorkflowTemplate {
    WorkflowTemplate {
        id: TemplateId::new(id),
        name: name.to_owned(),
        category: category.to_owned(),
        description: Some(description.to_owned()),
        price,
        rating,
        downloads,
        image_path: Some(image_path.to_owned()),
        template: Some(json!({"nodes": [], "connections": []})),
        created_at: now,
    }
}

/// Helper to build a sample project for the sample user.
fn project(
    id: u64,
    name: &str,
    project_type: &str,
    twin: u64,
    progress: u8,
    last_updated: DateTime<Utc>,
) -> Project {
    Project {
        id: ProjectId::new(id),
        name: name.to_owned(),
        project_type: project_type.to_owned(),
        user_id: Some(SAMPLE_USER_ID),
        twin_id: Some(TwinId::new(twin)),
        progress,
        status: "active".to_owned(),
        last_updated,
    }
}

impl EntityStore {
    /// Create a store pre-populated with the sample platform data.
    pub fn with_sample_data() -> Self {
        let mut store = Self::new();
        store.seed(Utc::now());
        store
    }

    /// Insert the sample entities and move the counter past them.
    fn seed(&mut self, now: DateTime<Utc>) {
        self.users.insert(
            SAMPLE_USER_ID,
            User {
                id: SAMPLE_USER_ID,
                username: "john_smith".to_owned(),
                password: "hashed_password".to_owned(),
                email: "john.smith@example.com".to_owned(),
                role: "engineer".to_owned(),
                created_at: now,
            },
        );

        let twins = [
            twin(
                1,
                "Downtown Office Complex",
                "Modern office building with smart systems",
                TwinType::Architecture,
                properties(
                    (45.0, 75.0, 30.0),
                    &["glass", "steel", "concrete"],
                    &[("floors", json!(15))],
                ),
                "/models/office-complex.glb",
                now,
            ),
            twin(
                2,
                "Smart Factory Line",
                "Industrial manufacturing facility",
                TwinType::Industrial,
                properties(
                    (120.0, 8.0, 80.0),
                    &[],
                    &[("machinery", json!(["robots", "conveyors", "sensors"]))],
                ),
                "/models/factory.glb",
                now,
            ),
            twin(
                3,
                "Precision Agriculture Farm",
                "Smart farming with IoT sensors",
                TwinType::Agriculture,
                properties(
                    (500.0, 2.0, 300.0),
                    &[],
                    &[("crops", json!(["wheat", "corn", "soybeans"]))],
                ),
                "/models/farm.glb",
                now,
            ),
        ];
        self.twins.extend(twins.into_iter().map(|t| (t.id, t)));

        let devices = [
            device(
                1,
                "Temperature Sensor #1",
                DeviceType::Temperature,
                "Building Floor 12",
                1,
                Some(23.5),
                "°C",
                before(now, TimeDelta::minutes(2)),
            ),
            device(
                2,
                "Humidity Monitor",
                DeviceType::Humidity,
                "HVAC System",
                1,
                Some(45.0),
                "%",
                before(now, TimeDelta::minutes(1)),
            ),
            device(
                3,
                "Power Monitor",
                DeviceType::Power,
                "Main Electrical Panel",
                1,
                Some(2.3),
                "kW",
                before(now, TimeDelta::seconds(30)),
            ),
            device(
                4,
                "Vibration Sensor",
                DeviceType::Vibration,
                "Machine Tool #3",
                2,
                None,
                "Hz",
                before(now, TimeDelta::hours(5)),
            ),
        ];
        self.devices.extend(devices.into_iter().map(|d| (d.id, d)));

        let templates = [
            template(
                1,
                "Modern Office Complex",
                "Architecture",
                "Complete digital twin template for modern office buildings with HVAC, \
                 lighting, and security systems.",
                0.0,
                4.9,
                2300,
                "/templates/office-complex.jpg",
                now,
            ),
            template(
                2,
                "Smart Factory Template",
                "Industrial",
                "Industrial manufacturing template with IoT sensors, predictive maintenance, \
                 and production optimization.",
                49.0,
                4.7,
                1800,
                "/templates/smart-factory.jpg",
                now,
            ),
            template(
                3,
                "Precision Agriculture",
                "Agriculture",
                "Comprehensive farm management template with crop monitoring, irrigation \
                 control, and yield prediction.",
                29.0,
                4.8,
                956,
                "/templates/agriculture.jpg",
                now,
            ),
        ];
        self.templates.extend(templates.into_iter().map(|t| (t.id, t)));

        let projects = [
            project(
                1,
                "Downtown Office Complex",
                "Architecture",
                1,
                75,
                before(now, TimeDelta::hours(2)),
            ),
            project(
                2,
                "Smart Factory Line",
                "Industrial",
                2,
                45,
                before(now, TimeDelta::days(1)),
            ),
            project(
                3,
                "Precision Agriculture Farm",
                "Agriculture",
                3,
                90,
                before(now, TimeDelta::hours(3)),
            ),
        ];
        self.projects.extend(projects.into_iter().map(|p| (p.id, p)));

        self.next_id = FIRST_FREE_ID;
        info!(
            twins = self.twins.len(),
            devices = self.devices.len(),
            templates = self.templates.len(),
            projects = self.projects.len(),
            "sample data loaded"
        );
    }
}
