//! Shared type definitions for the Twinforge digital-twin platform.
//!
//! This crate is the single source of truth for every type that crosses
//! a crate boundary or the wire. Types flow downstream to `TypeScript`
//! via `ts-rs` for the web dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for all entity identifiers
//! - [`enums`] -- Twin, device and generation enumerations
//! - [`structs`] -- Stored entities and dashboard aggregates
//! - [`payloads`] -- Validated create and partial-update payloads
//! - [`generation`] -- Generative-model adapter requests and results
//! - [`realtime`] -- Socket channel wire messages

pub mod enums;
pub mod generation;
pub mod ids;
pub mod payloads;
pub mod realtime;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DetectedType, DeviceStatus, DeviceType, GenerationStatus, TwinStatus, TwinType};
pub use generation::{
    DimensionHints, EstimatedImprovements, FileAnalysis, GeneratedProperties, GeneratedTwin,
    ModelGeneration, TwinGeneration, TwinGenerationRequest, TwinOptimization, TwinSpecifications,
};
pub use ids::{DeviceId, ProjectId, TemplateId, TwinId, UserId};
pub use payloads::{
    DeviceUpdate, NewDigitalTwin, NewIotDevice, NewProject, NewUser, NewWorkflowTemplate,
    ProjectUpdate, TwinUpdate,
};
pub use realtime::{IotReading, ServerMessage};
pub use structs::{
    DashboardStats, DigitalTwin, Dimensions, IotDevice, Project, SimulationMetrics,
    TwinProperties, User, WorkflowTemplate,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes bindings for every type with #[ts(export)] when
        // export_all is called. Files land in `bindings/` relative to the
        // crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::UserId::export_all();
        let _ = crate::ids::TwinId::export_all();
        let _ = crate::ids::DeviceId::export_all();
        let _ = crate::ids::TemplateId::export_all();
        let _ = crate::ids::ProjectId::export_all();

        // Enums
        let _ = crate::enums::TwinType::export_all();
        let _ = crate::enums::TwinStatus::export_all();
        let _ = crate::enums::DeviceStatus::export_all();
        let _ = crate::enums::DetectedType::export_all();
        let _ = crate::enums::GenerationStatus::export_all();

        // Entities
        let _ = crate::structs::User::export_all();
        let _ = crate::structs::Dimensions::export_all();
        let _ = crate::structs::DigitalTwin::export_all();
        let _ = crate::structs::IotDevice::export_all();
        let _ = crate::structs::WorkflowTemplate::export_all();
        let _ = crate::structs::Project::export_all();
        let _ = crate::structs::DashboardStats::export_all();
        let _ = crate::structs::SimulationMetrics::export_all();

        // Generation
        let _ = crate::generation::DimensionHints::export_all();
        let _ = crate::generation::TwinSpecifications::export_all();
        let _ = crate::generation::TwinGenerationRequest::export_all();
        let _ = crate::generation::GeneratedProperties::export_all();
        let _ = crate::generation::ModelGeneration::export_all();
        let _ = crate::generation::TwinGeneration::export_all();
        let _ = crate::generation::EstimatedImprovements::export_all();
        let _ = crate::generation::TwinOptimization::export_all();
        let _ = crate::generation::FileAnalysis::export_all();

        // Realtime
        let _ = crate::realtime::IotReading::export_all();
        let _ = crate::realtime::ServerMessage::export_all();
    }
}
