//! Enumeration types for the Twinforge platform.
//!
//! All closed enums serialize as lowercase strings, matching the values
//! the web client sends and renders. [`DeviceType`] is the one open
//! enumeration: the well-known sensor kinds get their own variants and
//! anything else is carried verbatim.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Digital twins
// ---------------------------------------------------------------------------

/// The kind of physical asset a digital twin represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TwinType {
    /// Buildings and other architectural structures.
    Architecture,
    /// Factories, production lines and plant equipment.
    Industrial,
    /// Farms, fields and greenhouses.
    Agriculture,
}

impl TwinType {
    /// The lowercase wire name of this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::Industrial => "industrial",
            Self::Agriculture => "agriculture",
        }
    }
}

impl core::fmt::Display for TwinType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TwinType {
    type Err = UnknownVariant;

    /// Case-insensitive parse, used for model output that may capitalize.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "architecture" => Ok(Self::Architecture),
            "industrial" => Ok(Self::Industrial),
            "agriculture" => Ok(Self::Agriculture),
            _ => Err(UnknownVariant(s.to_owned())),
        }
    }
}

/// Lifecycle status of a digital twin.
///
/// New twins start in [`TwinStatus::Processing`]. Nothing moves them to
/// [`TwinStatus::Active`] automatically; callers do that with a partial
/// update once the model artifact exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TwinStatus {
    /// The twin is live and its model is available.
    Active,
    /// The twin has been switched off.
    Inactive,
    /// The twin's model is still being produced.
    Processing,
}

// ---------------------------------------------------------------------------
// IoT devices
// ---------------------------------------------------------------------------

/// The kind of measurement an IoT device reports.
///
/// Serialized as a plain string. Unknown kinds round-trip unchanged via
/// [`DeviceType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    /// Temperature sensor.
    Temperature,
    /// Relative humidity sensor.
    Humidity,
    /// Electrical power meter.
    Power,
    /// Vibration sensor on rotating equipment.
    Vibration,
    /// Any other device kind, stored as given.
    Other(String),
}

impl DeviceType {
    /// The wire name of this device kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Power => "power",
            Self::Vibration => "vibration",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for DeviceType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "temperature" => Self::Temperature,
            "humidity" => Self::Humidity,
            "power" => Self::Power,
            "vibration" => Self::Vibration,
            _ => Self::Other(kind),
        }
    }
}

impl From<&str> for DeviceType {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_owned())
    }
}

impl From<DeviceType> for String {
    fn from(kind: DeviceType) -> Self {
        match kind {
            DeviceType::Other(kind) => kind,
            known => known.as_str().to_owned(),
        }
    }
}

impl core::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connectivity status of an IoT device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DeviceStatus {
    /// The device is reporting.
    Connected,
    /// The device has stopped reporting.
    Disconnected,
}

// ---------------------------------------------------------------------------
// Generation results
// ---------------------------------------------------------------------------

/// Asset classification inferred from an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DetectedType {
    /// Looks like a building or architectural drawing.
    Architecture,
    /// Looks like industrial equipment or a plant layout.
    Industrial,
    /// Looks like a farm or field plan.
    Agriculture,
    /// Could not be classified.
    Unknown,
}

/// Progress of 3D model generation for a newly synthesized twin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum GenerationStatus {
    /// Queued but not started.
    Pending,
    /// In progress.
    Processing,
    /// Finished.
    Completed,
}

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl core::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown variant: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}
