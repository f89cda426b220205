//! Type-safe identifier wrappers around store-assigned integers.
//!
//! Every entity collection has its own strongly-typed ID so a twin id can
//! never be passed where a device id is expected. The numeric values all
//! come from one shared counter in the entity store, so two entities of
//! different kinds never carry the same number either.
//!
//! IDs serialize as bare JSON numbers to stay wire-compatible with the
//! web client.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw identifier value.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner numeric value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl core::str::FromStr for $name {
            type Err = core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a platform user.
    UserId
}

define_id! {
    /// Unique identifier for a digital twin.
    TwinId
}

define_id! {
    /// Unique identifier for an IoT device.
    DeviceId
}

define_id! {
    /// Unique identifier for a workflow template in the marketplace.
    TemplateId
}

define_id! {
    /// Unique identifier for a project.
    ProjectId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serializes_as_bare_number() {
        let id = TwinId::new(42);
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("42"));
    }

    #[test]
    fn id_parses_from_path_segment() {
        let parsed: Result<DeviceId, _> = "7".parse();
        assert_eq!(parsed.ok(), Some(DeviceId::new(7)));

        let bad: Result<DeviceId, _> = "seven".parse();
        assert!(bad.is_err());
    }

    #[test]
    fn id_display_matches_inner() {
        let id = ProjectId::from(13);
        assert_eq!(id.to_string(), "13");
        assert_eq!(u64::from(id), 13);
    }
}
