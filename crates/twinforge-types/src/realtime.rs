//! Wire messages for the realtime socket channel.
//!
//! Every server-to-client frame is a JSON object tagged by `type`.
//! Client-to-server frames are arbitrary JSON and are only echoed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::DeviceId;

/// Greeting sent as the first frame on every new connection.
pub const CONNECTED_GREETING: &str = "Connected to digital twin platform";

/// A synthetic sensor reading pushed to all open connections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct IotReading {
    /// Device the reading is attributed to.
    pub device_id: DeviceId,
    /// Sampled value.
    pub value: f64,
    /// When the reading was produced (RFC 3339).
    pub timestamp: DateTime<Utc>,
}

/// A frame sent from the server to a socket client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ServerMessage {
    /// Connection acknowledgement.
    Connected {
        /// Human-readable greeting.
        message: String,
    },
    /// A periodic synthetic device reading.
    IotUpdate {
        /// The reading.
        data: IotReading,
    },
    /// A client frame reflected back unchanged.
    Echo {
        /// The client's original message.
        data: serde_json::Value,
    },
}

impl ServerMessage {
    /// The acknowledgement frame sent when a connection opens.
    pub fn connected() -> Self {
        Self::Connected {
            message: CONNECTED_GREETING.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_tagged_by_type() {
        let json = serde_json::to_value(ServerMessage::connected()).unwrap_or_default();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["message"], CONNECTED_GREETING);

        let echo = ServerMessage::Echo {
            data: serde_json::json!({"ping": 1}),
        };
        let json = serde_json::to_value(&echo).unwrap_or_default();
        assert_eq!(json["type"], "echo");
        assert_eq!(json["data"]["ping"], 1);
    }

    #[test]
    fn iot_update_payload_shape() {
        let update = ServerMessage::IotUpdate {
            data: IotReading {
                device_id: DeviceId::new(2),
                value: 42.5,
                timestamp: Utc::now(),
            },
        };
        let json = serde_json::to_value(&update).unwrap_or_default();
        assert_eq!(json["type"], "iot_update");
        assert_eq!(json["data"]["deviceId"], 2);
        assert!(json["data"]["timestamp"].is_string());
    }
}
