//! Fabric data model types.
//!
//! These types are shared between the connector, the history exporter and
//! the CLI:
//! - GPS readings published to the Fabric network
//! - Chat messages handed over by the conversation history manager

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A complete GPS fix that can be shared with the Fabric network.
///
/// Components keep the JSON number they were read as, so an integer
/// reading is forwarded as an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsReading {
    /// Latitude in decimal degrees.
    pub latitude: Number,
    /// Longitude in decimal degrees.
    pub longitude: Number,
    /// Heading in degrees.
    pub yaw: Number,
}

impl GpsReading {
    /// Build a reading from decimal degrees. `None` if any value is not finite.
    pub fn from_degrees(latitude: f64, longitude: f64, yaw: f64) -> Option<Self> {
        Self::from_parts(
            Number::from_f64(latitude),
            Number::from_f64(longitude),
            Number::from_f64(yaw),
        )
    }

    /// Build a reading only if every component is present.
    pub fn from_parts(
        latitude: Option<Number>,
        longitude: Option<Number>,
        yaw: Option<Number>,
    ) -> Option<Self> {
        Some(Self {
            latitude: latitude?,
            longitude: longitude?,
            yaw: yaw?,
        })
    }

    /// Build a reading from raw runtime values. Only JSON numbers count.
    pub fn from_values(
        latitude: Option<&Value>,
        longitude: Option<&Value>,
        yaw: Option<&Value>,
    ) -> Option<Self> {
        Self::from_parts(as_number(latitude), as_number(longitude), as_number(yaw))
    }
}

fn as_number(value: Option<&Value>) -> Option<Number> {
    match value {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker role (e.g., "user", "assistant", "system").
    pub role: String,

    /// Message text.
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reading_requires_all_parts() {
        let one = || Some(Number::from(1));
        assert!(GpsReading::from_parts(one(), one(), one()).is_some());
        assert_eq!(GpsReading::from_parts(None, one(), one()), None);
        assert_eq!(GpsReading::from_parts(one(), None, one()), None);
        assert_eq!(GpsReading::from_parts(one(), one(), None), None);
    }

    #[test]
    fn test_from_degrees_rejects_non_finite() {
        assert!(GpsReading::from_degrees(52.1, 4.9, 90.0).is_some());
        assert_eq!(GpsReading::from_degrees(f64::NAN, 4.9, 90.0), None);
        assert_eq!(GpsReading::from_degrees(52.1, 4.9, f64::INFINITY), None);
    }

    #[test]
    fn test_from_values_only_accepts_numbers() {
        let lat = json!(52);
        let lon = json!(4.5);
        let yaw = json!("north");

        let reading = GpsReading::from_values(Some(&lat), Some(&lon), Some(&json!(90))).unwrap();
        assert_eq!(reading.latitude, Number::from(52));

        assert_eq!(GpsReading::from_values(Some(&lat), Some(&lon), Some(&yaw)), None);
        assert_eq!(
            GpsReading::from_values(Some(&lat), Some(&Value::Null), Some(&lon)),
            None
        );
        assert_eq!(GpsReading::from_values(None, Some(&lon), Some(&lon)), None);
    }

    #[test]
    fn test_reading_serializes_field_names() {
        let reading = GpsReading::from_values(Some(&json!(52)), Some(&json!(2.5)), Some(&json!(3.0)))
            .unwrap();
        let json = serde_json::to_string(&reading).unwrap();
        assert_eq!(json, r#"{"latitude":52,"longitude":2.5,"yaw":3.0}"#);
    }

    #[test]
    fn test_chat_message_deserialize() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"user","content":"Hello"}"#).unwrap();
        assert_eq!(msg, ChatMessage::new("user", "Hello"));
    }
}
