//! Inbound JSON message shapes.
//!
//! The sender's schema is fixed externally; these types only pick out what
//! the dashboard displays. Three shapes are accepted on either channel:
//!
//! - a bare metrics object: `{"rpm": 812, "status": "demo", ...}`
//! - a metrics envelope: `{"type": "obd_data", "payload": {...}}`
//! - a camera frame: `{"type": "video_frame", "payload": "<b64>"}` or `{"frame": "<b64>"}`

use base64::Engine;
use serde_json::{Map, Value};

use crate::metrics::MetricName;
use crate::DashboardError;

const METRICS_ENVELOPE: &str = "obd_data";
const FRAME_ENVELOPE: &str = "video_frame";

/// Connection-state tag carried in a metrics message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTag {
    Connected,
    Demo,
    Disconnected,
    /// Any other tag the sender emits
    Other(String),
}

impl StatusTag {
    fn from_value(value: &Value) -> Option<Self> {
        let tag = match value {
            Value::Null | Value::Bool(false) => return None,
            Value::String(s) if s.is_empty() => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Some(match tag.as_str() {
            "connected" => StatusTag::Connected,
            "demo" => StatusTag::Demo,
            "disconnected" => StatusTag::Disconnected,
            _ => StatusTag::Other(tag),
        })
    }
}

/// A parsed metrics message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsMessage {
    /// Connection-state tag, if present and non-empty
    pub status: Option<StatusTag>,
    /// Error text accompanying a `disconnected` status
    pub error: Option<String>,
    /// Known metric fields present in the message, nulls included
    pub fields: Vec<(MetricName, Value)>,
}

impl MetricsMessage {
    /// Build from a JSON object, keeping only known metric keys.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let status = object.get("status").and_then(StatusTag::from_value);
        let error = object.get("error").and_then(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        let fields = object
            .iter()
            .filter_map(|(key, value)| MetricName::from_key(key).map(|name| (name, value.clone())))
            .collect();

        Self {
            status,
            error,
            fields,
        }
    }

    /// Value for a metric if the message carried it.
    pub fn field(&self, name: MetricName) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| value)
    }
}

/// A decoded camera frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    /// JPEG bytes
    pub jpeg: Vec<u8>,
}

impl CameraFrame {
    /// Decode a base64 payload. A leading `data:...;base64,` prefix is tolerated.
    pub fn from_base64(payload: &str) -> Result<Self, DashboardError> {
        let encoded = match payload.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => payload,
        };
        let jpeg = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        if jpeg.is_empty() {
            return Err(DashboardError::Decode("empty frame".to_string()));
        }
        Ok(Self { jpeg })
    }

    /// True when the bytes start with the JPEG start-of-image marker.
    pub fn looks_like_jpeg(&self) -> bool {
        self.jpeg.starts_with(&[0xFF, 0xD8])
    }
}

/// Any message the dashboard understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Metrics(MetricsMessage),
    Frame(CameraFrame),
}

/// Parse one inbound text frame.
pub fn parse_inbound(text: &str) -> Result<Inbound, DashboardError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(object) = value else {
        return Err(DashboardError::Parse("expected a JSON object".to_string()));
    };

    match object.get("type").and_then(Value::as_str) {
        Some(METRICS_ENVELOPE) => match object.get("payload") {
            Some(Value::Object(payload)) => Ok(Inbound::Metrics(MetricsMessage::from_object(payload))),
            _ => Err(DashboardError::Parse("obd_data without object payload".to_string())),
        },
        Some(FRAME_ENVELOPE) => frame_from(object.get("payload")),
        _ if matches!(object.get("frame"), Some(Value::String(_))) => {
            frame_from(object.get("frame"))
        }
        _ => Ok(Inbound::Metrics(MetricsMessage::from_object(&object))),
    }
}

/// Parse a text frame from the camera channel.
pub fn parse_camera(text: &str) -> Result<CameraFrame, DashboardError> {
    match parse_inbound(text)? {
        Inbound::Frame(frame) => Ok(frame),
        Inbound::Metrics(_) => Err(DashboardError::UnknownCameraMessage),
    }
}

fn frame_from(payload: Option<&Value>) -> Result<Inbound, DashboardError> {
    match payload {
        Some(Value::String(encoded)) => Ok(Inbound::Frame(CameraFrame::from_base64(encoded)?)),
        _ => Err(DashboardError::UnknownCameraMessage),
    }
}
