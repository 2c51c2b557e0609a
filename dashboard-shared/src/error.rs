//! Error type shared by the dashboard parsing and configuration layers.

/// Error type for dashboard message handling.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Inbound text was not valid JSON, or not a JSON object
    #[error("Parse error: {0}")]
    Parse(String),
    /// Camera payload was not valid base64
    #[error("Decode error: {0}")]
    Decode(String),
    /// JSON object matched neither the metrics nor the camera shape
    #[error("Unrecognized camera message")]
    UnknownCameraMessage,
    /// Endpoint could not be turned into a WebSocket URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
    /// Channel could not be opened
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Parse(err.to_string())
    }
}

impl From<base64::DecodeError> for DashboardError {
    fn from(err: base64::DecodeError) -> Self {
        DashboardError::Decode(err.to_string())
    }
}
