//! Endpoint and rendering configuration for the dashboard.
//!
//! Endpoints are supplied from outside (page attributes in the browser, or
//! any serde source natively) instead of being baked into the code. Relative
//! endpoints resolve against the page origin.

use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// Default same-origin path for the metrics channel.
pub const DEFAULT_METRICS_PATH: &str = "/ws/metrics";

/// Default same-origin path for the camera channel.
pub const DEFAULT_CAMERA_PATH: &str = "/ws/camera";

/// Text shown in a slot that has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// `---`
    #[default]
    Dashes,
    /// `N/A`
    NotAvailable,
}

impl Placeholder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placeholder::Dashes => "---",
            Placeholder::NotAvailable => "N/A",
        }
    }

    /// Parse the short form used in page attributes (`---`, `dashes`, `N/A`, `na`).
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "---" | "dashes" => Some(Placeholder::Dashes),
            "n/a" | "na" | "notavailable" => Some(Placeholder::NotAvailable),
            _ => None,
        }
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Metrics channel endpoint (absolute `ws(s)://`, `http(s)://`, or a same-origin path)
    pub metrics_url: String,
    /// Camera channel endpoint
    pub camera_url: String,
    /// Placeholder rendering for absent values
    pub placeholder: Placeholder,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            metrics_url: DEFAULT_METRICS_PATH.to_string(),
            camera_url: DEFAULT_CAMERA_PATH.to_string(),
            placeholder: Placeholder::default(),
        }
    }
}

/// Origin of the page hosting the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    /// Page protocol including the colon, e.g. `https:`
    pub protocol: String,
    /// Host with optional port, e.g. `localhost:8080`
    pub host: String,
}

impl PageOrigin {
    pub fn new(protocol: &str, host: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            host: host.to_string(),
        }
    }

    fn ws_scheme(&self) -> &'static str {
        if self.protocol == "https:" {
            "wss:"
        } else {
            "ws:"
        }
    }
}

/// Turn a configured endpoint into a WebSocket URL.
///
/// `ws://`/`wss://` pass through, `http://`/`https://` are mapped to their
/// socket schemes, and paths starting with `/` resolve against `origin`.
pub fn resolve_ws_url(endpoint: &str, origin: &PageOrigin) -> Result<String, DashboardError> {
    let endpoint = endpoint.trim();

    if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
        return Ok(endpoint.to_string());
    }
    if let Some(rest) = endpoint.strip_prefix("https://") {
        return Ok(format!("wss://{rest}"));
    }
    if let Some(rest) = endpoint.strip_prefix("http://") {
        return Ok(format!("ws://{rest}"));
    }
    if endpoint.starts_with('/') {
        if origin.host.is_empty() {
            return Err(DashboardError::InvalidUrl(format!(
                "{endpoint} (no page host to resolve against)"
            )));
        }
        return Ok(format!("{}//{}{endpoint}", origin.ws_scheme(), origin.host));
    }

    Err(DashboardError::InvalidUrl(endpoint.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(protocol: &str) -> PageOrigin {
        PageOrigin::new(protocol, "car.local:8080")
    }

    #[test]
    fn test_absolute_ws_urls_pass_through() {
        assert_eq!(
            resolve_ws_url("ws://10.0.0.5:8080", &origin("http:")).unwrap(),
            "ws://10.0.0.5:8080"
        );
        assert_eq!(
            resolve_ws_url("wss://tunnel.example", &origin("http:")).unwrap(),
            "wss://tunnel.example"
        );
    }

    #[test]
    fn test_http_schemes_are_mapped() {
        assert_eq!(
            resolve_ws_url("https://tunnel.example/feed", &origin("http:")).unwrap(),
            "wss://tunnel.example/feed"
        );
        assert_eq!(
            resolve_ws_url("http://10.0.0.5/feed", &origin("https:")).unwrap(),
            "ws://10.0.0.5/feed"
        );
    }

    #[test]
    fn test_relative_paths_follow_page_protocol() {
        assert_eq!(
            resolve_ws_url("/ws/metrics", &origin("http:")).unwrap(),
            "ws://car.local:8080/ws/metrics"
        );
        assert_eq!(
            resolve_ws_url("/ws/camera", &origin("https:")).unwrap(),
            "wss://car.local:8080/ws/camera"
        );
    }

    #[test]
    fn test_unresolvable_endpoints_are_rejected() {
        assert!(matches!(
            resolve_ws_url("ftp://nope", &origin("http:")),
            Err(DashboardError::InvalidUrl(_))
        ));
        assert!(resolve_ws_url("/ws/metrics", &PageOrigin::new("http:", "")).is_err());
    }

    #[test]
    fn test_placeholder_attr_parsing() {
        assert_eq!(Placeholder::from_attr("N/A"), Some(Placeholder::NotAvailable));
        assert_eq!(Placeholder::from_attr("---"), Some(Placeholder::Dashes));
        assert_eq!(Placeholder::from_attr("dots"), None);
        assert_eq!(Placeholder::default().as_str(), "---");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"metrics_url": "ws://jetson:8080"}"#).unwrap();
        assert_eq!(config.metrics_url, "ws://jetson:8080");
        assert_eq!(config.camera_url, DEFAULT_CAMERA_PATH);
        assert_eq!(config.placeholder, Placeholder::Dashes);
    }
}
