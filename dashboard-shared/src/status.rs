//! Connection status line shown above the gauges.

use std::fmt;

use crate::message::StatusTag;

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Info => "info",
            StatusLevel::Success => "success",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "error",
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text plus level, rendered into the status element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub level: StatusLevel,
}

impl StatusLine {
    pub fn new(text: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }

    /// Shown before the metrics channel opens.
    pub fn connecting() -> Self {
        Self::new("Status: Connecting...", StatusLevel::Info)
    }

    /// Channel open, nothing received yet.
    pub fn awaiting_data() -> Self {
        Self::new("Status: Connected. Waiting for data...", StatusLevel::Info)
    }

    pub fn receiving() -> Self {
        Self::new("Status: Connected and receiving data.", StatusLevel::Success)
    }

    /// Metrics channel closed or errored.
    pub fn channel_lost() -> Self {
        Self::new(
            "Status: Disconnected. Please check the server and refresh.",
            StatusLevel::Error,
        )
    }

    /// Metrics channel could not be constructed.
    pub fn could_not_connect(reason: &str) -> Self {
        Self::new(format!("Status: Could not connect: {reason}"), StatusLevel::Error)
    }

    /// Line for a status tag carried in a metrics message.
    pub fn from_tag(tag: &StatusTag, error: Option<&str>) -> Self {
        match tag {
            StatusTag::Connected => {
                Self::new("Status: Connected to OBD-II Adapter", StatusLevel::Success)
            }
            StatusTag::Demo => Self::new("Status: Running in Demo Mode", StatusLevel::Warning),
            StatusTag::Disconnected => match error {
                Some(error) if !error.is_empty() => Self::new(
                    format!("Status: OBD-II Connection Lost: {error}"),
                    StatusLevel::Error,
                ),
                _ => Self::new("Status: OBD-II Connection Lost...", StatusLevel::Error),
            },
            StatusTag::Other(tag) => Self::new(format!("Status: {tag}"), StatusLevel::Info),
        }
    }

    /// Class list for the status element; `status` is always kept.
    pub fn css_classes(&self) -> String {
        format!("status {}", self.level)
    }
}
