//! Telemetry display logic shared by the dashboard frontend and its tooling.
//!
//! Everything here is target independent: it compiles natively for tests and
//! to wasm32 for the browser. The page layer feeds channel callbacks into a
//! [`Dashboard`] and renders what it exposes.

pub mod camera;
pub mod config;
pub mod controller;
mod error;
pub mod format;
pub mod message;
pub mod metrics;
pub mod scan;
pub mod slot;
pub mod status;

pub use camera::{CameraCommand, CameraState, CameraSurface, SessionId};
pub use config::{resolve_ws_url, DashboardConfig, PageOrigin, Placeholder};
pub use controller::{ChannelState, Dashboard, Effect};
pub use error::DashboardError;
pub use message::{parse_camera, parse_inbound, CameraFrame, Inbound, MetricsMessage, StatusTag};
pub use metrics::{FieldKind, MetricName};
pub use slot::{DisplaySlot, DtcTag, IgnitionTag, SlotTable, StateTag};
pub use status::{StatusLevel, StatusLine};
