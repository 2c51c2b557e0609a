//! Development sender for the telemetry dashboard.
//!
//! Streams simulated OBD-II metrics and synthetic camera frames over
//! WebSockets so the dashboard can run without a vehicle attached.

pub mod broadcast;
pub mod frames;
pub mod server;
pub mod simulator;

pub use server::{run_server, serve, FeedArgs};
