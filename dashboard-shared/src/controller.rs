//! The dashboard controller: one state object driven by channel callbacks.
//!
//! The page layer owns a single [`Dashboard`] and forwards every open,
//! message, close and error callback from both channels to it. Each handler
//! mutates the state in place and returns at most one [`Effect`] the page
//! must carry out (showing a decoded frame, or closing the camera socket).

use std::collections::HashMap;

use serde_json::Value;

use crate::camera::{CameraCommand, CameraSurface, SessionId};
use crate::config::DashboardConfig;
use crate::format::render_field;
use crate::message::{parse_camera, parse_inbound, CameraFrame, Inbound, MetricsMessage, StatusTag};
use crate::metrics::MetricName;
use crate::slot::SlotTable;
use crate::status::{StatusLevel, StatusLine};

/// Lifecycle of the metrics channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Connecting,
    Open,
    Closed,
}

/// Side effect the page must perform after a handler returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the camera image with this frame
    ShowFrame(CameraFrame),
    /// Close the camera socket for this session
    CloseCamera(SessionId),
}

/// Dashboard state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    metrics_channel: ChannelState,
    camera: CameraSurface,
    slots: SlotTable,
    status: StatusLine,
    last_values: HashMap<MetricName, Value>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            metrics_channel: ChannelState::Idle,
            camera: CameraSurface::new(),
            slots: SlotTable::new(),
            status: StatusLine::connecting(),
            last_values: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn metrics_channel(&self) -> ChannelState {
        self.metrics_channel
    }

    pub fn camera(&self) -> &CameraSurface {
        &self.camera
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Last raw value received for a metric since the previous reset.
    pub fn last_value(&self, name: MetricName) -> Option<&Value> {
        self.last_values.get(&name)
    }

    // === Metrics channel ===

    pub fn metrics_connecting(&mut self) {
        self.metrics_channel = ChannelState::Connecting;
        self.status = StatusLine::connecting();
    }

    pub fn metrics_opened(&mut self) {
        if self.metrics_channel == ChannelState::Closed {
            return;
        }
        self.metrics_channel = ChannelState::Open;
        self.status = StatusLine::awaiting_data();
        log::info!("metrics channel open");
    }

    /// Handle one text frame from the metrics channel.
    pub fn metrics_message(&mut self, text: &str) -> Option<Effect> {
        if self.metrics_channel == ChannelState::Closed {
            return None;
        }

        match parse_inbound(text) {
            Ok(Inbound::Metrics(message)) => {
                self.apply_metrics(&message);
                None
            }
            Ok(Inbound::Frame(frame)) => {
                if self.camera.external_frame() {
                    Some(Effect::ShowFrame(frame))
                } else {
                    log::debug!("dropping frame on metrics channel: camera not streaming");
                    None
                }
            }
            Err(e) => {
                log::debug!("ignoring metrics message: {e}");
                None
            }
        }
    }

    /// Apply a parsed metrics message to the status line and slots.
    pub fn apply_metrics(&mut self, message: &MetricsMessage) {
        match &message.status {
            Some(StatusTag::Disconnected) => {
                self.status = StatusLine::from_tag(&StatusTag::Disconnected, message.error.as_deref());
                self.reset_slots();
                return;
            }
            Some(tag) => self.status = StatusLine::from_tag(tag, None),
            None if self.status.level != StatusLevel::Success => {
                self.status = StatusLine::receiving();
            }
            None => {}
        }

        for (name, value) in &message.fields {
            self.slots.get_mut(*name).apply(render_field(*name, value));
            self.last_values.insert(*name, value.clone());
        }
    }

    /// Metrics channel closed. Resets the gauges and stops the camera.
    pub fn metrics_closed(&mut self) -> Option<Effect> {
        log::info!("metrics channel closed");
        self.metrics_channel = ChannelState::Closed;
        self.status = StatusLine::channel_lost();
        self.reset_slots();
        self.camera.stop().map(Effect::CloseCamera)
    }

    /// Metrics channel errored. Handled exactly like a close.
    pub fn metrics_error(&mut self, error: &str) -> Option<Effect> {
        log::warn!("metrics channel error: {error}");
        self.metrics_closed()
    }

    /// Metrics channel could not be constructed. Only a reload retries it.
    pub fn metrics_failed(&mut self, reason: &str) -> Option<Effect> {
        log::warn!("metrics channel failed: {reason}");
        self.metrics_channel = ChannelState::Closed;
        self.status = StatusLine::could_not_connect(reason);
        self.reset_slots();
        self.camera.stop().map(Effect::CloseCamera)
    }

    // === Camera channel ===

    /// User clicked the camera toggle.
    pub fn camera_toggle(&mut self) -> CameraCommand {
        self.camera.toggle()
    }

    pub fn camera_opened(&mut self, session: SessionId) {
        self.camera.opened(session);
    }

    /// Handle one text frame from the camera channel.
    pub fn camera_message(&mut self, session: SessionId, text: &str) -> Option<Effect> {
        if self.camera.session() != Some(session) {
            return None;
        }
        match parse_camera(text) {
            Ok(frame) => {
                self.camera.frame(session);
                Some(Effect::ShowFrame(frame))
            }
            Err(e) => {
                log::debug!("{session}: ignoring message: {e}");
                None
            }
        }
    }

    /// Camera channel closed or errored from the remote side.
    pub fn camera_closed(&mut self, session: SessionId) {
        self.camera.closed(session);
    }

    /// Camera channel could not be constructed.
    pub fn camera_failed(&mut self, session: SessionId, reason: &str) {
        self.camera.failed(session, reason);
    }

    fn reset_slots(&mut self) {
        self.slots.reset_all();
        self.last_values.clear();
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}
