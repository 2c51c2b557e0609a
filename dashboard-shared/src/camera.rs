//! Camera channel state machine.
//!
//! `Off -> Connecting -> Streaming -> Off`. Every start allocates a new
//! [`SessionId`]; callbacks from a session that is no longer current are
//! ignored, so a closed channel can never touch the surface again.

use std::fmt;

/// Identifies one camera channel connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera#{}", self.0)
    }
}

/// Camera channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Off,
    Connecting(SessionId),
    Streaming(SessionId),
}

/// What the page must do with the camera socket after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    /// Open a socket for this session
    Open(SessionId),
    /// Close the socket for this session without waiting for the server
    Close(SessionId),
}

/// Camera image surface, placeholder and toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSurface {
    state: CameraState,
    next_session: u64,
    has_image: bool,
    frames_received: u64,
    failure: Option<String>,
}

impl CameraSurface {
    pub fn new() -> Self {
        Self {
            state: CameraState::Off,
            next_session: 1,
            has_image: false,
            frames_received: 0,
            failure: None,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Session currently holding the channel, if any.
    pub fn session(&self) -> Option<SessionId> {
        match self.state {
            CameraState::Off => None,
            CameraState::Connecting(id) | CameraState::Streaming(id) => Some(id),
        }
    }

    pub fn is_active(&self) -> bool {
        self.session().is_some()
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.state, CameraState::Streaming(_))
    }

    /// Frames received in the current session.
    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    pub fn has_image(&self) -> bool {
        self.has_image
    }

    /// The image element is shown only once a frame has arrived.
    pub fn image_visible(&self) -> bool {
        self.is_active() && self.has_image
    }

    pub fn placeholder_visible(&self) -> bool {
        !self.image_visible()
    }

    pub fn placeholder_text(&self) -> String {
        match (&self.state, &self.failure) {
            (CameraState::Off, Some(reason)) => format!("Camera unavailable: {reason}"),
            (CameraState::Off, None) => "Camera is off".to_string(),
            (CameraState::Connecting(_), _) => "Connecting to camera...".to_string(),
            (CameraState::Streaming(_), _) => "Waiting for frames...".to_string(),
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        match self.state {
            CameraState::Off => "Start Camera",
            CameraState::Connecting(_) => "Connecting...",
            CameraState::Streaming(_) => "Stop Camera",
        }
    }

    /// User toggle: start when off, otherwise stop.
    pub fn toggle(&mut self) -> CameraCommand {
        match self.stop() {
            Some(session) => CameraCommand::Close(session),
            None => CameraCommand::Open(self.start()),
        }
    }

    /// Begin a new session. Any previous session is abandoned.
    pub fn start(&mut self) -> SessionId {
        let session = SessionId(self.next_session);
        self.next_session += 1;
        self.state = CameraState::Connecting(session);
        self.has_image = false;
        self.frames_received = 0;
        self.failure = None;
        log::info!("{session}: connecting");
        session
    }

    /// Channel opened. Returns false for stale sessions.
    pub fn opened(&mut self, session: SessionId) -> bool {
        if self.state != CameraState::Connecting(session) {
            return false;
        }
        self.state = CameraState::Streaming(session);
        log::info!("{session}: streaming");
        true
    }

    /// A frame arrived on the camera channel. Returns true if it should be shown.
    pub fn frame(&mut self, session: SessionId) -> bool {
        if self.session() != Some(session) {
            return false;
        }
        self.state = CameraState::Streaming(session);
        self.accept_frame();
        true
    }

    /// A frame arrived on the metrics channel. Shown only while streaming.
    pub fn external_frame(&mut self) -> bool {
        if !self.is_streaming() {
            return false;
        }
        self.accept_frame();
        true
    }

    /// Channel closed or errored from the remote side.
    pub fn closed(&mut self, session: SessionId) -> bool {
        if self.session() != Some(session) {
            return false;
        }
        log::info!("{session}: closed");
        self.turn_off();
        true
    }

    /// Channel could not be constructed.
    pub fn failed(&mut self, session: SessionId, reason: &str) -> bool {
        if self.session() != Some(session) {
            return false;
        }
        log::warn!("{session}: failed: {reason}");
        self.turn_off();
        self.failure = Some(reason.to_string());
        true
    }

    /// Manual stop. Returns the session whose socket must be closed.
    pub fn stop(&mut self) -> Option<SessionId> {
        let session = self.session()?;
        log::info!("{session}: stopped");
        self.turn_off();
        Some(session)
    }

    fn accept_frame(&mut self) {
        self.has_image = true;
        self.frames_received += 1;
    }

    fn turn_off(&mut self) {
        self.state = CameraState::Off;
        self.has_image = false;
        self.failure = None;
    }
}

impl Default for CameraSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let mut camera = CameraSurface::new();
        assert_eq!(camera.toggle_label(), "Start Camera");

        let CameraCommand::Open(session) = camera.toggle() else {
            panic!("expected open");
        };
        assert_eq!(camera.state(), CameraState::Connecting(session));
        assert!(camera.placeholder_visible());
        assert!(!camera.image_visible());

        assert!(camera.opened(session));
        assert_eq!(camera.toggle_label(), "Stop Camera");
        assert_eq!(camera.placeholder_text(), "Waiting for frames...");

        assert!(camera.frame(session));
        assert!(camera.image_visible());
        assert!(!camera.placeholder_visible());
        assert_eq!(camera.frames_received(), 1);

        assert!(camera.closed(session));
        assert_eq!(camera.state(), CameraState::Off);
        assert!(!camera.has_image());
        assert!(camera.placeholder_visible());
        assert_eq!(camera.toggle_label(), "Start Camera");
    }

    #[test]
    fn test_stop_before_first_frame() {
        let mut camera = CameraSurface::new();
        let CameraCommand::Open(session) = camera.toggle() else {
            panic!("expected open");
        };
        assert_eq!(camera.toggle(), CameraCommand::Close(session));

        assert_eq!(camera.state(), CameraState::Off);
        assert!(!camera.image_visible());
        assert!(camera.placeholder_visible());

        // late callbacks from the closed socket are ignored
        assert!(!camera.opened(session));
        assert!(!camera.frame(session));
        assert!(!camera.closed(session));
        assert_eq!(camera.state(), CameraState::Off);
    }

    #[test]
    fn test_new_session_ignores_old_one() {
        let mut camera = CameraSurface::new();
        let first = camera.start();
        camera.stop();
        let second = camera.start();
        assert_ne!(first, second);

        assert!(!camera.frame(first));
        assert!(!camera.closed(first));
        assert_eq!(camera.state(), CameraState::Connecting(second));
    }

    #[test]
    fn test_frame_while_connecting_promotes_to_streaming() {
        let mut camera = CameraSurface::new();
        let session = camera.start();
        assert!(camera.frame(session));
        assert_eq!(camera.state(), CameraState::Streaming(session));
    }

    #[test]
    fn test_external_frames_need_streaming() {
        let mut camera = CameraSurface::new();
        assert!(!camera.external_frame());

        let session = camera.start();
        assert!(!camera.external_frame());
        camera.opened(session);
        assert!(camera.external_frame());
        assert!(camera.image_visible());
    }

    #[test]
    fn test_failure_reports_reason_and_allows_retry() {
        let mut camera = CameraSurface::new();
        let session = camera.start();
        assert!(camera.failed(session, "refused"));
        assert_eq!(camera.state(), CameraState::Off);
        assert_eq!(camera.placeholder_text(), "Camera unavailable: refused");

        assert!(matches!(camera.toggle(), CameraCommand::Open(_)));
        assert_eq!(camera.placeholder_text(), "Connecting to camera...");
    }
}
