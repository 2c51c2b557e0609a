//! Push-only WebSocket channels.
//!
//! Opens a socket, forwards its lifecycle and text frames to a Yew callback,
//! and hands back an [`AbortHandle`]. Aborting drops the socket, which closes
//! it, and guarantees no further events are emitted for that channel.

use futures_util::future::{AbortHandle, Abortable};
use futures_util::StreamExt;
use gloo_net::websocket::{futures::WebSocket, Message, WebSocketError};
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use dashboard_shared::{DashboardError, PageOrigin};

/// Lifecycle and data events from one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Socket constructed and connecting/open
    Opened,
    /// Text frame received
    Text(String),
    /// Remote side closed the socket
    Closed,
    /// Socket errored; no further events follow
    Error(String),
    /// Socket could not be constructed
    Failed(String),
}

/// Open a channel and stream its events to `on_event`.
pub fn open_channel(url: &str, on_event: Callback<ChannelEvent>) -> AbortHandle {
    let (handle, registration) = AbortHandle::new_pair();
    let url = url.to_string();

    spawn_local(async move {
        let _ = Abortable::new(run_channel(url, on_event), registration).await;
    });

    handle
}

async fn run_channel(url: String, on_event: Callback<ChannelEvent>) {
    let mut ws = match WebSocket::open(&url) {
        Ok(ws) => ws,
        Err(e) => {
            let error = DashboardError::Connection(format!("{e:?}"));
            log::warn!("failed to open {url}: {error}");
            on_event.emit(ChannelEvent::Failed(error.to_string()));
            return;
        }
    };

    log::debug!("opened {url}");
    on_event.emit(ChannelEvent::Opened);

    while let Some(msg) = ws.next().await {
        match msg {
            Ok(Message::Text(text)) => on_event.emit(ChannelEvent::Text(text)),
            Ok(Message::Bytes(data)) => {
                // Senders only push JSON text
                log::debug!("{url}: ignoring {} byte binary frame", data.len());
            }
            Err(WebSocketError::ConnectionClose(event)) => {
                log::debug!("{url}: closed with code {}", event.code);
                break;
            }
            Err(e) => {
                on_event.emit(ChannelEvent::Error(format!("{e:?}")));
                return;
            }
        }
    }

    on_event.emit(ChannelEvent::Closed);
}

/// Origin of the current page, for resolving relative endpoints.
pub fn page_origin() -> PageOrigin {
    let Some(window) = web_sys::window() else {
        return PageOrigin::new("http:", "");
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location.host().unwrap_or_default();
    PageOrigin::new(&protocol, &host)
}
