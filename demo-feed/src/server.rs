//! HTTP/WebSocket server for the demo feed.
//!
//! Two producer tasks publish into broadcasters; each WebSocket client
//! subscribes to one of them and receives every message as a text frame.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{Json, Response};
use axum::routing::get;
use axum::Router;
use clap::Args;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::broadcast::{FeedBroadcaster, FeedSubscriber};
use crate::frames::PatternGenerator;
use crate::simulator::{DriveSimulator, FeedMode, ObdSample};

/// Error text sent with simulated adapter dropouts.
pub const DROPOUT_ERROR: &str = "adapter lost";

/// Command-line options for the demo feed.
#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Milliseconds between metrics messages
    #[arg(long, default_value = "200")]
    pub interval_ms: u64,

    /// Milliseconds between camera frames
    #[arg(long, default_value = "100")]
    pub frame_interval_ms: u64,

    /// Camera frame width in pixels
    #[arg(long, default_value = "320")]
    pub frame_width: u32,

    /// Camera frame height in pixels
    #[arg(long, default_value = "240")]
    pub frame_height: u32,

    /// JPEG quality (1-100)
    #[arg(long, default_value = "70")]
    pub jpeg_quality: u8,

    /// Status tag announced with each metrics message
    #[arg(long, value_enum, default_value = "demo")]
    pub mode: FeedMode,

    /// Seed for repeatable simulation runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Send a disconnected status every N metrics ticks (0 disables)
    #[arg(long, default_value = "0")]
    pub dropout_every: u64,
}

impl Default for FeedArgs {
    fn default() -> Self {
        Self {
            port: 8080,
            bind: "0.0.0.0".to_string(),
            interval_ms: 200,
            frame_interval_ms: 100,
            frame_width: 320,
            frame_height: 240,
            jpeg_quality: 70,
            mode: FeedMode::Demo,
            seed: None,
            dropout_every: 0,
        }
    }
}

impl FeedArgs {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.interval_ms > 0, "--interval-ms must be positive");
        anyhow::ensure!(
            self.frame_interval_ms > 0,
            "--frame-interval-ms must be positive"
        );
        anyhow::ensure!(
            self.frame_width > 0 && self.frame_height > 0,
            "frame size must be non-zero"
        );
        anyhow::ensure!(
            (1..=100).contains(&self.jpeg_quality),
            "--jpeg-quality must be in 1..=100"
        );
        Ok(())
    }
}

/// Shared server state.
#[derive(Clone, Default)]
pub struct AppState {
    pub metrics: FeedBroadcaster,
    pub camera: FeedBroadcaster,
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws/metrics", get(metrics_ws))
        .route("/ws/camera", get(camera_ws))
        .route("/health", get(health))
        .with_state(state)
}

/// Start the metrics and camera producers.
pub fn spawn_producers(args: &FeedArgs, state: &AppState) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(metrics_producer(args.clone(), state.metrics.clone())),
        tokio::spawn(camera_producer(args.clone(), state.camera.clone())),
    ]
}

/// Serve on an already-bound listener until the server stops.
pub async fn serve(listener: TcpListener, args: FeedArgs) -> anyhow::Result<()> {
    args.validate()?;

    let state = AppState::default();
    let producers = spawn_producers(&args, &state);

    let result = axum::serve(listener, router(state))
        .await
        .context("server error");

    for producer in producers {
        producer.abort();
    }
    result
}

/// Bind according to the arguments and serve.
pub async fn run_server(args: FeedArgs) -> anyhow::Result<()> {
    args.validate()?;

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.bind, args.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("demo feed listening on http://{addr}");
    tracing::info!("  metrics: ws://{addr}/ws/metrics");
    tracing::info!("  camera:  ws://{addr}/ws/camera");

    serve(listener, args).await
}

async fn metrics_producer(args: FeedArgs, broadcaster: FeedBroadcaster) {
    let mut simulator = DriveSimulator::new(args.mode, args.seed);
    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms));
    let dt = args.interval_ms as f64 / 1000.0;
    let mut tick: u64 = 0;

    loop {
        ticker.tick().await;
        tick += 1;

        let sample = if args.dropout_every > 0 && tick % args.dropout_every == 0 {
            tracing::debug!("simulating adapter dropout at tick {tick}");
            ObdSample::dropout(DROPOUT_ERROR)
        } else {
            simulator.step(dt)
        };

        if let Err(e) = broadcaster.publish_json(&sample) {
            tracing::warn!("failed to serialize metrics sample: {e}");
        }
    }
}

async fn camera_producer(args: FeedArgs, broadcaster: FeedBroadcaster) {
    let mut generator = PatternGenerator::new(args.frame_width, args.frame_height, args.jpeg_quality);
    let mut ticker = tokio::time::interval(Duration::from_millis(args.frame_interval_ms));

    loop {
        ticker.tick().await;
        if broadcaster.subscriber_count() == 0 {
            continue;
        }

        let Some(message) = generator.next_message() else {
            tracing::warn!("failed to encode camera frame");
            continue;
        };
        if let Err(e) = broadcaster.publish_json(&message) {
            tracing::warn!("failed to serialize camera frame: {e}");
        }
    }
}

async fn metrics_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let subscriber = state.metrics.subscribe();
    ws.on_upgrade(move |socket| forward_feed(socket, subscriber, "metrics"))
}

async fn camera_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let subscriber = state.camera.subscribe();
    ws.on_upgrade(move |socket| forward_feed(socket, subscriber, "camera"))
}

/// Forward a feed to one client until either side goes away.
async fn forward_feed(socket: WebSocket, subscriber: FeedSubscriber, feed: &'static str) {
    tracing::info!("{feed} client connected");
    let (mut sender, mut receiver) = socket.split();
    let mut messages = Box::pin(subscriber.into_stream());

    loop {
        tokio::select! {
            message = messages.next() => {
                let Some(message) = message else {
                    break;
                };
                if sender.send(Message::Text(message.to_string())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!("{feed} client error: {e}");
                        break;
                    }
                    // Clients have nothing to say; ignore anything they send
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::info!("{feed} client disconnected");
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "demo-feed",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_are_valid() {
        assert!(FeedArgs::default().validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let args = FeedArgs {
            interval_ms: 0,
            ..FeedArgs::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        let args = FeedArgs {
            jpeg_quality: 0,
            ..FeedArgs::default()
        };
        assert!(args.validate().is_err());
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "demo-feed");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_metrics_producer_publishes_dropouts() {
        let broadcaster = FeedBroadcaster::new(16);
        let mut stream = Box::pin(broadcaster.subscribe().into_stream());
        let args = FeedArgs {
            interval_ms: 5,
            seed: Some(3),
            dropout_every: 2,
            ..FeedArgs::default()
        };
        let producer = tokio::spawn(metrics_producer(args, broadcaster.clone()));

        let first: serde_json::Value =
            serde_json::from_str(&stream.next().await.unwrap()).unwrap();
        let second: serde_json::Value =
            serde_json::from_str(&stream.next().await.unwrap()).unwrap();
        producer.abort();

        assert_eq!(first["status"], "demo");
        assert!(first["rpm"].is_number());
        assert_eq!(second["status"], "disconnected");
        assert_eq!(second["error"], DROPOUT_ERROR);
    }
}
