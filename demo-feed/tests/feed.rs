//! End-to-end: the demo feed's messages drive the dashboard state.

use std::time::Duration;

use dashboard_shared::{
    parse_inbound, CameraCommand, Dashboard, DashboardConfig, Effect, Inbound, MetricName,
    StatusLevel, StatusTag,
};
use demo_feed::{serve, FeedArgs};
use futures::StreamExt;
use tokio::net::TcpListener;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

async fn start_feed(args: FeedArgs) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, args));
    format!("ws://{addr}")
}

fn fast_args() -> FeedArgs {
    FeedArgs {
        interval_ms: 20,
        frame_interval_ms: 20,
        frame_width: 64,
        frame_height: 48,
        seed: Some(11),
        ..FeedArgs::default()
    }
}

async fn next_text<S>(stream: &mut S) -> String
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(RECV_TIMEOUT, stream.next())
            .await
            .expect("timed out waiting for message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = message {
            return text.to_string();
        }
    }
}

#[tokio::test]
async fn test_metrics_feed_fills_dashboard() {
    let base = start_feed(fast_args()).await;
    let (mut socket, _) = connect_async(format!("{base}/ws/metrics")).await.unwrap();

    let mut dashboard = Dashboard::new(DashboardConfig::default());
    dashboard.metrics_connecting();
    dashboard.metrics_opened();

    let text = next_text(&mut socket).await;
    match parse_inbound(&text).unwrap() {
        Inbound::Metrics(message) => {
            assert_eq!(message.status, Some(StatusTag::Demo));
            assert!(message.field(MetricName::Rpm).is_some());
        }
        Inbound::Frame(_) => panic!("frame on metrics channel"),
    }

    assert!(dashboard.metrics_message(&text).is_none());
    assert_eq!(dashboard.status().text, "Status: Running in Demo Mode");
    for name in [MetricName::Rpm, MetricName::Speed, MetricName::IdlingTime] {
        assert!(!dashboard.slots().get(name).is_placeholder(), "{name} empty");
    }
    assert_eq!(dashboard.slots().get(MetricName::IgnitionState).text(), Some("Running"));
}

#[tokio::test]
async fn test_dropout_resets_dashboard() {
    let args = FeedArgs {
        mode: demo_feed::simulator::FeedMode::Connected,
        dropout_every: 2,
        ..fast_args()
    };
    let base = start_feed(args).await;
    let (mut socket, _) = connect_async(format!("{base}/ws/metrics")).await.unwrap();

    let mut dashboard = Dashboard::new(DashboardConfig::default());
    dashboard.metrics_connecting();
    dashboard.metrics_opened();

    for _ in 0..10 {
        let text = next_text(&mut socket).await;
        dashboard.metrics_message(&text);
        if dashboard.status().level == StatusLevel::Error {
            assert_eq!(
                dashboard.status().text,
                "Status: OBD-II Connection Lost: adapter lost"
            );
            assert!(dashboard.slots().all_placeholder());
            return;
        }
    }
    panic!("no dropout seen");
}

#[tokio::test]
async fn test_camera_feed_streams_jpeg_frames() {
    let base = start_feed(fast_args()).await;

    let mut dashboard = Dashboard::new(DashboardConfig::default());
    let CameraCommand::Open(session) = dashboard.camera_toggle() else {
        panic!("toggle from off should open");
    };
    let (mut socket, _) = connect_async(format!("{base}/ws/camera")).await.unwrap();
    dashboard.camera_opened(session);

    for expected in 1..=3u64 {
        let text = next_text(&mut socket).await;
        match dashboard.camera_message(session, &text) {
            Some(Effect::ShowFrame(frame)) => assert!(frame.looks_like_jpeg()),
            other => panic!("expected a frame, got {other:?}"),
        }
        assert_eq!(dashboard.camera().frames_received(), expected);
    }
    assert!(dashboard.camera().is_streaming());
    assert!(dashboard.camera().image_visible());
}
