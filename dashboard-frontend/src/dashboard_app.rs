//! Vehicle telemetry dashboard component.
//!
//! Owns the single [`Dashboard`] state object and both channel tasks. Every
//! socket callback is turned into a [`Msg`], applied to the state, and the
//! returned effect is carried out here (blob URLs, closing the camera).

use dashboard_shared::{
    resolve_ws_url, CameraCommand, Dashboard, DashboardConfig, Effect, MetricName, PageOrigin,
    SessionId,
};
use futures_util::future::AbortHandle;
use web_sys::{Blob, Url};
use yew::prelude::*;

use crate::scan_canvas::ScanCanvas;
use crate::ws_channel::{open_channel, page_origin, ChannelEvent};

/// 1x1 transparent GIF used while no frame is shown.
const EMPTY_IMAGE: &str = "data:image/gif;base64,R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";

#[derive(Properties, PartialEq)]
pub struct DashboardAppProps {
    pub config: DashboardConfig,
    /// Show the decorative scan panel
    #[prop_or(true)]
    pub show_scan: bool,
}

pub enum Msg {
    Metrics(ChannelEvent),
    Camera(SessionId, ChannelEvent),
    ToggleCamera,
}

pub struct DashboardApp {
    dashboard: Dashboard,
    origin: PageOrigin,
    metrics_task: Option<AbortHandle>,
    camera_task: Option<(SessionId, AbortHandle)>,
    /// Blob URL of the frame currently shown (revoked when replaced)
    frame_url: Option<String>,
}

impl Component for DashboardApp {
    type Message = Msg;
    type Properties = DashboardAppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut app = Self {
            dashboard: Dashboard::new(ctx.props().config.clone()),
            origin: page_origin(),
            metrics_task: None,
            camera_task: None,
            frame_url: None,
        };
        app.connect_metrics(ctx);
        app
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let effect = match msg {
            Msg::Metrics(event) => self.on_metrics_event(event),
            Msg::Camera(session, event) => self.on_camera_event(session, event),
            Msg::ToggleCamera => {
                match self.dashboard.camera_toggle() {
                    CameraCommand::Open(session) => self.connect_camera(ctx, session),
                    CameraCommand::Close(session) => self.close_camera(session),
                }
                None
            }
        };

        match effect {
            Some(Effect::ShowFrame(frame)) => self.show_frame(&frame.jpeg),
            Some(Effect::CloseCamera(session)) => self.close_camera(session),
            None => {}
        }
        if !self.dashboard.camera().image_visible() {
            self.clear_frame();
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let status = self.dashboard.status();

        html! {
            <div class="dashboard">
                <div id="status" class={status.css_classes()}>{&status.text}</div>
                <div class="metrics-grid">
                    { for MetricName::ALL.iter().map(|name| self.view_metric(*name)) }
                </div>
                <div class="media-row">
                    { self.view_camera(ctx) }
                    if ctx.props().show_scan {
                        <div class="panel lidar-container">
                            <h2>{"Range Scan"}</h2>
                            <div class="lidar-surface">
                                <ScanCanvas />
                            </div>
                        </div>
                    }
                </div>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(task) = self.metrics_task.take() {
            task.abort();
        }
        if let Some((_, task)) = self.camera_task.take() {
            task.abort();
        }
        self.clear_frame();
    }
}

impl DashboardApp {
    fn connect_metrics(&mut self, ctx: &Context<Self>) {
        self.dashboard.metrics_connecting();
        match resolve_ws_url(&self.dashboard.config().metrics_url, &self.origin) {
            Ok(url) => {
                log::info!("connecting metrics channel to {url}");
                let callback = ctx.link().callback(Msg::Metrics);
                self.metrics_task = Some(open_channel(&url, callback));
            }
            Err(e) => {
                self.dashboard.metrics_failed(&e.to_string());
            }
        }
    }

    fn connect_camera(&mut self, ctx: &Context<Self>, session: SessionId) {
        match resolve_ws_url(&self.dashboard.config().camera_url, &self.origin) {
            Ok(url) => {
                log::info!("{session}: connecting to {url}");
                let callback = ctx
                    .link()
                    .callback(move |event| Msg::Camera(session, event));
                self.camera_task = Some((session, open_channel(&url, callback)));
            }
            Err(e) => self.dashboard.camera_failed(session, &e.to_string()),
        }
    }

    fn on_metrics_event(&mut self, event: ChannelEvent) -> Option<Effect> {
        match event {
            ChannelEvent::Opened => {
                self.dashboard.metrics_opened();
                None
            }
            ChannelEvent::Text(text) => self.dashboard.metrics_message(&text),
            ChannelEvent::Closed => {
                self.metrics_task = None;
                self.dashboard.metrics_closed()
            }
            ChannelEvent::Error(e) => {
                self.metrics_task = None;
                self.dashboard.metrics_error(&e)
            }
            ChannelEvent::Failed(reason) => {
                self.metrics_task = None;
                self.dashboard.metrics_failed(&reason)
            }
        }
    }

    fn on_camera_event(&mut self, session: SessionId, event: ChannelEvent) -> Option<Effect> {
        match event {
            ChannelEvent::Opened => {
                self.dashboard.camera_opened(session);
                None
            }
            ChannelEvent::Text(text) => self.dashboard.camera_message(session, &text),
            ChannelEvent::Closed | ChannelEvent::Error(_) => {
                self.drop_camera_task(session);
                self.dashboard.camera_closed(session);
                None
            }
            ChannelEvent::Failed(reason) => {
                self.drop_camera_task(session);
                self.dashboard.camera_failed(session, &reason);
                None
            }
        }
    }

    /// Close the camera socket without waiting for the server.
    fn close_camera(&mut self, session: SessionId) {
        if let Some((current, task)) = self.camera_task.take() {
            if current == session {
                task.abort();
            } else {
                self.camera_task = Some((current, task));
            }
        }
        self.clear_frame();
    }

    fn drop_camera_task(&mut self, session: SessionId) {
        if matches!(self.camera_task, Some((current, _)) if current == session) {
            self.camera_task = None;
        }
    }

    fn show_frame(&mut self, jpeg: &[u8]) {
        match create_blob_url(jpeg) {
            Ok(url) => {
                if let Some(old_url) = self.frame_url.replace(url) {
                    let _ = Url::revoke_object_url(&old_url);
                }
            }
            Err(e) => log::warn!("failed to create frame blob: {e:?}"),
        }
    }

    fn clear_frame(&mut self) {
        if let Some(url) = self.frame_url.take() {
            let _ = Url::revoke_object_url(&url);
        }
    }

    fn view_metric(&self, name: MetricName) -> Html {
        let slot = self.dashboard.slots().get(name);
        let text = slot.display_text(&self.dashboard.config().placeholder);

        html! {
            <div class="metric-card">
                <div class="metric-label">{name.label()}</div>
                <div id={name.key()} class={slot.css_classes()}>{text}</div>
                if !name.unit().is_empty() {
                    <div class="metric-unit">{name.unit()}</div>
                }
            </div>
        }
    }

    fn view_camera(&self, ctx: &Context<Self>) -> Html {
        let camera = self.dashboard.camera();
        let src = self
            .frame_url
            .clone()
            .unwrap_or_else(|| EMPTY_IMAGE.to_string());
        let image_style = if camera.image_visible() {
            "display: block;"
        } else {
            "display: none;"
        };
        let placeholder_style = if camera.placeholder_visible() {
            "display: flex;"
        } else {
            "display: none;"
        };

        html! {
            <div class="panel camera-container">
                <h2>{"Camera"}</h2>
                <div class="camera-surface">
                    <div id="camera-placeholder" class="camera-placeholder" style={placeholder_style}>
                        {camera.placeholder_text()}
                    </div>
                    <img
                        id="cameraFeed"
                        class="image-frame"
                        src={src}
                        alt="Annotated camera stream"
                        style={image_style}
                    />
                </div>
                <div class="camera-controls">
                    <button
                        id="camera-toggle"
                        class={if camera.is_active() { "toggle active" } else { "toggle" }}
                        onclick={ctx.link().callback(|_| Msg::ToggleCamera)}
                    >
                        {camera.toggle_label()}
                    </button>
                    if camera.is_active() {
                        <span class="frame-count">
                            {format!("{} frames", camera.frames_received())}
                        </span>
                    }
                </div>
            </div>
        }
    }
}

/// Create a blob URL from JPEG data.
fn create_blob_url(jpeg_data: &[u8]) -> Result<String, wasm_bindgen::JsValue> {
    let uint8_array = js_sys::Uint8Array::from(jpeg_data);
    let array = js_sys::Array::new();
    array.push(&uint8_array);

    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/jpeg");

    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &options)?;
    Url::create_object_url_with_blob(&blob)
}
