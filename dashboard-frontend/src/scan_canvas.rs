//! Decorative range-scan canvas.
//!
//! Redraws a random scan on every tick and keeps the canvas sized to its
//! container, so window resizes are picked up on the next frame.

use std::f64::consts::PI;

use dashboard_shared::scan::{scan_frame, ScanFrame, MARKER_SIZE, POINT_RADIUS};
use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

/// Redraw period, roughly one display frame.
const FRAME_INTERVAL_MS: u32 = 16;

#[derive(Properties, PartialEq)]
pub struct ScanCanvasProps {
    #[prop_or("lidar-canvas".into())]
    pub id: AttrValue,
}

pub struct ScanCanvas {
    canvas_ref: NodeRef,
    _redraw_handle: Interval,
}

pub enum ScanMsg {
    Redraw,
}

impl Component for ScanCanvas {
    type Message = ScanMsg;
    type Properties = ScanCanvasProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let handle = Interval::new(FRAME_INTERVAL_MS, move || {
            link.send_message(ScanMsg::Redraw);
        });

        Self {
            canvas_ref: NodeRef::default(),
            _redraw_handle: handle,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ScanMsg::Redraw => {
                if let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() {
                    fit_to_container(&canvas);
                    draw(&canvas);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <canvas id={ctx.props().id.clone()} ref={self.canvas_ref.clone()}></canvas>
        }
    }
}

fn fit_to_container(canvas: &HtmlCanvasElement) {
    let Some(parent) = canvas.parent_element() else {
        return;
    };
    let rect = parent.get_bounding_client_rect();
    let width = rect.width().max(0.0) as u32;
    let height = rect.height().max(0.0) as u32;
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }
}

fn draw(canvas: &HtmlCanvasElement) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(c) => c,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let frame = scan_frame(width, height, js_sys::Math::random);

    ctx.set_fill_style_str("#000");
    ctx.fill_rect(0.0, 0.0, width, height);
    draw_frame(&ctx, &frame);
}

fn draw_frame(ctx: &CanvasRenderingContext2d, frame: &ScanFrame) {
    let (x, y) = frame.origin;
    let (w, h) = MARKER_SIZE;
    ctx.set_fill_style_str("#007bff");
    ctx.fill_rect(x - w / 2.0, y - h / 2.0, w, h);

    for point in &frame.points {
        ctx.set_fill_style_str(&format!("rgba(0, 245, 212, {:.3})", point.alpha));
        ctx.begin_path();
        if ctx
            .arc(point.x, point.y, POINT_RADIUS, 0.0, PI * 2.0)
            .is_ok()
        {
            ctx.fill();
        }
    }
}
