use dashboard_frontend::{console_log, DashboardApp};
use dashboard_shared::{DashboardConfig, Placeholder};
use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    let window = web_sys::window().expect("no global `window` exists");
    let document = window.document().expect("should have a document on window");
    let root = document.get_element_by_id("app");
    let attr = |name: &str| root.as_ref().and_then(|el| el.get_attribute(name));

    console_log::init(console_log::level_from_attr(attr("data-log-level").as_deref()));

    let defaults = DashboardConfig::default();
    let config = DashboardConfig {
        metrics_url: attr("data-metrics-url").unwrap_or(defaults.metrics_url),
        camera_url: attr("data-camera-url").unwrap_or(defaults.camera_url),
        placeholder: attr("data-placeholder")
            .and_then(|p| Placeholder::from_attr(&p))
            .unwrap_or(defaults.placeholder),
    };

    let show_scan = attr("data-show-scan").map(|v| v != "false").unwrap_or(true);

    html! {
        <DashboardApp {config} {show_scan} />
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
