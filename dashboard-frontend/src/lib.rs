pub mod console_log;
pub mod dashboard_app;
pub mod scan_canvas;
pub mod ws_channel;

pub use dashboard_app::DashboardApp;
pub use scan_canvas::ScanCanvas;
