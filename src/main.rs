//! Live Trajectory Viewer - Main Entry Point
//!
//! Connects to a robot's trajectory stream and shows the SLAM and vehicle
//! odometry traces side by side. An optional first argument overrides the
//! configured source URL:
//!
//! ```bash
//! mapvis-rs ws://192.168.1.1:9002
//! ```

use mapvis_rs::{
    backend::StreamBackend,
    config::{AppConfig, AppState},
    frontend::MapVisApp,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mapvis_rs=trace")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting trajectory viewer");

    let mut config = AppConfig::load_or_default();
    let app_state = AppState::load_or_default();

    // Command-line URL wins over config and saved state
    if let Some(url) = std::env::args().nth(1) {
        tracing::info!("Using source url from command line: {}", url);
        config.source.url = url;
    }

    // Spawn the backend thread
    let (backend, frontend) = StreamBackend::new(config.clone());
    let backend_handle = std::thread::spawn(move || backend.run());

    // Configure eframe options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 480.0])
            .with_title("Trajectory Viewer"),
        ..Default::default()
    };

    let dark_mode = app_state.ui_preferences.dark_mode;

    // Run the eframe application
    let result = eframe::run_native(
        "Trajectory Viewer",
        native_options,
        Box::new(move |cc| {
            if dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }

            Ok(Box::new(MapVisApp::new(cc, frontend, config, app_state)))
        }),
    );

    // The app's on_exit sent Shutdown; wait for the worker
    tracing::info!("Shutting down...");
    let _ = backend_handle.join();

    result
}
