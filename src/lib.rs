//! # MapVis-RS: Live Trajectory Viewer
//!
//! A diagnostic viewer that connects to a robot's trajectory stream over a
//! websocket, decodes fixed-layout binary frames into 2D position samples
//! tagged with an origin flag (SLAM tracker or vehicle odometry), and renders
//! a live trace per origin side by side.
//!
//! ## Architecture
//!
//! - **Backend**: Owns the websocket in a separate thread, decodes frames,
//!   applies the per-origin sample stride
//! - **Frontend**: Renders the UI using eframe/egui with egui_plot for the
//!   trace plots
//! - **Communication**: Crossbeam channels for thread-safe data transfer
//!
//! ## Trace bookkeeping
//!
//! Each origin accumulates its accepted points in a [`types::TraceSeries`]:
//! near-duplicate points (closer than a small Euclidean threshold to the last
//! accepted point) are suppressed, and running min/max bounds drive a
//! square-aspect, padded plot window ([`axis::square_range`]).
//!
//! ## Example
//!
//! ```ignore
//! use mapvis_rs::{
//!     backend::StreamBackend,
//!     config::{AppConfig, AppState},
//!     frontend::MapVisApp,
//! };
//!
//! fn main() -> eframe::Result<()> {
//!     let config = AppConfig::load_or_default();
//!     let app_state = AppState::load_or_default();
//!
//!     let (backend, frontend) = StreamBackend::new(config.clone());
//!     std::thread::spawn(move || backend.run());
//!
//!     let native_options = eframe::NativeOptions::default();
//!     eframe::run_native(
//!         "MapVis-RS",
//!         native_options,
//!         Box::new(|cc| {
//!             Ok(Box::new(MapVisApp::new(cc, frontend, config, app_state)))
//!         }),
//!     )
//! }
//! ```

pub mod app;
pub mod axis;
pub mod backend;
pub mod config;
pub mod error;
pub mod frontend;
pub mod protocol;
pub mod types;

// Re-export commonly used types
pub use app::MapVisApp;
pub use backend::{BackendCommand, BackendMessage, StreamBackend};
pub use config::{AppConfig, AppState};
pub use error::{MapVisError, Result};
pub use protocol::Frame;
pub use types::{Origin, TraceSample, TraceSeries};
