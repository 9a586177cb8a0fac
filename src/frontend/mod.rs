//! Frontend module for egui UI
//!
//! This module provides the main UI using eframe/egui. It receives samples
//! from the backend through crossbeam channels and renders the two traces in
//! real-time.
//!
//! # Layout
//!
//! - Top toolbar: source URL, connect/disconnect, clear, sample stride,
//!   reset-view
//! - Central area: SLAM and vehicle trace plots side by side
//! - Bottom: status bar with connection state and stream statistics
//!
//! # Main Types
//!
//! - [`MapVisApp`] - Main application state implementing [`eframe::App`]
//! - [`TraceStore`] - Owned UI-side stream state
//! - [`TraceView`] - Plot configuration and rendering

pub mod plot;
pub mod state;
mod status_bar;

pub use plot::TraceView;
pub use state::TraceStore;

use crate::backend::FrontendReceiver;
use crate::config::{AppConfig, AppState};
use crate::types::{ConnectionStatus, Origin};
use status_bar::render_status_bar;

/// Main application state for the trajectory viewer
pub struct MapVisApp {
    /// Channel handle to the backend
    frontend: FrontendReceiver,
    /// Persistent state (saved on exit)
    app_state: AppState,
    /// Accumulated stream state
    store: TraceStore,
    /// SLAM plot view
    slam_view: TraceView,
    /// Vehicle plot view
    vehicle_view: TraceView,
    /// Source URL being edited in the toolbar
    source_url: String,
    /// Sample stride being edited in the toolbar
    sample_stride: u32,
}

impl MapVisApp {
    /// Create the application
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        frontend: FrontendReceiver,
        config: AppConfig,
        app_state: AppState,
    ) -> Self {
        let source_url = app_state
            .last_source_url
            .clone()
            .unwrap_or_else(|| config.source.url.clone());
        let view = TraceView::from_config(&config.ui, &config.trace);

        Self {
            frontend,
            store: TraceStore::new(config.trace.dedup_min_distance),
            slam_view: view.clone(),
            vehicle_view: view,
            source_url,
            sample_stride: config.stream.sample_stride,
            app_state,
        }
    }

    /// Drain backend messages into the store; returns whether any arrived
    fn process_backend_messages(&mut self) -> bool {
        let mut had_messages = false;
        for msg in self.frontend.drain() {
            self.store.apply(msg);
            had_messages = true;
        }
        had_messages
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Source:");
            let connected = matches!(
                self.store.connection_status,
                ConnectionStatus::Connected | ConnectionStatus::Connecting
            );
            ui.add_enabled(
                !connected,
                egui::TextEdit::singleline(&mut self.source_url).desired_width(220.0),
            );

            if connected {
                if ui.button("Disconnect").clicked() {
                    self.frontend.disconnect();
                }
            } else if ui.button("Connect").clicked() {
                self.frontend.connect(self.source_url.clone());
                self.app_state.set_last_source(self.source_url.clone());
            }

            ui.separator();

            if ui.button("Clear").clicked() {
                // Keep the connection status; only trace data is discarded
                self.store.clear();
                self.frontend.clear_data();
            }

            if ui.button("Reset view").clicked() {
                self.slam_view.reset_view();
                self.vehicle_view.reset_view();
            }

            ui.separator();

            ui.label("Stride:");
            let stride_edit = ui.add(
                egui::DragValue::new(&mut self.sample_stride)
                    .range(1..=100)
                    .speed(0.2),
            );
            if stride_edit.changed() {
                self.frontend.set_sample_stride(self.sample_stride);
            }
        });
    }

    fn render_traces(&mut self, ui: &mut egui::Ui) {
        ui.columns(2, |columns| {
            columns[0].heading(Origin::Slam.to_string());
            self.slam_view.render(&mut columns[0], &self.store.slam);

            columns[1].heading(Origin::Vehicle.to_string());
            self.vehicle_view.render(&mut columns[1], &self.store.vehicle);
        });
    }
}

impl eframe::App for MapVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_messages = self.process_backend_messages();

        if had_messages || self.store.connection_status == ConnectionStatus::Connected {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            render_status_bar(ui, &self.store, &self.source_url);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_traces(ui);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
        self.frontend.shutdown();
    }
}
