//! Status bar panel: bottom bar showing connection, stream, and error info.

use egui::{Color32, RichText, Ui};

use crate::frontend::state::TraceStore;
use crate::types::ConnectionStatus;

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, store: &TraceStore, source_url: &str) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Connection status dot + source ===
        let (status_color, status_text) = match store.connection_status {
            ConnectionStatus::Connected => (Color32::GREEN, "Connected"),
            ConnectionStatus::Connecting => (Color32::YELLOW, "Connecting"),
            ConnectionStatus::Disconnected => (Color32::GRAY, "Disconnected"),
            ConnectionStatus::Error => (Color32::RED, "Error"),
        };
        ui.colored_label(status_color, "●");
        ui.label(RichText::new(format!("{}: {}", status_text, source_url)).small());

        ui.separator();

        let stats = &store.stats;

        // === Frame rate ===
        let rate_color = if stats.frame_rate > 0.0 {
            Color32::from_rgb(100, 255, 100)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new("Rate:").small());
        ui.colored_label(
            rate_color,
            RichText::new(format!("{:.1} Hz", stats.frame_rate)).small(),
        );

        ui.separator();

        // === Per-trace point counts ===
        ui.label(
            RichText::new(format!(
                "SLAM: {} pts ({} dup)",
                store.slam.len(),
                store.slam.rejected
            ))
            .small(),
        );
        ui.label(
            RichText::new(format!(
                "Vehicle: {} pts ({} dup)",
                store.vehicle.len(),
                store.vehicle.rejected
            ))
            .small(),
        );

        ui.separator();

        // === Keyframes ===
        ui.label(RichText::new(format!("KF: {}", stats.keyframes)).small());

        ui.separator();

        // === Decode errors ===
        let error_color = if stats.decode_errors > 0 {
            Color32::LIGHT_RED
        } else {
            Color32::GRAY
        };
        ui.colored_label(
            error_color,
            RichText::new(format!("Bad frames: {}", stats.decode_errors)).small(),
        );

        ui.separator();

        // === Data transferred ===
        let kb = stats.bytes_received as f64 / 1024.0;
        let data_text = if kb > 1024.0 {
            format!("Data: {:.2} MB", kb / 1024.0)
        } else {
            format!("Data: {:.2} KB", kb)
        };
        ui.label(RichText::new(data_text).small());

        // === Error message (right-aligned) ===
        if let Some(error) = store.last_error.as_deref() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}
