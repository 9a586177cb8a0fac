//! Configuration module for MapVis-RS
//!
//! This module handles application configuration:
//! - [`AppConfig`] - runtime configuration (source URL, stream shaping, trace
//!   and UI tuning), loadable from a `mapvis.toml` file
//! - [`AppState`] - persistent state (last source URL, UI preferences),
//!   stored as JSON in the platform data directory
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.hxyulin.mapvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.mapvis-rs/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.mapvis-rs\`

use crate::axis::{DEFAULT_AXIS_PADDING, DEFAULT_AXIS_TICKS};
use crate::error::{MapVisError, Result};
use crate::types::DEFAULT_DEDUP_MIN_DISTANCE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.hxyulin.mapvis-rs";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Config filename looked up in the working directory
pub const CONFIG_FILE: &str = "mapvis.toml";

/// Default stream source (the robot's onboard publisher)
pub const DEFAULT_SOURCE_URL: &str = "ws://192.168.1.1:9002";

/// Default per-origin sample stride (forward every Nth sample)
pub const DEFAULT_SAMPLE_STRIDE: u32 = 5;

/// Default receive timeout while polling the socket, in milliseconds
pub const DEFAULT_RECV_TIMEOUT_MS: u64 = 50;

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        MapVisError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            MapVisError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// Stream source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Websocket URL of the publisher
    pub url: String,
    /// Receive timeout per poll, milliseconds
    pub recv_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            recv_timeout_ms: DEFAULT_RECV_TIMEOUT_MS,
        }
    }
}

/// Stream shaping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Forward every Nth decoded sample per origin (1 = every sample)
    pub sample_stride: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}

/// Trace bookkeeping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Minimum distance between consecutive accepted points
    pub dedup_min_distance: f64,
    /// Axis padding fraction
    pub axis_padding: f64,
    /// Tick positions per axis
    pub axis_ticks: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            dedup_min_distance: DEFAULT_DEDUP_MIN_DISTANCE,
            axis_padding: DEFAULT_AXIS_PADDING,
            axis_ticks: DEFAULT_AXIS_TICKS,
        }
    }
}

/// UI tuning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show grid lines on the plots
    pub show_grid: bool,
    /// Trace line width
    pub line_width: f32,
    /// Show markers at accepted points
    pub show_markers: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            line_width: 1.5,
            show_markers: false,
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub stream: StreamConfig,
    pub trace: TraceConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| MapVisError::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| MapVisError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load `mapvis.toml` from the working directory if present, defaults
    /// otherwise
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load {}, using defaults: {}", CONFIG_FILE, e);
            Self::default()
        })
    }

    /// Save configuration as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MapVisError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| MapVisError::Config(format!("Failed to write config: {}", e)))
    }
}

/// UI preferences that persist across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPreferences {
    /// Dark theme
    pub dark_mode: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

/// Persistent application state
///
/// Stores user preferences and history that persist across sessions,
/// separate from the runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Last source URL the user connected to
    #[serde(default)]
    pub last_source_url: Option<String>,

    /// UI preferences
    #[serde(default)]
    pub ui_preferences: UiPreferences,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            last_source_url: None,
            ui_preferences: UiPreferences::default(),
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path()
            .ok_or_else(|| MapVisError::Config("Could not determine app state path".to_string()))?;
        Self::load_from(&path)
    }

    /// Load app state from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| MapVisError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| MapVisError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(&dir.join(APP_STATE_FILE))
    }

    /// Save app state to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| MapVisError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| MapVisError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Record the URL of a successful connection
    pub fn set_last_source(&mut self, url: impl Into<String>) {
        self.last_source_url = Some(url.into());
    }
}
