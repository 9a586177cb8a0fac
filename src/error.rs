//! Error handling for the MapVis-RS application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application.

use thiserror::Error;

/// Main error type for MapVis-RS operations
#[derive(Error, Debug)]
pub enum MapVisError {
    /// Errors from the websocket transport
    #[error("Websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The upstream closed the stream
    #[error("Stream closed by remote")]
    StreamClosed,

    /// Frame shorter than the fixed layout requires
    #[error("Frame too short: {len} bytes (layout needs {need})")]
    FrameTooShort { len: usize, need: usize },

    /// Leading tag byte does not name a known origin
    #[error("Unknown origin tag: {0:#04x}")]
    UnknownOriginTag(u8),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<MapVisError>,
    },
}

impl MapVisError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        MapVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for MapVis-RS operations
pub type Result<T> = std::result::Result<T, MapVisError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
