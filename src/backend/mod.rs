//! Backend module for the stream receive loop
//!
//! This module handles the websocket connection in a separate thread to keep
//! the UI responsive. It uses crossbeam channels for thread-safe
//! communication with the frontend.
//!
//! # Architecture
//!
//! The backend runs in a separate thread from the UI, communicating via
//! channels:
//!
//! - [`BackendCommand`] - Messages sent from UI to backend (connect, clear, etc.)
//! - [`BackendMessage`] - Messages sent from backend to UI (samples, status, errors)
//! - [`FrontendReceiver`] - UI-side handle for sending commands and receiving messages
//! - [`StreamBackend`] - Main backend entry point that owns the worker loop
//!
//! # Components
//!
//! - [`SampleSource`] - Trait seam between the worker and the transport
//! - [`WebSocketSource`] - Production websocket source
//! - [`MockSource`] - Synthetic trajectory source for testing (feature-gated)
//! - [`BackendWorker`] - Main worker loop
//!
//! # Example
//!
//! ```ignore
//! use mapvis_rs::backend::StreamBackend;
//! use mapvis_rs::config::AppConfig;
//!
//! let config = AppConfig::default();
//! let (backend, frontend) = StreamBackend::new(config);
//!
//! std::thread::spawn(move || backend.run());
//!
//! frontend.connect("ws://192.168.1.1:9002");
//!
//! for msg in frontend.drain() {
//!     match msg {
//!         BackendMessage::Sample(sample) => { /* feed the trace */ }
//!         _ => {}
//!     }
//! }
//! ```

#[cfg(feature = "mock-source")]
pub mod mock_source;
pub mod source;
pub mod worker;

#[cfg(feature = "mock-source")]
pub use mock_source::MockSource;
pub use source::{SampleSource, WebSocketSource};
pub use worker::BackendWorker;

use crate::config::AppConfig;
use crate::types::{ConnectionStatus, StreamStats, TraceSample};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Message sent from the UI to the backend
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// Connect to a stream source
    Connect {
        /// Websocket URL of the publisher
        url: String,
    },
    /// Disconnect from the current source
    Disconnect,
    /// Reset the worker's counters and sample clock
    ClearData,
    /// Forward every Nth decoded sample per origin (clamped to >= 1)
    SetSampleStride(u32),
    /// Request current statistics
    RequestStats,
    /// Shutdown the backend
    Shutdown,
    /// Use the mock source instead of the websocket (mock-source feature)
    #[cfg(feature = "mock-source")]
    UseMockSource(bool),
}

/// Message sent from the backend to the UI
#[derive(Debug, Clone)]
pub enum BackendMessage {
    /// Connection status changed
    ConnectionStatus(ConnectionStatus),
    /// Connection or stream error occurred
    ConnectionError(String),
    /// New decoded position sample
    Sample(TraceSample),
    /// A frame failed to decode (the stream continues)
    DecodeError(String),
    /// Statistics update
    Stats(StreamStats),
    /// Backend is shutting down
    Shutdown,
}

/// Frontend receiver for backend messages
pub struct FrontendReceiver {
    /// Receiver for backend messages
    pub receiver: Receiver<BackendMessage>,
    /// Sender for commands to the backend
    pub command_sender: Sender<BackendCommand>,
}

impl FrontendReceiver {
    /// Try to receive a message without blocking
    pub fn try_recv(&self) -> Option<BackendMessage> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending messages
    pub fn drain(&self) -> Vec<BackendMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.receiver.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Send a command to the backend
    pub fn send_command(&self, cmd: BackendCommand) -> bool {
        self.command_sender.send(cmd).is_ok()
    }

    /// Request connection to a stream source
    pub fn connect(&self, url: impl Into<String>) {
        let _ = self
            .command_sender
            .send(BackendCommand::Connect { url: url.into() });
    }

    /// Request disconnection
    pub fn disconnect(&self) {
        let _ = self.command_sender.send(BackendCommand::Disconnect);
    }

    /// Reset worker counters and the sample clock
    pub fn clear_data(&self) {
        let _ = self.command_sender.send(BackendCommand::ClearData);
    }

    /// Set the per-origin sample stride
    pub fn set_sample_stride(&self, stride: u32) {
        let _ = self
            .command_sender
            .send(BackendCommand::SetSampleStride(stride));
    }

    /// Request a statistics update
    pub fn request_stats(&self) {
        let _ = self.command_sender.send(BackendCommand::RequestStats);
    }

    /// Set whether to use the mock source (mock-source feature)
    #[cfg(feature = "mock-source")]
    pub fn use_mock_source(&self, use_mock: bool) {
        let _ = self
            .command_sender
            .send(BackendCommand::UseMockSource(use_mock));
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        let _ = self.command_sender.send(BackendCommand::Shutdown);
    }
}

/// The stream backend that runs in a separate thread
pub struct StreamBackend {
    /// Configuration
    config: AppConfig,
    /// Receiver for commands from the UI
    command_receiver: Receiver<BackendCommand>,
    /// Sender for messages to the UI
    message_sender: Sender<BackendMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
}

impl StreamBackend {
    /// Create a new stream backend with communication channels
    pub fn new(config: AppConfig) -> (Self, FrontendReceiver) {
        let (cmd_tx, cmd_rx) = bounded(256);
        // Bounded for backpressure; the worker drops (and counts) messages
        // instead of blocking when the UI falls behind
        let (msg_tx, msg_rx) = bounded(4096);

        let backend = Self {
            config,
            command_receiver: cmd_rx,
            message_sender: msg_tx,
            running: Arc::new(AtomicBool::new(true)),
        };

        let frontend = FrontendReceiver {
            receiver: msg_rx,
            command_sender: cmd_tx,
        };

        (backend, frontend)
    }

    /// Run the backend loop
    pub fn run(self) {
        let mut worker = BackendWorker::new(
            self.config,
            self.command_receiver,
            self.message_sender,
            self.running,
        );
        worker.run();
    }

    /// Get a handle to stop the backend
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }
}
