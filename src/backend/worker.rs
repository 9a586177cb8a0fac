//! Backend Worker Thread Implementation
//!
//! This module contains the main worker loop that runs in a separate thread
//! and owns the stream connection. It communicates with the UI thread
//! through crossbeam channels.
//!
//! # Responsibilities
//!
//! The worker thread handles:
//!
//! - **Command processing**: Responds to UI commands (connect, disconnect,
//!   clear, stride changes)
//! - **Frame receive loop**: Polls the source with a receive timeout
//! - **Decoding**: Turns raw frames into [`TraceSample`]s, counting decode
//!   errors without stopping the stream
//! - **Throttling**: Applies the per-origin sample stride
//! - **Statistics**: Reports stream health to the UI every 500ms
//!
//! # Failure handling
//!
//! A socket-level failure (closed stream, transport error) is terminal for
//! the connection: the worker logs it, reports `ConnectionError`, marks the
//! status `Error`, and waits for the next command. There is no retry logic.

use crate::backend::source::{SampleSource, WebSocketSource};
use crate::backend::{BackendCommand, BackendMessage};
use crate::config::AppConfig;
use crate::protocol::{self, Frame};
use crate::types::{ConnectionStatus, StreamStats, TraceSample};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "mock-source")]
use crate::backend::MockSource;

/// How often stats are pushed to the UI
const STATS_INTERVAL: Duration = Duration::from_millis(500);

/// Idle sleep while disconnected
const IDLE_SLEEP: Duration = Duration::from_millis(20);

/// The backend worker that runs the receive loop
pub struct BackendWorker {
    /// Application configuration
    config: AppConfig,
    /// Command receiver from the UI
    command_rx: Receiver<BackendCommand>,
    /// Message sender to the UI
    message_tx: Sender<BackendMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Stream source (websocket, or mock with the mock-source feature)
    source: Box<dyn SampleSource>,
    /// Whether currently using a mock source
    #[cfg(feature = "mock-source")]
    is_mock_source: bool,
    /// Current connection status
    connection_status: ConnectionStatus,
    /// Start time for sample timestamps
    start_time: Instant,
    /// Forward every Nth decoded sample per origin
    sample_stride: u32,
    /// Per-origin stride counters, indexed by `Origin::index`
    stride_counters: [u32; 2],
    /// Statistics
    stats: StreamStats,
    /// Last time stats were sent to the UI
    last_stats_time: Instant,
    /// Frame count at the last stats push, for rate calculation
    frames_at_last_stats: u64,
}

impl BackendWorker {
    /// Create a new backend worker
    pub fn new(
        config: AppConfig,
        command_rx: Receiver<BackendCommand>,
        message_tx: Sender<BackendMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        let sample_stride = config.stream.sample_stride.max(1);

        Self {
            config,
            command_rx,
            message_tx,
            running,
            source: Box::new(WebSocketSource::new()),
            #[cfg(feature = "mock-source")]
            is_mock_source: false,
            connection_status: ConnectionStatus::Disconnected,
            start_time: Instant::now(),
            sample_stride,
            stride_counters: [0; 2],
            stats: StreamStats::default(),
            last_stats_time: Instant::now(),
            frames_at_last_stats: 0,
        }
    }

    /// Run the main worker loop
    pub fn run(&mut self) {
        tracing::info!("Backend worker started");

        while self.running.load(Ordering::SeqCst) {
            self.process_commands();

            if self.connection_status == ConnectionStatus::Connected {
                self.pump();

                if self.last_stats_time.elapsed() >= STATS_INTERVAL {
                    self.send_stats();
                }
            } else {
                std::thread::sleep(IDLE_SLEEP);
            }
        }

        self.source.disconnect();

        let _ = self.message_tx.send(BackendMessage::Shutdown);
        tracing::info!("Backend worker stopped");
    }

    /// Process pending commands from the UI
    fn process_commands(&mut self) {
        loop {
            match self.command_rx.try_recv() {
                Ok(cmd) => self.handle_command(cmd),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.running.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }
    }

    /// Handle a single command
    fn handle_command(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::Connect { url } => {
                self.handle_connect(&url);
            }
            BackendCommand::Disconnect => {
                self.handle_disconnect();
            }
            BackendCommand::ClearData => {
                self.clear_data();
            }
            BackendCommand::SetSampleStride(stride) => {
                self.sample_stride = stride.max(1);
                self.stride_counters = [0; 2];
            }
            BackendCommand::RequestStats => {
                self.send_stats();
            }
            BackendCommand::Shutdown => {
                self.running.store(false, Ordering::SeqCst);
            }
            #[cfg(feature = "mock-source")]
            BackendCommand::UseMockSource(use_mock) => {
                if self.connection_status != ConnectionStatus::Disconnected {
                    self.source.disconnect();
                    self.update_connection_status(ConnectionStatus::Disconnected);
                }

                if use_mock && !self.is_mock_source {
                    self.source = Box::new(MockSource::new());
                    self.is_mock_source = true;
                    tracing::info!("Switched to mock source");
                } else if !use_mock && self.is_mock_source {
                    self.source = Box::new(WebSocketSource::new());
                    self.is_mock_source = false;
                    tracing::info!("Switched to websocket source");
                }
            }
        }
    }

    /// Handle connect command
    fn handle_connect(&mut self, url: &str) {
        // A connect while already streaming replaces the stream; close the
        // old one first so it gets a proper close frame
        if self.source.is_connected() {
            self.source.disconnect();
        }

        self.update_connection_status(ConnectionStatus::Connecting);

        match self.source.connect(url) {
            Ok(()) => {
                self.start_time = Instant::now();
                self.stats = StreamStats::default();
                self.stride_counters = [0; 2];
                self.frames_at_last_stats = 0;
                self.last_stats_time = Instant::now();
                self.update_connection_status(ConnectionStatus::Connected);
                tracing::info!("Connected to stream at {}", url);
            }
            Err(e) => {
                self.update_connection_status(ConnectionStatus::Error);
                let error_msg = format!("Failed to connect to {}: {}", url, e);
                tracing::error!("{}", error_msg);
                let _ = self
                    .message_tx
                    .send(BackendMessage::ConnectionError(error_msg));
            }
        }
    }

    /// Handle disconnect command
    fn handle_disconnect(&mut self) {
        self.source.disconnect();
        self.update_connection_status(ConnectionStatus::Disconnected);
        tracing::info!("Disconnected from stream");
    }

    /// Reset counters and the sample clock
    fn clear_data(&mut self) {
        self.start_time = Instant::now();
        self.stats = StreamStats::default();
        self.stride_counters = [0; 2];
        self.frames_at_last_stats = 0;
    }

    /// Pull one frame off the source, if any, and process it
    fn pump(&mut self) {
        let timeout = Duration::from_millis(self.config.source.recv_timeout_ms);

        match self.source.recv_frame(timeout) {
            Ok(Some(bytes)) => self.handle_frame(&bytes),
            // Timeout or control traffic
            Ok(None) => {}
            Err(e) => {
                // Terminal for this connection: report and stop updating
                tracing::error!("Stream failure: {}", e);
                self.source.disconnect();
                self.update_connection_status(ConnectionStatus::Error);
                let _ = self
                    .message_tx
                    .send(BackendMessage::ConnectionError(format!(
                        "Stream failure: {}",
                        e
                    )));
            }
        }
    }

    /// Decode a frame and forward the sample if the stride admits it
    fn handle_frame(&mut self, bytes: &[u8]) {
        self.stats.frames_received += 1;
        self.stats.bytes_received += bytes.len() as u64;

        let frame = match protocol::decode_frame(bytes) {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.decode_errors += 1;
                tracing::warn!("Dropping undecodable frame: {}", e);
                self.try_send_message(BackendMessage::DecodeError(e.to_string()));
                return;
            }
        };
        self.stats.frames_decoded += 1;

        if let Frame::Slam {
            is_keyframe: true,
            tracking_state,
            ..
        } = frame
        {
            self.stats.keyframes += 1;
            tracing::trace!("Keyframe pose (tracking state {})", tracking_state);
        }

        let origin = frame.origin();
        let counter = &mut self.stride_counters[origin.index()];
        *counter += 1;
        if *counter < self.sample_stride {
            self.stats.samples_throttled += 1;
            return;
        }
        *counter = 0;

        let (x, y) = frame.position();
        let sample = TraceSample::new(origin, x, y, self.start_time.elapsed());
        if self.try_send_message(BackendMessage::Sample(sample)) {
            self.stats.samples_emitted += 1;
        }
    }

    /// Update connection status and notify UI
    fn update_connection_status(&mut self, status: ConnectionStatus) {
        self.connection_status = status;
        let _ = self
            .message_tx
            .send(BackendMessage::ConnectionStatus(status));
    }

    /// Send statistics to UI (using try_send for backpressure)
    fn send_stats(&mut self) {
        let elapsed = self.last_stats_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            let frames = self.stats.frames_received - self.frames_at_last_stats;
            self.stats.frame_rate = frames as f64 / elapsed;
        }
        self.frames_at_last_stats = self.stats.frames_received;
        self.last_stats_time = Instant::now();

        let stats = self.stats.clone();
        self.try_send_message(BackendMessage::Stats(stats));
    }

    /// Try to send a message, tracking dropped messages if the queue is full
    fn try_send_message(&mut self, msg: BackendMessage) -> bool {
        if self.message_tx.try_send(msg).is_ok() {
            true
        } else {
            self.stats.dropped_messages += 1;
            false
        }
    }
}
