//! SampleSource trait and the websocket implementation
//!
//! The worker talks to the stream through the [`SampleSource`] trait so the
//! production websocket source and the mock source are interchangeable.
//!
//! [`WebSocketSource`] owns a current-thread tokio runtime and blocks on it
//! from the worker thread; the worker loop itself stays synchronous.

use crate::error::{MapVisError, Result};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// A source of raw binary frames
pub trait SampleSource: Send {
    /// Open the stream
    fn connect(&mut self, url: &str) -> Result<()>;

    /// Close the stream, dropping any connection state
    fn disconnect(&mut self);

    /// Whether a stream is currently open
    fn is_connected(&self) -> bool;

    /// Poll for the next binary frame
    ///
    /// Returns `Ok(None)` when the timeout elapses or non-binary traffic
    /// (ping/pong/text) arrives. A closed or failed stream is an error; the
    /// source disconnects itself before returning it.
    fn recv_frame(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Websocket-backed sample source
pub struct WebSocketSource {
    /// Runtime driving the websocket; built on first connect
    runtime: Option<tokio::runtime::Runtime>,
    stream: Option<WsStream>,
}

impl WebSocketSource {
    /// Create a disconnected source
    pub fn new() -> Self {
        Self {
            runtime: None,
            stream: None,
        }
    }

    fn runtime(&mut self) -> Result<&tokio::runtime::Runtime> {
        if self.runtime.is_none() {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            self.runtime = Some(rt);
        }
        // Populated above
        Ok(self.runtime.as_ref().unwrap())
    }
}

impl Default for WebSocketSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for WebSocketSource {
    fn connect(&mut self, url: &str) -> Result<()> {
        let url = url.to_string();
        let rt = self.runtime()?;
        let (stream, response) = rt.block_on(connect_async(&url))?;
        tracing::debug!("Websocket handshake complete: {:?}", response.status());
        self.stream = Some(stream);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let (Some(rt), Some(mut stream)) = (self.runtime.as_ref(), self.stream.take()) {
            // Best-effort close; the remote may already be gone
            let _ = rt.block_on(async {
                use futures_util::SinkExt;
                stream.close(None).await
            });
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn recv_frame(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(MapVisError::StreamClosed);
        };
        let Some(rt) = self.runtime.as_ref() else {
            return Err(MapVisError::StreamClosed);
        };

        let next = rt.block_on(async { tokio::time::timeout(timeout, stream.next()).await });

        match next {
            // Timeout elapsed with no traffic
            Err(_) => Ok(None),
            Ok(None) => {
                self.stream = None;
                Err(MapVisError::StreamClosed)
            }
            Ok(Some(Err(e))) => {
                self.stream = None;
                Err(e.into())
            }
            Ok(Some(Ok(msg))) => match msg {
                Message::Binary(bytes) => Ok(Some(bytes)),
                Message::Close(_) => {
                    self.stream = None;
                    Err(MapVisError::StreamClosed)
                }
                // The publisher only ever sends binary; ignore control traffic
                _ => Ok(None),
            },
        }
    }
}
