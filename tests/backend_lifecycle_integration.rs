//! Integration tests for backend lifecycle
//!
//! These tests validate the complete backend workflow against the mock
//! source:
//! - Startup and clean shutdown
//! - Connection, streaming, and disconnection
//! - Stride changes while streaming

use mapvis_rs::backend::StreamBackend;
use mapvis_rs::config::AppConfig;
use std::thread;
use std::time::Duration;

#[cfg(feature = "mock-source")]
use mapvis_rs::backend::BackendMessage;
#[cfg(feature = "mock-source")]
use mapvis_rs::types::ConnectionStatus;

#[test]
fn test_backend_creation_and_shutdown() {
    let config = AppConfig::default();
    let (backend, frontend) = StreamBackend::new(config);

    // Spawn backend thread
    let handle = thread::spawn(move || backend.run());

    // Give it a moment to initialize
    thread::sleep(Duration::from_millis(50));

    // Shutdown
    frontend.shutdown();

    // Backend should exit cleanly
    let result = handle.join();
    assert!(result.is_ok(), "Backend thread should exit cleanly");
}

#[test]
#[cfg(feature = "mock-source")]
fn test_backend_streams_from_mock_source() {
    let mut config = AppConfig::default();
    config.stream.sample_stride = 1;

    let (backend, frontend) = StreamBackend::new(config);
    let handle = thread::spawn(move || backend.run());

    // Enable the mock source, then connect (URL is ignored)
    frontend.use_mock_source(true);
    thread::sleep(Duration::from_millis(50));
    frontend.connect("ws://ignored");

    // Wait for samples
    thread::sleep(Duration::from_millis(200));

    let messages = frontend.drain();
    let connected = messages.iter().any(|msg| {
        matches!(
            msg,
            BackendMessage::ConnectionStatus(ConnectionStatus::Connected)
        )
    });
    assert!(connected, "Should receive connected status");

    let sample_count = messages
        .iter()
        .filter(|msg| matches!(msg, BackendMessage::Sample(_)))
        .count();
    assert!(sample_count > 0, "Mock source should produce samples");

    // Cleanup
    frontend.disconnect();
    thread::sleep(Duration::from_millis(50));
    frontend.shutdown();
    handle.join().unwrap();
}

#[test]
#[cfg(feature = "mock-source")]
fn test_backend_disconnect_stops_samples() {
    let mut config = AppConfig::default();
    config.stream.sample_stride = 1;

    let (backend, frontend) = StreamBackend::new(config);
    let handle = thread::spawn(move || backend.run());

    frontend.use_mock_source(true);
    frontend.connect("ws://ignored");
    thread::sleep(Duration::from_millis(100));

    frontend.disconnect();
    thread::sleep(Duration::from_millis(100));
    frontend.drain();

    // No more samples after disconnect
    thread::sleep(Duration::from_millis(100));
    let after = frontend.drain();
    assert!(
        !after.iter().any(|msg| matches!(msg, BackendMessage::Sample(_))),
        "No samples should arrive while disconnected"
    );

    frontend.shutdown();
    handle.join().unwrap();
}

#[test]
#[cfg(feature = "mock-source")]
fn test_backend_stats_reported_while_streaming() {
    let (backend, frontend) = StreamBackend::new(AppConfig::default());
    let handle = thread::spawn(move || backend.run());

    frontend.use_mock_source(true);
    frontend.connect("ws://ignored");
    thread::sleep(Duration::from_millis(100));

    frontend.request_stats();
    thread::sleep(Duration::from_millis(100));

    let messages = frontend.drain();
    let stats = messages.iter().find_map(|msg| match msg {
        BackendMessage::Stats(stats) => Some(stats.clone()),
        _ => None,
    });

    let stats = stats.expect("Should receive a stats update");
    assert!(stats.frames_received > 0);
    assert_eq!(stats.decode_errors, 0);

    frontend.shutdown();
    handle.join().unwrap();
}
