//! Integration tests for the engine logging system
//!
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use lens_flare_engine::lensflare::Engine;
use lens_flare_engine::lensflare::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use lens_flare_engine::lensflare::spectral::dft;
use lens_flare_engine::{engine_err, engine_info, engine_warn};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Captures entries for inspection
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger_receives_macros() {
    let (logger, entries) = CaptureLogger::new();
    Engine::set_logger(logger);

    engine_info!("lensflare::test", "built {} passes", 7);
    engine_warn!("lensflare::test", "surface format fallback");

    let captured = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].message, "built 7 passes");
    assert_eq!(captured[0].source, "lensflare::test");
    assert_eq!(captured[0].file, None);
    assert_eq!(captured[1].severity, LogSeverity::Warn);
}

#[test]
#[serial]
fn test_integration_error_macro_carries_location() {
    let (logger, entries) = CaptureLogger::new();
    Engine::set_logger(logger);

    let error = engine_err!("lensflare::vulkan", "vkQueueSubmit failed: {}", -4);

    let captured = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert_eq!(error.to_string(), "Backend error: vkQueueSubmit failed: -4");
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Error);
    assert!(captured[0].file.is_some_and(|f| f.ends_with("logging_integration_tests.rs")));
    assert!(captured[0].line.is_some());
}

#[test]
#[serial]
fn test_integration_library_errors_are_logged() {
    let (logger, entries) = CaptureLogger::new();
    Engine::set_logger(logger);

    let result = dft(&[1, 2, 3], 2, 2);

    let captured = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert!(result.is_err());
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Error && e.source == "lensflare::spectral"));
}

#[test]
#[serial]
fn test_integration_reset_stops_capture() {
    let (logger, entries) = CaptureLogger::new();
    Engine::set_logger(logger);
    Engine::reset_logger();

    Engine::log(LogSeverity::Info, "lensflare::test", "after reset".to_string());

    assert!(entries.lock().unwrap().is_empty());
}

#[test]
#[serial]
fn test_integration_default_logger_filters_by_severity() {
    Engine::set_logger(DefaultLogger::new(LogSeverity::Error));
    // Below threshold: dropped without output
    Engine::log(LogSeverity::Debug, "lensflare::test", "hidden".to_string());
    Engine::reset_logger();
}
