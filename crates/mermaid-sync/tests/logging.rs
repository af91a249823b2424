//! Tests for logging setup and for passes running under a subscriber

use mermaid_sync::core::logging::{init_logging, LogFormat};
use mermaid_sync::memory::{MemoryDocument, RecordingEngine};
use mermaid_sync::{SyncConfig, Synchronizer};
use std::str::FromStr;
use tracing_subscriber::util::SubscriberInitExt;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("invalid").is_err());
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_init_logging_repeated_calls_do_not_panic() {
    // Only the first call can install the global subscriber
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("trace"), Some("json"));
    let _ = init_logging(Some("off"), Some("pretty"));
    let _ = init_logging(None, None);
}

#[test]
fn test_pass_under_trace_subscriber() {
    let _guard = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .set_default();

    let mut doc = MemoryDocument::new();
    let body = doc.body();
    doc.append_fenced_block(body, "language-mermaid", "graph LR; A-->B");

    let mut sync = Synchronizer::new(doc, Some(RecordingEngine::new()), SyncConfig::default());
    let report = sync.synchronize().unwrap();
    assert_eq!(report.converted, 1);
}
