//! Logging setup
//!
//! Every synchronization pass runs inside a `synchronize` span and reports
//! what it converted through `tracing` events. This module installs a
//! subscriber for those events: `tracing-subscriber` on native targets (tests,
//! tooling) and `tracing-wasm` in the browser, where output goes to the
//! developer console.
//!
//! # Log Formats
//!
//! - `compact`: single line per event (default)
//! - `pretty`: multi-line with source locations
//! - `json`: one JSON object per event
//!
//! # Environment Variables
//!
//! - `MERMAID_SYNC_LOG_LEVEL`: trace|debug|info|warn|error|off
//! - `RUST_LOG`: standard `EnvFilter` directives, e.g.
//!   `RUST_LOG="info,mermaid_sync::sync::plan=trace"`
//! - `MERMAID_SYNC_LOG_FORMAT`: compact|pretty|json

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

#[cfg(not(target_arch = "wasm32"))]
const LEVEL_ENV: &str = "MERMAID_SYNC_LOG_LEVEL";
#[cfg(not(target_arch = "wasm32"))]
const FORMAT_ENV: &str = "MERMAID_SYNC_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Install the global subscriber
///
/// `level` falls back to `MERMAID_SYNC_LOG_LEVEL`, then `RUST_LOG`, then
/// `info`. `format` falls back to `MERMAID_SYNC_LOG_FORMAT`, then `compact`.
/// Both arguments are ignored in the browser, where `tracing-wasm` always
/// writes to the console.
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let log_level = level
            .map(str::to_string)
            .or_else(|| std::env::var(LEVEL_ENV).ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string());

        let log_format = format
            .map(str::to_string)
            .or_else(|| std::env::var(FORMAT_ENV).ok())
            .unwrap_or_else(|| "compact".to_string());

        let format = LogFormat::from_str(&log_format)
            .map_err(|e| format!("Invalid log format: {}", e))?;

        let filter = if log_level == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        let registry = Registry::default().with(filter);
        match format {
            LogFormat::Compact => registry
                .with(
                    fmt::Layer::default()
                        .with_target(false)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?,
            LogFormat::Pretty => registry
                .with(
                    fmt::Layer::default()
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .pretty(),
                )
                .try_init()?,
            LogFormat::Json => registry
                .with(
                    fmt::Layer::default()
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?,
        }

        Ok(())
    }
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
