//! Logging bootstrap
//!
//! The engine emits `tracing` spans and events and never installs a
//! subscriber on its own. Binaries call [`init_logging`] once at start-up.
//!
//! Every pipeline stage runs in its own DEBUG span under the
//! `relayout_all` / `relayout_from` INFO spans, so stages can be filtered
//! by target:
//!
//! ```bash
//! RUST_LOG="info,idealayout::layout::ordering=trace" idealayout layout -i graph.json
//! ```
//!
//! Level comes from the argument, then `IDEALAYOUT_LOG_LEVEL`, then
//! `RUST_LOG`, then `info`. Format comes from the argument, then
//! `IDEALAYOUT_LOG_FORMAT`, then `compact`. Output goes to stderr so it
//! never mixes with documents written to stdout.

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

/// Environment variable consulted for the log level
pub const LEVEL_ENV: &str = "IDEALAYOUT_LOG_LEVEL";

/// Environment variable consulted for the log format
pub const FORMAT_ENV: &str = "IDEALAYOUT_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single line per event, no targets
    Compact,
    /// Multi-line with file and line numbers
    Pretty,
    /// One JSON object per event
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

fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    let name = format
        .map(str::to_string)
        .or_else(|| std::env::var(FORMAT_ENV).ok())
        .unwrap_or_else(|| "compact".to_string());
    LogFormat::from_str(&name).map_err(|e| format!("Invalid log format: {}", e))
}

#[cfg(not(target_arch = "wasm32"))]
fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Compact => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::ACTIVE)
            .pretty()
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .boxed(),
    }
}

/// Install the global tracing subscriber
///
/// * `level` - trace|debug|info|warn|error|off, or any `EnvFilter`
///   directive. Unparseable directives fall back to `info`.
/// * `format` - compact|pretty|json
///
/// Fails on an unknown format or when a global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        // The browser console has no format choice and tracing-wasm 0.1
        // takes no level in its config.
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let level = resolve_level(level);
        let format = resolve_format(format)?;

        let filter = if level == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        Registry::default()
            .with(fmt_layer(format))
            .with(filter)
            .try_init()?;
        Ok(())
    }
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
