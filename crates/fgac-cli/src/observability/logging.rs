//! Structured logging configuration.
//!
//! Logs go to stderr so stdout carries only the compiled document. With JSON
//! formatting enabled each entry is one JSON object:
//!
//! ```json
//! {"timestamp":"2024-01-15T10:30:00.000Z","level":"INFO","fields":{"message":"compiled authorization model","types":4},"target":"fgac_domain::model::parser"}
//! ```

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Configuration for structured logging.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Whether to use JSON format (true) or text format (false)
    pub json_format: bool,
    /// The default log level if RUST_LOG is not set
    pub default_level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            default_level: Level::WARN,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration for JSON output.
    pub fn json() -> Self {
        Self {
            json_format: true,
            ..Default::default()
        }
    }

    /// Create a new logging configuration for text output.
    pub fn text() -> Self {
        Self {
            json_format: false,
            ..Default::default()
        }
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            json_format: settings.json,
            default_level: parse_log_level(&settings.level),
        }
    }
}

/// Maps a validated level name to a [`Level`], defaulting to WARN.
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Initialize the logging subsystem with the given configuration.
///
/// Should be called once at startup; later calls have no effect.
pub fn init_logging(config: LoggingConfig) {
    // Build the filter from RUST_LOG env var or use default level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    if config.json_format {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );

        // Try to set as global default, ignore if already set
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        );

        // Try to set as global default, ignore if already set
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Creates a JSON subscriber writing to `writer`, for capturing log output.
pub fn create_json_layer<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true),
        )
}
