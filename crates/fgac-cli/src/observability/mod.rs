//! Observability infrastructure for fgac.
//!
//! This module provides structured logging configuration.

mod logging;

pub use logging::{create_json_layer, init_logging, parse_log_level, LoggingConfig};
