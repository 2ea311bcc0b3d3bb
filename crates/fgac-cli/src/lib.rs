//! fgac-cli: command-line front end for the model compiler
//!
//! This crate contains:
//! - Configuration management (defaults, YAML file, `FGAC_` environment)
//! - Logging initialization
//! - Compilation of DSL text to the JSON document
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 fgac-cli                     │
//! ├─────────────────────────────────────────────┤
//! │  config.rs      - Configuration management  │
//! │  observability/ - Structured logging        │
//! │  main.rs        - `fgac` binary             │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod observability;

use fgac_domain::{DslParser, ParseOptions};

pub use config::{CompilerConfig, ConfigLoadError};

/// Errors produced while turning DSL text into serialized output.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Model(#[from] fgac_domain::DomainError),

    #[error("failed to serialize model: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Compiles DSL text and serializes the model as JSON.
pub fn compile_to_json(
    input: &str,
    options: ParseOptions,
    pretty: bool,
) -> Result<String, CompileError> {
    let model = DslParser::with_options(options).parse(input)?;
    let json = if pretty {
        serde_json::to_string_pretty(&model)?
    } else {
        serde_json::to_string(&model)?
    };
    Ok(json)
}
