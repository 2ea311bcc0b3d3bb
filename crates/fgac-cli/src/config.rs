//! Configuration management for the fgac compiler.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use fgac_cli::config::CompilerConfig;
//!
//! // Load from file with env overrides
//! let config = CompilerConfig::load("fgac.yaml")?;
//!
//! // Or load from environment only
//! let config = CompilerConfig::from_env()?;
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use fgac_domain::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `FGAC_COMPILER__STRICT=false`.
const ENV_PREFIX: &str = "FGAC";

/// Compiler configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CompilerConfig {
    /// Parsing behavior
    #[serde(default)]
    pub compiler: CompilerSettings,

    /// Output formatting
    #[serde(default)]
    pub output: OutputSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Parsing settings.
///
/// # Example YAML Configuration
///
/// ```yaml
/// compiler:
///   strict: false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CompilerSettings {
    /// Reject expressions that do not reduce to a recognized form.
    ///
    /// When disabled, leftover text is read as a relation name.
    /// Environment variable: `FGAC_COMPILER__STRICT`
    #[serde(default = "default_true")]
    pub strict: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl CompilerSettings {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict: self.strict,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OutputSettings {
    /// Pretty-print the JSON document
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl CompilerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `FGAC_` and use `__` as separator.
    /// For example:
    /// - `FGAC_COMPILER__STRICT=false` overrides `compiler.strict`
    /// - `FGAC_LOGGING__LEVEL=debug` overrides `logging.level`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&CompilerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let compiler_config: CompilerConfig = config.try_deserialize()?;
        compiler_config.validate()?;

        Ok(compiler_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&CompilerConfig::default())?)
            .add_source(env_source())
            .build()?;

        let compiler_config: CompilerConfig = config.try_deserialize()?;
        compiler_config.validate()?;

        Ok(compiler_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}

// Use __ as separator for nested keys: FGAC_COMPILER__STRICT -> compiler.strict
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
