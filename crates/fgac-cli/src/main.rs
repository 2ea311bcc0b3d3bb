//! fgac binary
//!
//! Compiles an OpenFGA modeling DSL file into the JSON authorization model.
//!
//! # Usage
//!
//! ```bash
//! # Compile a file, pretty JSON on stdout
//! fgac model.fga
//!
//! # Read stdin, compact output to a file, source-compatible parsing
//! cat model.fga | fgac --lenient --compact --output model.json
//!
//! # With a config file and env overrides
//! FGAC_LOGGING__LEVEL=debug fgac --config fgac.yaml model.fga
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use fgac_cli::compile_to_json;
use fgac_cli::config::CompilerConfig;
use fgac_cli::observability::{init_logging, LoggingConfig};

/// fgac - OpenFGA modeling DSL to JSON compiler
#[derive(Parser, Debug)]
#[command(name = "fgac")]
#[command(version, about, long_about = None)]
struct Args {
    /// DSL file to compile; reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read unrecognized expression text as relation names instead of failing
    #[arg(long)]
    lenient: bool,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,

    /// Write the document to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::from_env()?,
    };
    apply_overrides(&args, &mut config);

    init_logging(LoggingConfig::from(&config.logging));

    let (source, input) = read_input(args.input.as_deref())?;
    info!(source = %source, strict = config.compiler.strict, "compiling model");

    let json = compile_to_json(
        &input,
        config.compiler.parse_options(),
        config.output.pretty,
    )
    .with_context(|| format!("failed to compile {source}"))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote model");
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Command-line flags take precedence over file and environment settings.
fn apply_overrides(args: &Args, config: &mut CompilerConfig) {
    if args.lenient {
        config.compiler.strict = false;
    }
    if args.compact {
        config.output.pretty = false;
    }
}

/// The file to read, or `None` for stdin (no argument or `-`).
fn input_file(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| path.as_os_str() != "-")
}

/// Returns a display name for the source and its contents.
fn read_input(path: Option<&Path>) -> anyhow::Result<(String, String)> {
    match input_file(path) {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok((path.display().to_string(), text))
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(("<stdin>".to_string(), text))
        }
    }
}
