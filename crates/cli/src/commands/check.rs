//! Check command: resolve a configuration against a schema declaration.
//!
//! Responsibilities:
//! - Build a registry from the declaration file.
//! - Feed the configuration file and (optionally) the environment into a `ConfigLoader`.
//! - Print the resolved configuration in the requested output format.
//!
//! Does NOT handle:
//! - Exit code selection (see `error::ExitCodeExt`).

use anyhow::{Context, Result};
use confix::{ConfigLoader, FileFormat};
use std::path::PathBuf;

use crate::declaration::Declaration;
use crate::formatters::{OutputFormat, get_formatter, output_result};

/// Arguments of the `check` subcommand.
#[derive(Debug)]
pub struct CheckArgs {
    pub schema: PathBuf,
    pub config: Option<PathBuf>,
    pub format: Option<FileFormat>,
    pub env: bool,
    pub env_prefix: Option<String>,
    pub case_sensitive: bool,
    pub no_type_check: bool,
    pub dotenv: bool,
}

pub fn run(args: CheckArgs, output_format: &str, output_file: Option<PathBuf>) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;

    let registry = Declaration::load(&args.schema)
        .and_then(Declaration::into_registry)
        .with_context(|| format!("Failed to build schema from {}", args.schema.display()))?;

    let mut loader = ConfigLoader::new(&registry).type_check(!args.no_type_check);

    // Blank values are ignored to allow running without a config file.
    if let Some(path) = args.config.filter(|p| !p.as_os_str().is_empty()) {
        loader = loader.with_file(path);
        if let Some(file_format) = args.format {
            loader = loader.with_format(file_format);
        }
    }

    if args.env {
        if args.dotenv {
            loader = loader.load_dotenv()?;
        }
        loader = loader.from_env().case_sensitive(args.case_sensitive);
        if let Some(prefix) = args.env_prefix {
            loader = loader.with_env_prefix(prefix);
        }
    }

    tracing::debug!(options = ?loader.options(), "resolving configuration");
    let config = loader.load().context("Failed to resolve configuration")?;

    let output = get_formatter(format).format_config(&config.to_mapping())?;
    output_result(&output, format, output_file.as_deref())
}
