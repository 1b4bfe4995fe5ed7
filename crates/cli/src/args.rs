//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not build registries (see `declaration` module).

use clap::{ArgAction, Parser, Subcommand};
use confix::FileFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "confix")]
#[command(about = "Confix - validate configuration files against a declared schema", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  confix check --schema schema.toml --config app.yaml\n  confix check --schema schema.toml --config app.ini --env --env-prefix APP_\n  confix --output yaml check --schema schema.json --env\n  confix formats\n"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format (json, yaml, toml)
    #[arg(short, long, global = true, default_value = "json")]
    pub output: String,

    /// Output file path (saves results to file instead of stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a configuration against a schema declaration and print the result
    Check {
        /// Schema declaration file (TOML, JSON or YAML)
        #[arg(long, value_name = "FILE")]
        schema: PathBuf,

        /// Configuration file to validate.
        ///
        /// Can also be set via CONFIX_CONFIG_PATH environment variable.
        #[arg(short, long, env = "CONFIX_CONFIG_PATH", value_name = "FILE")]
        config: Option<PathBuf>,

        /// Parse the configuration file as this format instead of detecting it from the extension
        #[arg(long, requires = "config")]
        format: Option<FileFormat>,

        /// Apply overrides from the process environment
        #[arg(long)]
        env: bool,

        /// Only match environment variables carrying this prefix
        #[arg(long, requires = "env", value_name = "PREFIX")]
        env_prefix: Option<String>,

        /// Match environment variable names case-sensitively
        #[arg(long, requires = "env")]
        case_sensitive: bool,

        /// Accept overrides whose type differs from the declared default
        #[arg(long)]
        no_type_check: bool,

        /// Load a .env file from the current directory before reading the environment
        #[arg(long, requires = "env")]
        dotenv: bool,
    },

    /// List supported configuration file formats and their extensions
    Formats,
}
