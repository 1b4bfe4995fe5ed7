//! Confix CLI - validate configuration files against a declared schema.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Build a registry from a schema declaration and resolve configuration through `confix`.
//! - Format and display results in various output formats (JSON, YAML, TOML).
//!
//! Does NOT handle:
//! - Merge and validation rules (see `crates/config`).
//!
//! Invariants:
//! - Logs go to stderr; stdout carries only command output.
//! - The process exit code reflects the error category (see `error::ExitCode`).

mod args;
mod commands;
mod declaration;
mod dispatch;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_logging(verbose: u8, json: bool) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (plain, json) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let exit_code = match run_command(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
