//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Logging setup (see `main()`).
//!
//! Invariants:
//! - Commands are routed based on the top-level Commands enum variant.

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::commands::check::CheckArgs;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check {
            schema,
            config,
            format,
            env,
            env_prefix,
            case_sensitive,
            no_type_check,
            dotenv,
        } => {
            let args = CheckArgs {
                schema,
                config,
                format,
                env,
                env_prefix,
                case_sensitive,
                no_type_check,
                dotenv,
            };
            commands::check::run(args, &cli.output, cli.output_file)?;
        }
        Commands::Formats => {
            commands::formats::run(&cli.output, cli.output_file)?;
        }
    }

    Ok(())
}
