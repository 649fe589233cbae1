//! The `rpmdeplint` CLI.

use std::process::ExitCode;

mod arch;
mod cli;
mod commands;
mod error;
mod man;

use clap::Parser;
use cli::{Cli, Command};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use crate::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        cli.verbose.log_level_filter()
    };
    if let Err(error) = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialize logger:\n{error}");
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(true) => ExitCode::from(3),
        Ok(false) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Dispatches to the subcommand's implementation. Returns `Ok(true)` when
/// the check found a defect (exit 3), `Ok(false)` when it found none.
fn run(command: Command) -> Result<bool, Error> {
    match command {
        Command::Check { args } => commands::check(&args),
        Command::CheckSat { args } => commands::check_sat(&args),
        Command::CheckRepoclosure { args } => commands::check_repoclosure(&args),
        Command::CheckConflicts { args } => commands::check_conflicts(&args),
        Command::CheckUpgrade { args } => commands::check_upgrade(&args),
        Command::ListDeps { args } => commands::list_deps(&args),
        Command::Man { out_dir } => {
            man::generate(&out_dir)?;
            Ok(false)
        }
    }
}
