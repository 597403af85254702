//! Folder Mirror CLI
//!
//! Keeps a replica directory identical to a source directory, either once
//! (`mirror sync`) or on an interval (`mirror run`).

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { args, passes } => {
            let settings = commands::resolve_settings(&args)?;
            logging::init(
                &settings.log_file,
                console_level(LevelFilter::INFO, cli.verbose),
                cli.verbose,
            )?;
            commands::run_periodic(&settings, passes)
        }
        Commands::Sync { args, json } => {
            let settings = commands::resolve_settings(&args)?;
            // Actions are already echoed on stdout; the console only needs problems.
            logging::init(
                &settings.log_file,
                console_level(LevelFilter::WARN, cli.verbose),
                cli.verbose,
            )?;
            commands::run_once(&settings, json)
        }
    }
}

fn console_level(default: LevelFilter, verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::DEBUG } else { default }
}
