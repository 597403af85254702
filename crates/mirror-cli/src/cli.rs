//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mirror_core::PartialSettings;

/// Folder Mirror - Keep a replica directory identical to a source directory
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Mirror periodically until interrupted
    ///
    /// Runs a full pass, sleeps for the interval, and repeats. Every action
    /// is written to the log file.
    ///
    /// Examples:
    ///   mirror run -s ./data -r /backup/data          # every 20 seconds
    ///   mirror run -s ./data -r /backup/data -i 300   # every 5 minutes
    ///   mirror run -c mirror.toml                     # settings from a file
    Run {
        #[command(flatten)]
        args: MirrorArgs,

        /// Stop after this many passes instead of running until interrupted
        #[arg(long)]
        passes: Option<u64>,
    },

    /// Run a single pass and report what changed
    Sync {
        #[command(flatten)]
        args: MirrorArgs,

        /// Output the pass summary as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Settings shared by every command; anything given here overrides the
/// config file.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorArgs {
    /// Directory to mirror from
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Directory kept identical to the source
    #[arg(short, long)]
    pub replica: Option<PathBuf>,

    /// Seconds between passes [default: 20]
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// File that every action is appended to [default: sync.log]
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report what would change without touching the replica
    #[arg(long)]
    pub dry_run: bool,
}

impl MirrorArgs {
    /// The settings layer given on the command line.
    pub fn overrides(&self) -> PartialSettings {
        PartialSettings {
            source: self.source.clone(),
            replica: self.replica.clone(),
            interval_secs: self.interval,
            log_file: self.log_file.clone(),
            dry_run: self.dry_run.then_some(true),
        }
    }
}
