//! The single-pass `sync` command

use colored::Colorize;
use mirror_core::{ActionKind, ActionSink, MirrorSettings, SyncAction, SyncResult, TracingSink};

use crate::error::{CliError, Result};

/// Run one pass and print what happened.
///
/// With `json` the only thing written to stdout is the [`SyncResult`]. Fails
/// when the pass could not run or when any entry failed to mirror.
pub fn run_once(settings: &MirrorSettings, json: bool) -> Result<()> {
    let engine = settings.engine();

    if !json {
        println!(
            "{} Mirroring {} -> {}{}",
            "=>".blue().bold(),
            engine.source().display(),
            engine.replica().display(),
            if settings.dry_run { " (dry run)" } else { "" }
        );
    }

    let mut sink = ConsoleSink { print: !json };
    let result = engine.synchronize(&mut sink)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if !result.is_clean() {
        return Err(CliError::user(format!(
            "{} entries could not be mirrored",
            result.failed
        )));
    }
    Ok(())
}

/// Logs each action and, unless reporting JSON, echoes it to the console.
///
/// Failures go to stderr so they stay visible when stdout is redirected.
struct ConsoleSink {
    print: bool,
}

impl ActionSink for ConsoleSink {
    fn record(&mut self, action: SyncAction) {
        if self.print {
            if action.is_failure() {
                eprintln!("   {} {action}", "!".red().bold());
            } else {
                let marker = match action.kind() {
                    ActionKind::Copied | ActionKind::CreatedDirectory => "+".green(),
                    ActionKind::RemovedFile | ActionKind::RemovedDirectory => "-".yellow(),
                    _ => "~".dimmed(),
                };
                println!("   {marker} {action}");
            }
        }
        TracingSink.record(action);
    }
}

fn print_summary(result: &SyncResult) {
    if result.changes() == 0 && result.is_clean() {
        println!("{} Replica already matches source", "OK".green().bold());
        return;
    }

    let status = if result.is_clean() {
        "OK".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!("{status} {result}");
}
