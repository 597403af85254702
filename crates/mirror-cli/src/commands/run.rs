//! The periodic `run` command

use mirror_core::{MirrorSettings, Scheduler, TracingSink};

use crate::error::Result;

/// Mirror every `settings.interval` until the process is interrupted, or
/// until `passes` passes have run.
///
/// A failing pass is logged and the loop carries on with the next one.
pub fn run_periodic(settings: &MirrorSettings, passes: Option<u64>) -> Result<()> {
    let mut scheduler = Scheduler::new(settings.engine(), settings.interval);
    if let Some(passes) = passes {
        scheduler = scheduler.with_max_passes(passes);
    }

    tracing::info!(
        source = %settings.source.display(),
        replica = %settings.replica.display(),
        interval_secs = settings.interval.as_secs(),
        log_file = %settings.log_file.display(),
        dry_run = settings.dry_run,
        "mirror started"
    );

    let completed = scheduler.run(&mut TracingSink, || false);
    tracing::info!(passes = completed, "mirror stopped");
    Ok(())
}
