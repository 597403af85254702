//! Periodic driver for the mirror engine

use std::thread;
use std::time::{Duration, Instant};

use crate::{ActionSink, MirrorEngine};

/// How often a sleeping scheduler checks whether it should stop.
const STOP_POLL: Duration = Duration::from_millis(100);

/// Runs a pass, sleeps for the interval, and repeats.
///
/// A pass that fails outright is logged and the loop carries on; the next
/// pass retries the whole mirror.
#[derive(Debug, Clone)]
pub struct Scheduler {
    engine: MirrorEngine,
    interval: Duration,
    max_passes: Option<u64>,
}

impl Scheduler {
    pub fn new(engine: MirrorEngine, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            max_passes: None,
        }
    }

    /// Stop after `passes` passes instead of running until told to stop.
    pub fn with_max_passes(mut self, passes: u64) -> Self {
        self.max_passes = Some(passes);
        self
    }

    pub fn engine(&self) -> &MirrorEngine {
        &self.engine
    }

    /// Run passes until `should_stop` returns true or the pass limit is hit.
    ///
    /// `should_stop` is checked after every pass and while sleeping. Returns
    /// the number of passes run.
    pub fn run(&self, sink: &mut dyn ActionSink, should_stop: impl Fn() -> bool) -> u64 {
        let mut passes = 0;

        loop {
            passes += 1;
            let started = Instant::now();
            tracing::info!(
                pass = passes,
                source = %self.engine.source().display(),
                replica = %self.engine.replica().display(),
                "start of sync"
            );

            match self.engine.synchronize(sink) {
                Ok(result) if result.is_clean() => {
                    tracing::info!(pass = passes, elapsed = ?started.elapsed(), %result, "end of sync");
                }
                Ok(result) => {
                    tracing::warn!(pass = passes, elapsed = ?started.elapsed(), %result, "end of sync with failures");
                }
                Err(e) => {
                    tracing::error!(pass = passes, error = %e, "sync pass failed");
                }
            }

            if self.max_passes.is_some_and(|max| passes >= max) || should_stop() {
                return passes;
            }
            if sleep_unless_stopped(self.interval, &should_stop) {
                return passes;
            }
        }
    }
}

/// Sleep for `interval`, waking early if `should_stop` turns true.
///
/// Returns whether the sleep was cut short.
fn sleep_unless_stopped(interval: Duration, should_stop: &impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep((deadline - now).min(STOP_POLL));
        if should_stop() {
            return true;
        }
    }
}
