//! Destinations for reported actions

use super::SyncAction;

/// Receives every action a pass reports, in the order they happen.
///
/// The engine owns no logging state; whoever drives it decides where actions
/// go by handing in a sink.
pub trait ActionSink {
    fn record(&mut self, action: SyncAction);
}

/// Collects actions in memory.
impl ActionSink for Vec<SyncAction> {
    fn record(&mut self, action: SyncAction) {
        self.push(action);
    }
}

/// Emits each action as a structured `tracing` event.
///
/// Mutations log at `info`, skipped entries at `warn`, failures at `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ActionSink for TracingSink {
    fn record(&mut self, action: SyncAction) {
        let (kind, path) = (action.kind(), action.path());
        match &action {
            SyncAction::Copied { bytes, .. } => {
                tracing::info!(action = %kind, %path, bytes, "copying file");
            }
            SyncAction::CreatedDirectory { .. } => {
                tracing::info!(action = %kind, %path, "creating directory");
            }
            SyncAction::RemovedFile { .. } => {
                tracing::info!(action = %kind, %path, "removing file");
            }
            SyncAction::RemovedDirectory { .. } => {
                tracing::info!(action = %kind, %path, "removing directory");
            }
            SyncAction::Skipped { .. } => {
                tracing::warn!(action = %kind, %path, "skipping entry that is neither file nor directory");
            }
            SyncAction::Failed { cause, .. } => {
                tracing::error!(action = %kind, %path, error = %cause, "failed to mirror entry");
            }
        }
    }
}
