//! Settings for a mirror: roots, interval, log destination

use std::path::{Path, PathBuf};
use std::time::Duration;

use mirror_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::{Error, MirrorEngine, Result, SyncOptions};

/// Interval between passes when none is configured.
pub const DEFAULT_INTERVAL_SECS: u64 = 20;

/// Log file when none is configured.
pub const DEFAULT_LOG_FILE: &str = "sync.log";

/// Settings as found in one place (a config file or the command line).
///
/// Every field is optional; layers are combined with [`PartialSettings::merge`]
/// and then checked by [`PartialSettings::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSettings {
    pub source: Option<PathBuf>,
    pub replica: Option<PathBuf>,
    pub interval_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub dry_run: Option<bool>,
}

impl PartialSettings {
    /// Load settings from a TOML, JSON or YAML file.
    ///
    /// Relative `source`, `replica` and `log_file` paths are taken relative to
    /// the directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings: Self = ConfigStore::new().load(path)?;
        if let Some(base) = path.parent() {
            for field in [
                &mut settings.source,
                &mut settings.replica,
                &mut settings.log_file,
            ] {
                if let Some(value) = field.as_mut()
                    && value.is_relative()
                {
                    *value = base.join(&*value);
                }
            }
        }
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Combine two layers; values present in `overrides` win.
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            source: overrides.source.or(self.source),
            replica: overrides.replica.or(self.replica),
            interval_secs: overrides.interval_secs.or(self.interval_secs),
            log_file: overrides.log_file.or(self.log_file),
            dry_run: overrides.dry_run.or(self.dry_run),
        }
    }

    /// Fill in defaults and check that the result is usable.
    pub fn resolve(self) -> Result<MirrorSettings> {
        let source = self.source.ok_or(Error::MissingSetting { name: "source" })?;
        let replica = self.replica.ok_or(Error::MissingSetting { name: "replica" })?;
        let interval_secs = self.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(Error::InvalidInterval {
                secs: interval_secs,
            });
        }

        Ok(MirrorSettings {
            source,
            replica,
            interval: Duration::from_secs(interval_secs),
            log_file: self
                .log_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            dry_run: self.dry_run.unwrap_or(false),
        })
    }
}

/// Complete settings for one mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSettings {
    pub source: PathBuf,
    pub replica: PathBuf,
    pub interval: Duration,
    pub log_file: PathBuf,
    pub dry_run: bool,
}

impl MirrorSettings {
    /// Build the engine these settings describe.
    pub fn engine(&self) -> MirrorEngine {
        MirrorEngine::new(&self.source, &self.replica).with_options(SyncOptions {
            dry_run: self.dry_run,
        })
    }
}
