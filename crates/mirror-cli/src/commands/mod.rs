//! Command implementations for the mirror CLI

pub mod run;
pub mod sync;

pub use run::run_periodic;
pub use sync::run_once;

use mirror_core::{MirrorSettings, PartialSettings};

use crate::cli::MirrorArgs;
use crate::error::Result;

/// Load the config file (if any) and lay the command-line values over it.
pub fn resolve_settings(args: &MirrorArgs) -> Result<MirrorSettings> {
    let base = match &args.config {
        Some(path) => PartialSettings::load(path)?,
        None => PartialSettings::default(),
    };
    Ok(base.merge(args.overrides()).resolve()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn command_line_wins_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("mirror.toml");
        fs::write(
            &config,
            "source = \"data\"\nreplica = \"backup\"\ninterval_secs = 60\n",
        )
        .unwrap();

        let args = MirrorArgs {
            interval: Some(5),
            config: Some(config),
            ..MirrorArgs::default()
        };
        let settings = resolve_settings(&args).unwrap();

        assert_eq!(settings.source, dir.path().join("data"));
        assert_eq!(settings.replica, dir.path().join("backup"));
        assert_eq!(settings.interval, Duration::from_secs(5));
    }

    #[test]
    fn flags_alone_are_enough() {
        let args = MirrorArgs {
            source: Some("src".into()),
            replica: Some("rep".into()),
            dry_run: true,
            ..MirrorArgs::default()
        };

        let settings = resolve_settings(&args).unwrap();

        assert_eq!(settings.source, PathBuf::from("src"));
        assert_eq!(settings.log_file, PathBuf::from("sync.log"));
        assert!(settings.dry_run);
    }

    #[test]
    fn missing_replica_is_reported() {
        let args = MirrorArgs {
            source: Some("src".into()),
            ..MirrorArgs::default()
        };

        let err = resolve_settings(&args).unwrap_err();

        assert!(err.to_string().contains("replica"));
    }
}
