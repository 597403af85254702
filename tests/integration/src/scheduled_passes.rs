//! Multi-pass runs through the Scheduler, with the filesystem changing
//! between passes.

use std::cell::Cell;
use std::fs;
use std::time::Duration;

use mirror_core::{ActionKind, MirrorEngine, PartialSettings, Scheduler, SyncAction};
use mirror_test_utils::TestTree;
use pretty_assertions::assert_eq;

fn scheduler(tree: &TestTree, passes: u64) -> Scheduler {
    Scheduler::new(
        MirrorEngine::new(tree.source(), tree.replica()),
        Duration::from_millis(1),
    )
    .with_max_passes(passes)
}

#[test]
fn test_changes_between_passes_are_picked_up() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "first");
    let added = Cell::new(false);
    let mut actions: Vec<SyncAction> = Vec::new();

    let passes = scheduler(&tree, 2).run(&mut actions, || {
        if !added.get() && tree.replica_path("a.txt").exists() {
            tree.write_source("later/b.txt", "second");
            added.set(true);
        }
        false
    });

    assert_eq!(passes, 2);
    assert!(added.get());
    assert_eq!(tree.read_replica("later/b.txt"), "second");
    tree.assert_mirrored();
}

#[test]
fn test_stop_request_ends_an_unbounded_run() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "x");
    let engine = MirrorEngine::new(tree.source(), tree.replica());

    let mut actions: Vec<SyncAction> = Vec::new();

    let passes = Scheduler::new(engine, Duration::from_secs(3600)).run(&mut actions, || true);

    assert_eq!(passes, 1);
    tree.assert_mirrored();
}

#[test]
fn test_missing_source_does_not_end_the_run() {
    let tree = TestTree::new();
    fs::remove_dir(tree.source()).unwrap();
    let restored = Cell::new(false);
    let mut actions: Vec<SyncAction> = Vec::new();

    let passes = scheduler(&tree, 2).run(&mut actions, || {
        if !restored.get() {
            tree.write_source("back.txt", "b");
            restored.set(true);
        }
        false
    });

    assert_eq!(passes, 2);
    assert_eq!(tree.read_replica("back.txt"), "b");
}

#[test]
fn test_settings_file_drives_a_pass() {
    let tree = TestTree::new();
    tree.write_source("notes/today.md", "- mirror");
    let config = tree.root().join("mirror.toml");
    fs::write(
        &config,
        "source = \"source\"\nreplica = \"replica\"\ninterval_secs = 1\n",
    )
    .unwrap();

    let settings = PartialSettings::load(&config).unwrap().resolve().unwrap();
    let passes = Scheduler::new(settings.engine(), settings.interval)
        .with_max_passes(1)
        .run(&mut Vec::<SyncAction>::new(), || false);

    assert_eq!(passes, 1);
    assert_eq!(settings.interval, Duration::from_secs(1));
    tree.assert_mirrored();
}

#[test]
fn test_dry_run_settings_leave_replica_alone() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "x");
    let settings = PartialSettings {
        source: Some(tree.source()),
        replica: Some(tree.replica()),
        dry_run: Some(true),
        ..PartialSettings::default()
    }
    .resolve()
    .unwrap();
    let mut actions: Vec<SyncAction> = Vec::new();

    Scheduler::new(settings.engine(), settings.interval)
        .with_max_passes(2)
        .run(&mut actions, || false);

    // Nothing is applied, so the second pass plans the same work again.
    let copies = actions
        .iter()
        .filter(|a| a.kind() == ActionKind::Copied)
        .count();
    assert_eq!(copies, 2);
    tree.assert_replica_missing("");
}

#[cfg(unix)]
#[test]
fn test_locked_file_is_copied_once_readable_again() {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    let running_as_root = std::process::Command::new("id")
        .arg("-u")
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).trim() == "0")
        .unwrap_or(false);
    if running_as_root {
        eprintln!("Skipping test: running as root bypasses permission checks");
        return;
    }

    let tree = TestTree::new();
    let locked = tree.write_source("locked.txt", "eventually");
    fs::set_permissions(&locked, Permissions::from_mode(0o000)).unwrap();
    let mut actions: Vec<SyncAction> = Vec::new();

    scheduler(&tree, 2).run(&mut actions, || {
        let _ = fs::set_permissions(&locked, Permissions::from_mode(0o644));
        false
    });

    let history: Vec<_> = actions
        .iter()
        .filter(|a| a.path().as_str() == "locked.txt")
        .map(|a| a.kind())
        .collect();
    assert_eq!(history, vec![ActionKind::Failed, ActionKind::Copied]);
    assert_eq!(tree.read_replica("locked.txt"), "eventually");
}
