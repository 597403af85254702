//! Whole-pass scenarios exercising mirror-core against real directory trees
//!
//! Each test drives `MirrorEngine` through one or more passes and checks the
//! replica with the shared `TestTree` helpers.

use std::fs;
use std::path::Path;
use std::thread;

use filetime::FileTime;
use mirror_core::{ActionKind, MirrorEngine, SyncAction, SyncResult};
use mirror_test_utils::{TestTree, mtime, snapshot};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn engine(tree: &TestTree) -> MirrorEngine {
    MirrorEngine::new(tree.source(), tree.replica())
}

fn pass(engine: &MirrorEngine) -> (SyncResult, Vec<SyncAction>) {
    let mut actions = Vec::new();
    let result = engine.synchronize(&mut actions).unwrap();
    (result, actions)
}

fn kinds(actions: &[SyncAction]) -> Vec<(ActionKind, String)> {
    actions
        .iter()
        .map(|a| (a.kind(), a.path().to_string()))
        .collect()
}

#[test]
fn test_file_lifecycle_follows_the_source() {
    let tree = TestTree::new();
    let engine = engine(&tree);
    let a = tree.write_source("a.txt", "x");
    tree.set_mtime(&a, 1_000_000);
    tree.mkdir_source("sub");

    // First pass: everything arrives with its timestamp.
    let (result, _) = pass(&engine);
    assert!(result.is_clean());
    assert_eq!(tree.read_replica("a.txt"), "x");
    assert_eq!(mtime(&tree.replica_path("a.txt")), FileTime::from_unix_time(1_000_000, 0));
    assert!(tree.replica_path("sub").is_dir());
    assert!(fs::read_dir(tree.replica_path("sub")).unwrap().next().is_none());

    // Content and mtime change: the replica follows.
    fs::write(&a, "changed").unwrap();
    tree.set_mtime(&a, 2_000_000);
    let (_, actions) = pass(&engine);
    assert_eq!(kinds(&actions), vec![(ActionKind::Copied, "a.txt".to_string())]);
    assert_eq!(tree.read_replica("a.txt"), "changed");
    assert_eq!(mtime(&tree.replica_path("a.txt")), FileTime::from_unix_time(2_000_000, 0));

    // Deleted from source: removed from replica.
    fs::remove_file(&a).unwrap();
    let (_, actions) = pass(&engine);
    assert_eq!(kinds(&actions), vec![(ActionKind::RemovedFile, "a.txt".to_string())]);
    tree.assert_replica_missing("a.txt");
    tree.assert_mirrored();
}

#[test]
fn test_extraneous_replica_content_is_removed_in_one_pass() {
    let tree = TestTree::new();
    tree.write_source("keep.txt", "k");
    tree.write_replica("orphan.txt", "o");
    tree.write_replica("old/nested/deep.txt", "d");
    tree.write_replica("old/top.txt", "t");

    let (result, actions) = pass(&engine(&tree));

    assert_eq!(result.removed_files, 1);
    assert_eq!(result.removed_dirs, 1);
    assert!(kinds(&actions).contains(&(ActionKind::RemovedDirectory, "old".to_string())));
    tree.assert_replica_missing("orphan.txt");
    tree.assert_replica_missing("old");
    tree.assert_mirrored();
}

#[test]
fn test_replica_matching_source_needs_no_work() {
    let tree = TestTree::new();
    tree.write_source("docs/readme.md", "# hi");
    tree.write_source("docs/img/logo.svg", "<svg/>");
    tree.write_source("root.txt", "r");
    let engine = engine(&tree);

    pass(&engine);
    let (second, actions) = pass(&engine);

    assert!(actions.is_empty(), "unexpected actions: {actions:?}");
    assert_eq!(second.changes(), 0);
}

#[test]
fn test_separate_engines_share_no_state() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "x");

    pass(&engine(&tree));
    tree.write_replica("stray.txt", "s");
    let (_, actions) = pass(&engine(&tree));

    assert_eq!(kinds(&actions), vec![(ActionKind::RemovedFile, "stray.txt".to_string())]);
}

/// A chain of single-child directories, synchronized on a thread whose stack
/// is far too small for one frame per level.
#[test]
fn test_deep_nesting_runs_on_a_small_stack() {
    const DEPTH: usize = 600;

    let tree = TestTree::new();
    let mut deepest = tree.source();
    for _ in 0..DEPTH {
        deepest.push("d");
    }
    fs::create_dir_all(&deepest).unwrap();
    fs::write(deepest.join("leaf.txt"), "bottom").unwrap();

    let (source, replica) = (tree.source(), tree.replica());
    let result = thread::Builder::new()
        .stack_size(128 * 1024)
        .spawn(move || {
            let mut actions = Vec::new();
            MirrorEngine::new(source, replica).synchronize(&mut actions)
        })
        .unwrap()
        .join()
        .expect("pass panicked")
        .unwrap();

    assert!(result.is_clean());
    assert_eq!(result.copied, 1);
    assert_eq!(result.created_dirs, DEPTH + 1);
    assert_eq!(snapshot(&tree.source()), snapshot(&tree.replica()));
}

// Directory components never carry an extension and file names always do,
// so generated paths never collide on kind.
fn source_files() -> impl Strategy<Value = Vec<(Vec<String>, String)>> {
    prop::collection::vec(
        (
            prop::collection::vec("[a-c]", 0..4),
            "f[0-2]\\.txt",
        ),
        0..12,
    )
}

// Replica junk may shadow source directories with files and vice versa.
fn replica_junk() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d](/[a-d]){0,2}(/g[0-1]\\.txt)?", 0..10)
}

fn write_ignoring_conflicts(path: &Path, content: &str) {
    if let Some(parent) = path.parent()
        && fs::create_dir_all(parent).is_err()
    {
        return;
    }
    let _ = fs::write(path, content);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_one_pass_makes_replica_identical(
        files in source_files(),
        junk in replica_junk(),
    ) {
        let tree = TestTree::new();
        for (dirs, name) in &files {
            let mut path = tree.source();
            path.extend(dirs);
            path.push(name);
            write_ignoring_conflicts(&path, &format!("{dirs:?}/{name}"));
            tree.set_mtime(&path, 1_000_000);
        }
        fs::create_dir_all(tree.replica()).unwrap();
        for rel in &junk {
            write_ignoring_conflicts(&tree.replica_path(rel), "junk");
        }

        let engine = engine(&tree);
        let (first, _) = pass(&engine);
        prop_assert!(first.is_clean());
        tree.assert_mirrored();

        let (_, second) = pass(&engine);
        prop_assert!(second.is_empty(), "second pass was not idle: {:?}", second);
    }
}
