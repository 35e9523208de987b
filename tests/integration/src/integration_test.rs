//! End-to-end integration test for the mirroring flow
//!
//! This test exercises the complete library stack the binary wires up:
//! replica scan -> reconciliation passes -> rotating log file.

use std::fs;
use std::path::Path;

use mirror_core::{
    MemorySink, Reconciler, RotatingFileSink, RotationPolicy, StateIndex, Tee,
};
use mirror_fs::ContentDigest;
use mirror_test_utils::{TestTree, assert_trees_equal};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

type Sink = Tee<MemorySink, RotatingFileSink>;

fn start(
    source: &TestTree,
    replica: &TestTree,
    log: &Path,
    policy: RotationPolicy,
) -> Reconciler<Sink> {
    let index = StateIndex::scan(replica.root()).expect("replica scan");
    let sink = Tee::new(
        MemorySink::new(),
        RotatingFileSink::open(log, policy).expect("open log"),
    );
    Reconciler::new(source.root(), replica.root(), index, sink)
}

fn logged_messages(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap()
        .lines()
        .map(|line| line[20..].to_string())
        .collect()
}

#[test]
fn test_two_pass_scenario() {
    let source = TestTree::new();
    let replica = TestTree::new();
    let logs = TempDir::new().unwrap();
    let log = logs.path().join("mirror.log");

    // Pass 1: empty replica receives a/, a/x.txt and b.txt
    source.write("a/x.txt", "hello");
    source.write("b.txt", "world");
    let mut r = start(&source, &replica, &log, RotationPolicy::default());
    r.run_once().unwrap();

    assert_trees_equal(source.root(), replica.root());
    assert_eq!(r.index().dirs().count(), 1);
    assert_eq!(r.index().files().count(), 2);
    assert_eq!(
        r.index().digest_of(Path::new("a/x.txt")),
        Some(&ContentDigest::of(b"hello"))
    );
    assert_eq!(logged_messages(&log).len(), 3);

    // Pass 2: b.txt deleted, a/x.txt changed
    source.remove("b.txt");
    source.write("a/x.txt", "hello2");
    r.run_once().unwrap();

    assert_trees_equal(source.root(), replica.root());
    let pass_two: Vec<String> = logged_messages(&log).split_off(3);
    assert_eq!(pass_two.len(), 2);
    assert_eq!(pass_two.iter().filter(|m| m.starts_with("Removed file")).count(), 1);
    assert_eq!(pass_two.iter().filter(|m| m.starts_with("Updated file")).count(), 1);

    // Pass 3: nothing changed, nothing logged
    let report = r.run_once().unwrap();
    assert!(report.is_noop());
    assert_eq!(logged_messages(&log).len(), 5);
}

#[test]
fn test_restart_rebuilds_equivalent_index() {
    let source = TestTree::new();
    let replica = TestTree::new();
    let logs = TempDir::new().unwrap();
    let log = logs.path().join("mirror.log");
    source.write("docs/readme.md", "# readme");
    source.write("docs/img/logo.bin", [1u8, 2, 3]);
    source.mkdir("empty");

    let mut first = start(&source, &replica, &log, RotationPolicy::default());
    first.run_once().unwrap();
    let (index_before, _) = first.into_parts();

    // A new process scans the replica it left behind
    let mut second = start(&source, &replica, &log, RotationPolicy::default());
    assert_eq!(second.index(), &index_before);

    let report = second.run_once().unwrap();
    assert!(report.is_noop());
    assert!(second.sink().first.messages().is_empty());
}

#[test]
fn test_log_rotation_keeps_bounded_history() {
    let source = TestTree::new();
    let replica = TestTree::new();
    let logs = TempDir::new().unwrap();
    let log = logs.path().join("mirror.log");
    let policy = RotationPolicy {
        max_bytes: 256,
        backups: 2,
    };
    for i in 0..20 {
        source.write(&format!("file-{i:02}.txt"), format!("content {i}"));
    }

    let mut r = start(&source, &replica, &log, policy);
    r.run_once().unwrap();

    let sink = r.sink();
    assert!(log.exists());
    assert!(sink.second.backup_path(1).exists());
    assert!(sink.second.backup_path(2).exists());
    assert!(!sink.second.backup_path(3).exists());
    for path in [log.clone(), sink.second.backup_path(1), sink.second.backup_path(2)] {
        assert!(fs::metadata(&path).unwrap().len() < 256);
    }

    // The newest lines survive rotation intact
    let current = fs::read_to_string(&log).unwrap();
    assert!(current.trim_end().ends_with("file-19.txt"));
}
