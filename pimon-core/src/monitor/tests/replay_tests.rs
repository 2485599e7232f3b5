use super::{ACQUIRED, BOOST, REQUEST, monitor, monitor_with, start};
use crate::conf::MonitorConfig;
use crate::monitor::ReplayError;
use chrono::TimeDelta;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn log_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn replay_builds_and_finalizes_the_scenario() {
    // Arrange
    let (monitor, notifier, _) = monitor();
    let file = log_file(&["boot", ACQUIRED, "$ pi_test", REQUEST, BOOST]);

    // Act
    let snapshot = monitor.replay_file(file.path(), "custom").unwrap();

    // Assert
    assert!(snapshot.finalized);
    assert_eq!(snapshot.total_events, 3);
    assert_eq!(snapshot.total_inversions, 1);
    assert_eq!(snapshot.total_boosts, 1);
    assert_eq!(monitor.get_snapshot("custom").unwrap(), snapshot);
    assert_eq!(notifier.names().last(), Some(&"stats_update"));
}

#[test]
fn replay_ignores_markers_in_the_file() {
    let (monitor, _, _) = monitor();
    let line = format!("PI Detailed Test {ACQUIRED}");
    let file = log_file(&[&line]);

    monitor.replay_file(file.path(), "custom").unwrap();

    assert_eq!(monitor.get_snapshot("custom").unwrap().total_events, 1);
    assert_eq!(monitor.get_snapshot("pi_detailed").unwrap().total_events, 0);
}

#[test]
fn replaying_twice_gives_the_same_result() {
    let (monitor, _, clock) = monitor();
    let file = log_file(&[ACQUIRED, REQUEST, BOOST]);

    let first = monitor.replay_file(file.path(), "custom").unwrap();
    let second = monitor.replay_file(file.path(), "custom").unwrap();

    assert_eq!(first, second);

    clock.advance(TimeDelta::seconds(30));
    let later = monitor.get_snapshot("custom").unwrap();
    assert_eq!(later.uptime, first.uptime);
}

#[test]
fn replay_discards_previous_state() {
    let (monitor, _, _) = monitor();
    for _ in 0..5 {
        monitor.ingest_line(ACQUIRED, Some("custom"));
    }
    let file = log_file(&[REQUEST]);

    let snapshot = monitor.replay_file(file.path(), "custom").unwrap();

    assert_eq!(snapshot.total_events, 1);
    assert_eq!(snapshot.process_stats.len(), 1);
}

#[test]
fn missing_file_leaves_scenario_untouched() {
    let (monitor, notifier, _) = monitor();
    monitor.ingest_line(ACQUIRED, Some("custom"));
    let before = monitor.get_snapshot("custom").unwrap();
    notifier.take();

    let dir = tempfile::tempdir().unwrap();
    let err = monitor
        .replay_file(&dir.path().join("missing.log"), "custom")
        .unwrap_err();

    assert!(matches!(err, ReplayError::Open { .. }));
    assert_eq!(monitor.get_snapshot("custom").unwrap(), before);
    assert!(notifier.take().is_empty());
}

#[test]
fn replay_tolerates_invalid_utf8() {
    let (monitor, _, _) = monitor();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"\xff\xfe garbage\n").unwrap();
    writeln!(file, "{ACQUIRED}").unwrap();
    file.flush().unwrap();

    let snapshot = monitor.replay_file(file.path(), "custom").unwrap();

    assert_eq!(snapshot.total_events, 1);
}

#[test]
fn replay_of_empty_file_yields_empty_finalized_scenario() {
    let (monitor, _, _) = monitor();
    let file = log_file(&[]);

    let snapshot = monitor.replay_file(file.path(), "custom").unwrap();

    assert!(snapshot.finalized);
    assert_eq!(snapshot.total_events, 0);
    assert_eq!(snapshot.uptime, 0.0);
}

#[test]
fn replaying_a_directory_leaves_scenario_untouched() {
    // Arrange
    let (monitor, notifier, _) = monitor();
    monitor.ingest_line(ACQUIRED, Some("custom"));
    let before = monitor.get_snapshot("custom").unwrap();
    notifier.take();
    let dir = tempfile::tempdir().unwrap();

    // Act
    let err = monitor.replay_file(dir.path(), "custom").unwrap_err();

    // Assert
    assert!(matches!(err, ReplayError::Open { .. }));
    assert_eq!(monitor.get_snapshot("custom").unwrap(), before);
    assert!(notifier.take().is_empty());
    assert!(monitor.list_replays().is_empty());
}

#[test]
fn successful_replays_are_listed_in_order() {
    // Arrange
    let (monitor, _, clock) = monitor();
    let first = log_file(&[ACQUIRED]);
    let second = log_file(&[ACQUIRED, REQUEST, BOOST]);

    // Act
    monitor.replay_file(first.path(), "custom").unwrap();
    clock.advance(TimeDelta::seconds(5));
    monitor.replay_file(second.path(), "pi_test2").unwrap();

    // Assert
    let replays = monitor.list_replays();
    assert_eq!(replays.len(), 2);
    assert_eq!(replays[0].filename, first.path().display().to_string());
    assert_eq!(replays[0].scenario, "custom");
    assert_eq!(replays[0].timestamp, start());
    assert_eq!(replays[0].events, 1);
    assert_eq!(replays[1].scenario, "pi_test2");
    assert_eq!(replays[1].timestamp, start() + TimeDelta::seconds(5));
    assert_eq!(replays[1].events, 3);
}

#[test]
fn failed_replays_are_not_listed() {
    let (monitor, _, _) = monitor();
    let dir = tempfile::tempdir().unwrap();

    let _ = monitor.replay_file(&dir.path().join("missing.log"), "custom");

    assert!(monitor.list_replays().is_empty());
}

#[test]
fn replay_history_keeps_only_the_newest() {
    let mut cfg = MonitorConfig::default();
    cfg.retention.replays = 2;
    let (monitor, _, _) = monitor_with(&cfg);
    let files = [log_file(&[]), log_file(&[ACQUIRED]), log_file(&[ACQUIRED, ACQUIRED])];

    for file in &files {
        monitor.replay_file(file.path(), "custom").unwrap();
    }

    let events: Vec<u64> = monitor.list_replays().iter().map(|r| r.events).collect();
    assert_eq!(events, vec![1, 2]);
}
