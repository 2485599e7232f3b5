use integration_tests::harness::{
    TestLog, lock_acquired, lock_released, lock_request, priority_boost, priority_restore,
};
use pimon_core::broadcast::{BroadcastNotifier, NullNotifier};
use pimon_core::conf::MonitorConfig;
use pimon_core::{Monitor, ReplayError};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn monitor() -> Monitor {
    Monitor::new(&MonitorConfig::default(), Arc::new(NullNotifier))
}

fn session() -> TestLog {
    TestLog::with_lines(&[
        "init: starting sh",
        &lock_acquired(1, 20),
        "$ pi_test",
        &lock_request(2, 10, 1, 20),
        &priority_boost(1, 2, 20, 10),
        &lock_released(1),
        &priority_restore(1, 20),
        &lock_acquired(2, 10),
        "{ not an event }",
    ])
}

#[test]
fn replay_produces_complete_statistics() {
    // Arrange
    let monitor = monitor();
    let log = session();

    // Act
    let snapshot = monitor.replay_file(log.path(), "custom").unwrap();

    // Assert
    assert!(snapshot.finalized);
    assert_eq!(snapshot.total_events, 6);
    assert_eq!(snapshot.total_boosts, 1);
    assert_eq!(snapshot.total_inversions, 1);
    assert_eq!(snapshot.max_severity, Some(10));
    assert_eq!(snapshot.inversions_by_severity.high, 1);

    let holder = &snapshot.process_stats[&1];
    assert_eq!(holder.boosts_received, 1);
    assert_eq!(holder.priority, Some(20));
    assert_eq!(holder.best_priority, Some(10));

    let waiter = &snapshot.process_stats[&2];
    assert_eq!(waiter.boosts_given, 1);
    assert_eq!(waiter.blocks, 1);
    assert_eq!(waiter.locks_held, 1);
}

#[test]
fn snapshot_serializes_with_stable_keys() {
    let monitor = monitor();
    let log = session();

    let snapshot = monitor.replay_file(log.path(), "custom").unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();

    for key in [
        "scenario",
        "name",
        "total_boosts",
        "total_inversions",
        "total_events",
        "uptime",
        "active_processes",
        "process_stats",
        "recent_events",
        "timeline",
        "recent_boosts",
        "recent_inversions",
        "boost_rate",
        "avg_boosts_per_process",
        "inversions_by_severity",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["name"], "Custom Analysis");
    assert_eq!(json["timeline"][0]["type"], "lock_acquired");
}

#[test]
fn replay_does_not_touch_other_scenarios() {
    let monitor = monitor();
    monitor.ingest_line(&lock_acquired(9, 30), None);
    let live_before = monitor.get_snapshot("live").unwrap();

    monitor.replay_file(session().path(), "custom").unwrap();

    assert_eq!(monitor.get_snapshot("live").unwrap(), live_before);
}

#[test]
fn replaying_the_same_file_twice_gives_the_same_counts() {
    let monitor = monitor();
    let log = session();

    let first = monitor.replay_file(log.path(), "custom").unwrap();
    let second = monitor.replay_file(log.path(), "custom").unwrap();

    assert_eq!(first.total_events, second.total_events);
    assert_eq!(first.total_boosts, second.total_boosts);
    assert_eq!(first.total_inversions, second.total_inversions);
    assert_eq!(first.process_stats, second.process_stats);
    assert_eq!(first.inversions_by_severity, second.inversions_by_severity);
}

#[test]
fn replay_of_missing_file_is_an_open_error() {
    let monitor = monitor();
    let log = TestLog::missing();

    let err = monitor.replay_file(log.path(), "custom").unwrap_err();

    assert!(matches!(err, ReplayError::Open { .. }));
    assert!(err.to_string().contains("xv6_output.log"));
}

#[test]
fn replay_ends_with_a_final_stats_update() {
    let notifier = Arc::new(BroadcastNotifier::new(64));
    let mut rx = notifier.subscribe();
    let monitor = Monitor::new(&MonitorConfig::default(), notifier);

    monitor.replay_file(session().path(), "pi_test2").unwrap();

    let mut last = None;
    while let Ok(delta) = rx.try_recv() {
        last = Some(delta);
    }
    let last = last.unwrap();
    assert_eq!(last.scenario, "pi_test2");
    assert_eq!(last.payload.name(), "stats_update");
}
