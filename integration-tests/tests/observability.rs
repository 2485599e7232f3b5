use integration_tests::harness::{
    TestLog, captured_events, init_test_tracing, lock_acquired, lock_request,
};
use pimon_core::Monitor;
use pimon_core::broadcast::NullNotifier;
use pimon_core::conf::{MonitorConfig, SourceConfig, StartPosition};
use pimon_core::watcher::{ShutdownHandle, Watcher};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn replay_logs_start_and_finish() {
    // Arrange
    init_test_tracing();
    let monitor = Monitor::new(&MonitorConfig::default(), Arc::new(NullNotifier));
    let log = TestLog::with_lines(&[&lock_acquired(1, 20), &lock_request(2, 10, 1, 20)]);

    // Act
    monitor.replay_file(log.path(), "observed_replay").unwrap();

    // Assert
    let events = captured_events();
    let finished = events
        .iter()
        .find(|e| {
            e.message() == Some("replay finished") && e.field("scenario") == Some("observed_replay")
        })
        .expect("expected replay finished event");

    assert_eq!(finished.level, tracing::Level::INFO);
    assert_eq!(finished.field("events"), Some("2"));
    assert_eq!(finished.field("inversions"), Some("1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_source_is_reported_once_per_outage() {
    init_test_tracing();
    let log = TestLog::missing();
    let path = log.path().display().to_string();

    let monitor = Arc::new(Monitor::new(&MonitorConfig::default(), Arc::new(NullNotifier)));
    let source = SourceConfig {
        path: log.path().to_path_buf(),
        start: StartPosition::End,
        poll_interval_ms: 5,
        retry_delay_ms: 5,
    };
    let shutdown = ShutdownHandle::new();
    let task = Watcher::new(monitor, source).spawn(shutdown.subscribe());

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();

    let warnings = captured_events()
        .into_iter()
        .filter(|e| e.message() == Some("waiting for log source"))
        .filter(|e| e.field("error").is_some_and(|err| err.contains(&path)))
        .count();
    assert_eq!(warnings, 1);
}
