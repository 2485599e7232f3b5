use crate::event::{EventKind, extract_record, parse_line};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

#[test]
fn extract_record_skips_prefix_noise() {
    let line = r#"[cpu0] PI Test 2 {"event":"lock_released","pid":3} trailing"#;

    assert_eq!(
        extract_record(line),
        Some(r#"{"event":"lock_released","pid":3}"#)
    );
}

#[test]
fn extract_record_handles_nested_objects() {
    let line = r#"x {"event":"lock_acquired","meta":{"cpu":{"id":1}},"pid":2} {"other":1}"#;

    assert_eq!(
        extract_record(line),
        Some(r#"{"event":"lock_acquired","meta":{"cpu":{"id":1}},"pid":2}"#)
    );
}

#[test]
fn extract_record_ignores_braces_in_strings() {
    let line = r#"{"event":"lock_request","lock":"tbl}{\"x","pid":1}"#;

    assert_eq!(extract_record(line), Some(line));
}

#[test]
fn extract_record_unbalanced_is_none() {
    assert_eq!(extract_record(r#"{"event":"lock_request","pid":1"#), None);
    assert_eq!(extract_record("no braces here"), None);
}

#[test]
fn parse_line_builds_event() {
    let event = parse_line(
        r#"init: {"event":"lock_acquired","pid":1,"priority":20}"#,
        now(),
    )
    .unwrap();

    assert_eq!(event.kind(), &EventKind::LockAcquired);
    assert_eq!(event.timestamp(), now());
    assert_eq!(event.record().get("pid"), Some(&json!(1)));
}

#[test]
fn parse_line_malformed_is_none() {
    assert!(parse_line("not json at all", now()).is_none());
    assert!(parse_line("{not json}", now()).is_none());
    assert!(parse_line(r#"{"pid":1,"priority":3}"#, now()).is_none());
    assert!(parse_line(r#"{"event":42}"#, now()).is_none());
}

#[test]
fn parse_line_drops_source_timestamp() {
    let event = parse_line(
        r#"{"event":"lock_released","pid":7,"timestamp":"1970-01-01T00:00:00Z"}"#,
        now(),
    )
    .unwrap();

    assert!(event.record().get("timestamp").is_none());

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["timestamp"], json!("2026-01-01T12:00:00Z"));
    assert_eq!(json["event"], json!("lock_released"));
}

#[test]
fn parse_line_keeps_unknown_kinds() {
    let event = parse_line(r#"{"event":"sched_tick","cpu":0}"#, now()).unwrap();

    assert_eq!(event.kind(), &EventKind::Other("sched_tick".to_string()));
}
