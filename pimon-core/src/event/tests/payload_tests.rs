use crate::event::{
    EventError, LockRequest, Payload, PriorityBoost, PriorityRestore, parse_line,
};
use chrono::Utc;
use pretty_assertions::assert_eq;

fn payload(line: &str) -> Result<Payload, EventError> {
    parse_line(line, Utc::now()).unwrap().payload()
}

#[test]
fn lock_request_payload() {
    let p = payload(
        r#"{"event":"lock_request","pid":2,"priority":10,"holder_pid":1,"holder_priority":20,"name":"hi"}"#,
    )
    .unwrap();

    assert_eq!(
        p,
        Payload::LockRequest(LockRequest {
            pid: 2,
            priority: 10,
            holder_pid: 1,
            holder_priority: 20,
            name: Some("hi".to_string()),
        })
    );
}

#[test]
fn boost_and_restore_payloads() {
    assert_eq!(
        payload(
            r#"{"event":"priority_boost","holder_pid":1,"waiter_pid":2,"old_priority":20,"new_priority":10}"#
        )
        .unwrap(),
        Payload::PriorityBoost(PriorityBoost {
            holder_pid: 1,
            waiter_pid: 2,
            old_priority: 20,
            new_priority: 10,
        })
    );

    assert_eq!(
        payload(r#"{"event":"priority_restore","pid":1,"new_priority":20}"#).unwrap(),
        Payload::PriorityRestore(PriorityRestore {
            pid: 1,
            new_priority: 20,
        })
    );
}

#[test]
fn missing_field_is_reported() {
    let err = payload(r#"{"event":"lock_request","pid":2,"priority":10,"holder_pid":1}"#)
        .unwrap_err();

    assert_eq!(err, EventError::missing("lock_request", "holder_priority"));
}

#[test]
fn wrong_type_counts_as_missing() {
    let err = payload(r#"{"event":"lock_released","pid":"seven"}"#).unwrap_err();
    assert_eq!(err, EventError::missing("lock_released", "pid"));

    let err = payload(r#"{"event":"lock_acquired","pid":-1,"priority":3}"#).unwrap_err();
    assert_eq!(err, EventError::missing("lock_acquired", "pid"));
}

#[test]
fn unknown_kind_has_empty_payload() {
    assert_eq!(
        payload(r#"{"event":"sched_tick"}"#).unwrap(),
        Payload::Unknown
    );
}
