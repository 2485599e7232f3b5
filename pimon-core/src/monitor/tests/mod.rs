mod replay_tests;

use crate::broadcast::{Delta, Notifier};
use crate::clock::ManualClock;
use crate::conf::MonitorConfig;
use crate::monitor::Monitor;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};

/// Keeps every delta it is handed.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    deltas: Mutex<Vec<Delta>>,
}

impl RecordingNotifier {
    pub(crate) fn take(&self) -> Vec<Delta> {
        std::mem::take(&mut *self.deltas.lock().unwrap())
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.deltas
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.payload.name())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, delta: Delta) {
        self.deltas.lock().unwrap().push(delta);
    }
}

pub(crate) fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub(crate) fn monitor_with(
    cfg: &MonitorConfig,
) -> (Monitor, Arc<RecordingNotifier>, Arc<ManualClock>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let clock = Arc::new(ManualClock::new(start()));
    let monitor = Monitor::with_clock(cfg, notifier.clone(), clock.clone());
    (monitor, notifier, clock)
}

pub(crate) fn monitor() -> (Monitor, Arc<RecordingNotifier>, Arc<ManualClock>) {
    monitor_with(&MonitorConfig::default())
}

pub(crate) const ACQUIRED: &str = r#"{"event":"lock_acquired","pid":1,"priority":20}"#;
pub(crate) const REQUEST: &str =
    r#"{"event":"lock_request","pid":2,"priority":10,"holder_pid":1,"holder_priority":20}"#;
pub(crate) const BOOST: &str = r#"{"event":"priority_boost","holder_pid":1,"waiter_pid":2,"old_priority":20,"new_priority":10}"#;
