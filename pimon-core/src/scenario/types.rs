use crate::event::{Event, EventKind, Pid, Priority};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything known about one process within one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStat {
    pub pid: Pid,
    pub name: Option<String>,
    /// Last priority seen for this process.
    pub priority: Option<Priority>,
    /// First priority seen when the process acquired a lock.
    pub initial_priority: Option<Priority>,
    /// Numerically smallest priority observed, i.e. the most boosted.
    pub best_priority: Option<Priority>,
    /// Numerically largest priority observed.
    pub worst_priority: Option<Priority>,
    pub boosts_received: u64,
    pub boosts_given: u64,
    /// Lifetime lock acquisitions.
    pub locks_held: u64,
    /// Times this process blocked on a held lock.
    pub blocks: u64,
}

impl ProcessStat {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            name: None,
            priority: None,
            initial_priority: None,
            best_priority: None,
            worst_priority: None,
            boosts_received: 0,
            boosts_given: 0,
            locks_held: 0,
            blocks: 0,
        }
    }

    /// Fold one priority sighting into the best/worst trackers.
    pub fn observe_priority(&mut self, priority: Priority) {
        self.best_priority = Some(self.best_priority.map_or(priority, |p| p.min(priority)));
        self.worst_priority = Some(self.worst_priority.map_or(priority, |p| p.max(priority)));
    }

    pub fn set_name(&mut self, name: Option<&String>) {
        if let Some(name) = name {
            self.name = Some(name.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    Running,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveProcess {
    pub priority: Priority,
    pub state: ProcessState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoostEvent {
    pub timestamp: DateTime<Utc>,
    pub holder_pid: Pid,
    pub waiter_pid: Pid,
    pub old_priority: Priority,
    pub new_priority: Priority,
}

/// A more urgent process blocked behind a less urgent lock holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InversionEvent {
    pub timestamp: DateTime<Utc>,
    pub high_priority_pid: Pid,
    pub high_priority: Priority,
    pub low_priority_pid: Pid,
    pub low_priority: Priority,
    /// `low_priority - high_priority`, always at least 1.
    pub severity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: Event,
}

impl TimelineEntry {
    pub fn of(event: &Event) -> Self {
        Self {
            time: event.timestamp(),
            kind: event.kind().clone(),
            data: event.clone(),
        }
    }
}
