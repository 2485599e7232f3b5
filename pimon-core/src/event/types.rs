use crate::event::EventError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

pub type Pid = u32;

/// Scheduling priority. Numerically smaller is more urgent.
pub type Priority = i32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    LockRequest,
    LockAcquired,
    LockReleased,
    PriorityBoost,
    PriorityRestore,
    Other(String),
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "lock_request" => Self::LockRequest,
            "lock_acquired" => Self::LockAcquired,
            "lock_released" => Self::LockReleased,
            "priority_boost" => Self::PriorityBoost,
            "priority_restore" => Self::PriorityRestore,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::LockRequest => "lock_request",
            Self::LockAcquired => "lock_acquired",
            Self::LockReleased => "lock_released",
            Self::PriorityBoost => "priority_boost",
            Self::PriorityRestore => "priority_restore",
            Self::Other(name) => name,
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One decoded kernel record plus the time it was ingested.
///
/// Serializes as the source record with `timestamp` set to the processing
/// time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(skip)]
    kind: EventKind,

    #[serde(flatten)]
    record: Map<String, Value>,

    timestamp: DateTime<Utc>,
}

impl Event {
    /// Build an event from a decoded record.
    ///
    /// Returns `None` when the record has no string `event` key. Any
    /// `timestamp` carried by the record is dropped.
    pub fn from_record(mut record: Map<String, Value>, timestamp: DateTime<Utc>) -> Option<Self> {
        let kind = EventKind::from_name(record.get("event")?.as_str()?);
        record.remove("timestamp");

        Some(Self {
            kind,
            record,
            timestamp,
        })
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Decode the kind-specific fields.
    pub fn payload(&self) -> Result<Payload, EventError> {
        let payload = match self.kind {
            EventKind::LockRequest => Payload::LockRequest(LockRequest {
                pid: self.pid("pid")?,
                priority: self.priority("priority")?,
                holder_pid: self.pid("holder_pid")?,
                holder_priority: self.priority("holder_priority")?,
                name: self.name(),
            }),
            EventKind::LockAcquired => Payload::LockAcquired(LockAcquired {
                pid: self.pid("pid")?,
                priority: self.priority("priority")?,
                name: self.name(),
            }),
            EventKind::LockReleased => Payload::LockReleased(LockReleased {
                pid: self.pid("pid")?,
            }),
            EventKind::PriorityBoost => Payload::PriorityBoost(PriorityBoost {
                holder_pid: self.pid("holder_pid")?,
                waiter_pid: self.pid("waiter_pid")?,
                old_priority: self.priority("old_priority")?,
                new_priority: self.priority("new_priority")?,
            }),
            EventKind::PriorityRestore => Payload::PriorityRestore(PriorityRestore {
                pid: self.pid("pid")?,
                new_priority: self.priority("new_priority")?,
            }),
            EventKind::Other(_) => Payload::Unknown,
        };

        Ok(payload)
    }

    fn pid(&self, field: &'static str) -> Result<Pid, EventError> {
        self.record
            .get(field)
            .and_then(Value::as_u64)
            .and_then(|v| Pid::try_from(v).ok())
            .ok_or_else(|| EventError::missing(self.kind.as_str(), field))
    }

    fn priority(&self, field: &'static str) -> Result<Priority, EventError> {
        self.record
            .get(field)
            .and_then(Value::as_i64)
            .and_then(|v| Priority::try_from(v).ok())
            .ok_or_else(|| EventError::missing(self.kind.as_str(), field))
    }

    fn name(&self) -> Option<String> {
        self.record
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    LockRequest(LockRequest),
    LockAcquired(LockAcquired),
    LockReleased(LockReleased),
    PriorityBoost(PriorityBoost),
    PriorityRestore(PriorityRestore),
    Unknown,
}

/// A process asked for a lock someone else holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    pub pid: Pid,
    pub priority: Priority,
    pub holder_pid: Pid,
    pub holder_priority: Priority,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockAcquired {
    pub pid: Pid,
    pub priority: Priority,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReleased {
    pub pid: Pid,
}

/// The holder inherited the waiter's priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityBoost {
    pub holder_pid: Pid,
    pub waiter_pid: Pid,
    pub old_priority: Priority,
    pub new_priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityRestore {
    pub pid: Pid,
    pub new_priority: Priority,
}
