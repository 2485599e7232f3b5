use crate::scenario::RingBuffer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// One completed replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayRecord {
    /// The replayed path as given by the caller.
    pub filename: String,
    pub scenario: String,
    /// When the replay finished.
    pub timestamp: DateTime<Utc>,
    pub events: u64,
}

/// Most recent replays, oldest first.
#[derive(Debug)]
pub(crate) struct ReplayHistory {
    records: Mutex<RingBuffer<ReplayRecord>>,
}

impl ReplayHistory {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(RingBuffer::new(capacity)),
        }
    }

    pub(crate) fn record(&self, record: ReplayRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub(crate) fn list(&self) -> Vec<ReplayRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}
