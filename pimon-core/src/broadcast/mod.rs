//! Delivery of scenario changes to subscribers.
//!
//! The core only talks to [`Notifier`]. [`BroadcastNotifier`] fans deltas out
//! over a bounded Tokio broadcast channel: sending never blocks, and a
//! subscriber that falls more than `capacity` deltas behind loses the oldest
//! ones instead of slowing down ingestion.

use crate::projector::Snapshot;
use crate::scenario::{BoostEvent, InversionEvent};
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::broadcast;


/// One change to one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delta {
    pub scenario: String,
    #[serde(flatten)]
    pub payload: DeltaPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum DeltaPayload {
    PriorityBoost(BoostEvent),
    InversionDetected(InversionEvent),
    StatsUpdate(Arc<Snapshot>),
}

impl DeltaPayload {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PriorityBoost(_) => "priority_boost",
            Self::InversionDetected(_) => "inversion_detected",
            Self::StatsUpdate(_) => "stats_update",
        }
    }
}

impl Delta {
    pub fn new(scenario: &str, payload: DeltaPayload) -> Self {
        Self {
            scenario: scenario.to_string(),
            payload,
        }
    }
}

/// Receiver of deltas. Implementations must not block.
pub trait Notifier: Debug + Send + Sync {
    fn notify(&self, delta: Delta);
}

/// Drops every delta.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _delta: Delta) {}
}

#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Delta>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Delta> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, delta: Delta) {
        // Err only means nobody is subscribed right now.
        if self.tx.send(delta).is_err() {
            tracing::trace!("no subscribers; delta dropped");
        }
    }
}
