//! Applies kernel events to scenario state.
//!
//! Priorities are inverted: a smaller number is more urgent. A lock request is
//! a priority inversion when the holder's number is strictly greater than the
//! requester's, and a boost moves the holder's number *down*.

use crate::event::{
    Event, LockAcquired, LockReleased, LockRequest, Payload, PriorityBoost, PriorityRestore,
};
use crate::scenario::{ActiveProcess, BoostEvent, InversionEvent, ProcessState, Scenario};
use chrono::{DateTime, Utc};


/// What one applied event produced for subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDelta {
    pub boost: Option<BoostEvent>,
    pub inversion: Option<InversionEvent>,
    /// A fresh stats snapshot should be published.
    pub stats_due: bool,
}

/// Apply one event to `scenario`.
///
/// The event always lands in the history. Statistics change only when the
/// kind is known and every required field is present; otherwise the event is
/// a no-op for counters. A stats update is requested every `stats_every`
/// processed events.
pub fn apply(scenario: &mut Scenario, event: Event, stats_every: u64) -> SnapshotDelta {
    let mut delta = SnapshotDelta::default();
    let at = event.timestamp();

    match event.payload() {
        Ok(Payload::LockRequest(req)) => on_lock_request(scenario, &req, at, &mut delta),
        Ok(Payload::LockAcquired(acq)) => on_lock_acquired(scenario, &acq),
        Ok(Payload::LockReleased(rel)) => on_lock_released(scenario, &rel),
        Ok(Payload::PriorityBoost(boost)) => on_priority_boost(scenario, &boost, at, &mut delta),
        Ok(Payload::PriorityRestore(restore)) => on_priority_restore(scenario, &restore),
        Ok(Payload::Unknown) => {
            tracing::trace!(
                scenario = scenario.id(),
                kind = event.kind().as_str(),
                "unrecognized event kind"
            );
        }
        Err(e) => {
            tracing::debug!(scenario = scenario.id(), error = %e, "event skipped");
        }
    }

    scenario.record_history(event);
    delta.stats_due = stats_every <= 1 || scenario.total_events % stats_every == 0;

    delta
}

fn on_lock_request(
    scenario: &mut Scenario,
    req: &LockRequest,
    at: DateTime<Utc>,
    delta: &mut SnapshotDelta,
) {
    let requester = scenario.process_mut(req.pid);
    requester.blocks += 1;
    requester.set_name(req.name.as_ref());
    requester.observe_priority(req.priority);

    // The holder is only tracked once it has appeared in its own right.
    if let Some(holder) = scenario.processes.get_mut(&req.holder_pid) {
        holder.observe_priority(req.holder_priority);
    }

    if req.holder_priority > req.priority {
        let inversion = InversionEvent {
            timestamp: at,
            high_priority_pid: req.pid,
            high_priority: req.priority,
            low_priority_pid: req.holder_pid,
            low_priority: req.holder_priority,
            severity: i64::from(req.holder_priority) - i64::from(req.priority),
        };

        tracing::debug!(
            scenario = scenario.id(),
            blocked = req.pid,
            holder = req.holder_pid,
            severity = inversion.severity,
            "priority inversion detected"
        );

        scenario.total_inversions += 1;
        scenario.severity.record(inversion.severity);
        scenario.inversions.push(inversion.clone());
        delta.inversion = Some(inversion);
    }
}

fn on_lock_acquired(scenario: &mut Scenario, acq: &LockAcquired) {
    let holder = scenario.process_mut(acq.pid);
    holder.locks_held += 1;
    holder.set_name(acq.name.as_ref());
    if holder.initial_priority.is_none() {
        holder.initial_priority = Some(acq.priority);
    }
    holder.priority = Some(acq.priority);
    holder.observe_priority(acq.priority);

    scenario.active.insert(
        acq.pid,
        ActiveProcess {
            priority: acq.priority,
            state: ProcessState::Running,
        },
    );
}

fn on_lock_released(scenario: &mut Scenario, rel: &LockReleased) {
    // Released processes stay listed so reports cover everything ever seen.
    if let Some(active) = scenario.active.get_mut(&rel.pid) {
        active.state = ProcessState::Idle;
    }
}

fn on_priority_boost(
    scenario: &mut Scenario,
    boost: &PriorityBoost,
    at: DateTime<Utc>,
    delta: &mut SnapshotDelta,
) {
    scenario.total_boosts += 1;

    let holder = scenario.process_mut(boost.holder_pid);
    holder.boosts_received += 1;
    holder.observe_priority(boost.new_priority);

    scenario.process_mut(boost.waiter_pid).boosts_given += 1;

    let event = BoostEvent {
        timestamp: at,
        holder_pid: boost.holder_pid,
        waiter_pid: boost.waiter_pid,
        old_priority: boost.old_priority,
        new_priority: boost.new_priority,
    };

    tracing::debug!(
        scenario = scenario.id(),
        holder = boost.holder_pid,
        waiter = boost.waiter_pid,
        from = boost.old_priority,
        to = boost.new_priority,
        "priority boost"
    );

    scenario.boosts.push(event.clone());
    delta.boost = Some(event);
}

fn on_priority_restore(scenario: &mut Scenario, restore: &PriorityRestore) {
    let process = scenario.process_mut(restore.pid);
    process.priority = Some(restore.new_priority);
    process.observe_priority(restore.new_priority);
}
