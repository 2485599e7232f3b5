use crate::event::{Event, Pid};
use crate::scenario::{
    BoostEvent, InversionEvent, ProcessState, ProcessStat, Scenario, SeverityCounts,
    TimelineEntry,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;


pub const RECENT_EVENTS: usize = 20;
pub const RECENT_TIMELINE: usize = 50;
pub const RECENT_BOOSTS: usize = 100;
pub const RECENT_INVERSIONS: usize = 100;

/// Read-only view of a scenario at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub scenario: String,
    pub name: String,

    pub total_boosts: u64,
    pub total_inversions: u64,
    /// Every event processed since the last reset.
    pub total_events: u64,
    /// Events still held in the bounded history.
    pub buffered_events: usize,

    /// Seconds from start to end time, or to now while still open.
    pub uptime: f64,
    pub finalized: bool,

    pub active_processes: usize,
    pub running_processes: usize,
    pub process_stats: BTreeMap<Pid, ProcessStat>,

    pub recent_events: Vec<Event>,
    pub timeline: Vec<TimelineEntry>,
    pub recent_boosts: Vec<BoostEvent>,
    pub recent_inversions: Vec<InversionEvent>,

    pub boost_rate: f64,
    pub avg_boosts_per_process: f64,
    pub inversions_by_severity: SeverityCounts,
    pub max_severity: Option<i64>,
}

/// Compute the snapshot of `scenario` as of `now`. Does not mutate.
pub fn project(scenario: &Scenario, now: DateTime<Utc>) -> Snapshot {
    let end = scenario.end_time().unwrap_or(now);
    let uptime = (end - scenario.start_time()).num_milliseconds() as f64 / 1000.0;

    let boost_rate = if uptime > 0.0 {
        scenario.total_boosts() as f64 / uptime
    } else {
        0.0
    };

    let processes = scenario.processes();
    let avg_boosts_per_process = if processes.is_empty() {
        0.0
    } else {
        let received: u64 = processes.values().map(|p| p.boosts_received).sum();
        received as f64 / processes.len() as f64
    };

    let active = scenario.active_processes();
    let running_processes = active
        .values()
        .filter(|p| p.state == ProcessState::Running)
        .count();

    Snapshot {
        scenario: scenario.id().to_string(),
        name: scenario.display_name().to_string(),
        total_boosts: scenario.total_boosts(),
        total_inversions: scenario.total_inversions(),
        total_events: scenario.total_events(),
        buffered_events: scenario.events().len(),
        uptime,
        finalized: scenario.is_finalized(),
        active_processes: active.len(),
        running_processes,
        process_stats: processes.clone(),
        recent_events: scenario.events().recent(RECENT_EVENTS),
        timeline: scenario.timeline().recent(RECENT_TIMELINE),
        recent_boosts: scenario.boosts().recent(RECENT_BOOSTS),
        recent_inversions: scenario.inversions().recent(RECENT_INVERSIONS),
        boost_rate,
        avg_boosts_per_process,
        inversions_by_severity: scenario.severity(),
        max_severity: scenario.inversions().iter().map(|i| i.severity).max(),
    }
}
