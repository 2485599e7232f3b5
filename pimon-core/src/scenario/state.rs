use crate::conf::RetentionConfig;
use crate::event::{Event, Pid};
use crate::scenario::{
    ActiveProcess, BoostEvent, InversionEvent, ProcessStat, RingBuffer, SeverityCounts,
    TimelineEntry,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Accumulated state of one scenario.
///
/// Mutated only by the processor, read only by the projector.
#[derive(Debug)]
pub struct Scenario {
    id: String,
    display_name: String,

    pub(crate) events: RingBuffer<Event>,
    pub(crate) boosts: RingBuffer<BoostEvent>,
    pub(crate) inversions: RingBuffer<InversionEvent>,
    pub(crate) timeline: RingBuffer<TimelineEntry>,

    pub(crate) processes: BTreeMap<Pid, ProcessStat>,
    pub(crate) active: BTreeMap<Pid, ActiveProcess>,

    pub(crate) start_time: DateTime<Utc>,
    pub(crate) end_time: Option<DateTime<Utc>>,

    pub(crate) total_events: u64,
    pub(crate) total_boosts: u64,
    pub(crate) total_inversions: u64,
    pub(crate) severity: SeverityCounts,
}

impl Scenario {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        retention: &RetentionConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            events: RingBuffer::new(retention.events),
            boosts: RingBuffer::new(retention.boosts),
            inversions: RingBuffer::new(retention.inversions),
            timeline: RingBuffer::new(retention.timeline),
            processes: BTreeMap::new(),
            active: BTreeMap::new(),
            start_time: now,
            end_time: None,
            total_events: 0,
            total_boosts: 0,
            total_inversions: 0,
            severity: SeverityCounts::default(),
        }
    }

    /// Forget everything and start the clock again. Identity and bounds are kept.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.events.clear();
        self.boosts.clear();
        self.inversions.clear();
        self.timeline.clear();
        self.processes.clear();
        self.active.clear();
        self.start_time = now;
        self.end_time = None;
        self.total_events = 0;
        self.total_boosts = 0;
        self.total_inversions = 0;
        self.severity = SeverityCounts::default();
    }

    /// Freeze uptime at `now`. Only the first call has an effect.
    pub fn finalize(&mut self, now: DateTime<Utc>) {
        if self.end_time.is_none() {
            self.end_time = Some(now);
        }
    }

    /// Undo [`Scenario::finalize`].
    pub fn reopen(&mut self) {
        self.end_time = None;
    }

    pub(crate) fn process_mut(&mut self, pid: Pid) -> &mut ProcessStat {
        self.processes
            .entry(pid)
            .or_insert_with(|| ProcessStat::new(pid))
    }

    /// Append to the raw history and timeline.
    pub(crate) fn record_history(&mut self, event: Event) {
        self.timeline.push(TimelineEntry::of(&event));
        self.events.push(event);
        self.total_events += 1;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn events(&self) -> &RingBuffer<Event> {
        &self.events
    }

    pub fn boosts(&self) -> &RingBuffer<BoostEvent> {
        &self.boosts
    }

    pub fn inversions(&self) -> &RingBuffer<InversionEvent> {
        &self.inversions
    }

    pub fn timeline(&self) -> &RingBuffer<TimelineEntry> {
        &self.timeline
    }

    pub fn processes(&self) -> &BTreeMap<Pid, ProcessStat> {
        &self.processes
    }

    pub fn active_processes(&self) -> &BTreeMap<Pid, ActiveProcess> {
        &self.active
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn is_finalized(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn total_events(&self) -> u64 {
        self.total_events
    }

    pub fn total_boosts(&self) -> u64 {
        self.total_boosts
    }

    pub fn total_inversions(&self) -> u64 {
        self.total_inversions
    }

    pub fn severity(&self) -> SeverityCounts {
        self.severity
    }
}
