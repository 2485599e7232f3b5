//! The monitor: parsing, classification, processing and publishing behind one
//! handle.
//!
//! A raw line is parsed into an event, routed to a scenario by the classifier,
//! applied under that scenario's write lock, and the resulting deltas go to the
//! notifier before the lock is released.

mod error;
mod history;

#[cfg(test)]
mod tests;

pub use error::{MonitorError, ReplayError};
pub use history::ReplayRecord;

use crate::broadcast::{Delta, DeltaPayload, Notifier};
use crate::classify::{Classifier, MarkerClassifier};
use crate::clock::{Clock, SystemClock};
use crate::conf::{LiveResumption, MonitorConfig};
use crate::event::parse_line;
use crate::processor::{self, SnapshotDelta};
use crate::projector::{Snapshot, project};
use crate::scenario::{Scenario, ScenarioStore, read_scenario, write_scenario};
use chrono::{DateTime, Utc};
use history::ReplayHistory;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug)]
pub struct Monitor {
    store: ScenarioStore,
    classifier: Box<dyn Classifier>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    stats_every: u64,
    live_resumption: LiveResumption,
    replays: ReplayHistory,
}

impl Monitor {
    pub fn new(cfg: &MonitorConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_clock(cfg, notifier, Arc::new(SystemClock))
    }

    pub fn with_clock(
        cfg: &MonitorConfig,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store: ScenarioStore::from_config(cfg, clock.now()),
            classifier: Box::new(MarkerClassifier::from_config(&cfg.scenarios)),
            notifier,
            clock,
            stats_every: cfg.broadcast.stats_every,
            live_resumption: cfg.live_resumption,
            replays: ReplayHistory::new(cfg.retention.replays),
        }
    }

    /// Replace the line classification rule.
    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn store(&self) -> &ScenarioStore {
        &self.store
    }

    /// Feed one raw line.
    ///
    /// `scenario_hint` bypasses classification. Returns the scenario the event
    /// went to, or `None` if the line held no event.
    pub fn ingest_line(&self, raw: &str, scenario_hint: Option<&str>) -> Option<String> {
        let now = self.clock.now();
        let event = parse_line(raw, now)?;

        let scenario_id = match scenario_hint.or_else(|| self.classifier.classify(raw)) {
            Some(id) => id.to_string(),
            None => self.store.default_scenario().to_string(),
        };

        let handle = self.store.get_or_create(&scenario_id, now);
        let mut scenario = write_scenario(&handle);

        if scenario.is_finalized() && self.live_resumption == LiveResumption::Reopen {
            tracing::info!(scenario = %scenario_id, "reopening finalized scenario");
            scenario.reopen();
        }

        let delta = processor::apply(&mut scenario, event, self.stats_every);
        self.publish(&scenario, delta, now);

        Some(scenario_id)
    }

    /// Current statistics for `scenario`.
    pub fn get_snapshot(&self, scenario: &str) -> Result<Snapshot, MonitorError> {
        let handle = self
            .store
            .get(scenario)
            .ok_or_else(|| MonitorError::UnknownScenario {
                scenario: scenario.to_string(),
            })?;

        let state = read_scenario(&handle);
        Ok(project(&state, self.clock.now()))
    }

    /// Reset `scenario`, apply every event in `path`, then finalize it.
    ///
    /// The scenario stays locked for the whole file, so live lines routed to
    /// it wait rather than interleave. This blocks the calling thread; async
    /// callers should run it under `tokio::task::spawn_blocking`.
    ///
    /// If the path cannot be opened or is not a regular file the scenario is
    /// left untouched. A read error part way leaves it partially populated.
    /// Only successful replays are added to [`Monitor::list_replays`].
    pub fn replay_file(&self, path: &Path, scenario: &str) -> Result<Snapshot, ReplayError> {
        let open_error = |source| ReplayError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_error)?;
        let metadata = file.metadata().map_err(open_error)?;
        if !metadata.is_file() {
            return Err(open_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        let started = self.clock.now();
        let handle = self.store.get_or_create(scenario, started);
        let mut state = write_scenario(&handle);
        state.reset(started);

        tracing::info!(scenario, path = %path.display(), "replay started");

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            line_no += 1;

            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ReplayError::Read {
                    path: path.to_path_buf(),
                    line: line_no,
                    source,
                })?;
            if read == 0 {
                break;
            }

            let now = self.clock.now();
            let line = String::from_utf8_lossy(&buf);
            let Some(event) = parse_line(&line, now) else {
                continue;
            };

            let delta = processor::apply(&mut state, event, self.stats_every);
            self.publish(&state, delta, now);
        }

        let finished = self.clock.now();
        state.finalize(finished);

        let snapshot = project(&state, finished);
        self.notifier.notify(Delta::new(
            scenario,
            DeltaPayload::StatsUpdate(Arc::new(snapshot.clone())),
        ));

        tracing::info!(
            scenario,
            events = snapshot.total_events,
            boosts = snapshot.total_boosts,
            inversions = snapshot.total_inversions,
            "replay finished"
        );

        self.replays.record(ReplayRecord {
            filename: path.display().to_string(),
            scenario: scenario.to_string(),
            timestamp: finished,
            events: snapshot.total_events,
        });

        Ok(snapshot)
    }

    /// Completed replays, oldest first, bounded by `retention.replays`.
    pub fn list_replays(&self) -> Vec<ReplayRecord> {
        self.replays.list()
    }

    /// Scenario ids in registration order.
    pub fn list_scenarios(&self) -> Vec<String> {
        self.store.ids()
    }

    /// Route unclassified lines to `scenario` from now on.
    pub fn set_default_scenario(&self, scenario: &str) {
        self.store.set_default_scenario(scenario, self.clock.now());
    }

    pub fn default_scenario(&self) -> String {
        self.store.default_scenario().to_string()
    }

    /// Hand the deltas of one applied event to the notifier.
    ///
    /// Called with the scenario write lock held, which keeps per-scenario
    /// delivery in processing order.
    fn publish(&self, scenario: &Scenario, delta: SnapshotDelta, now: DateTime<Utc>) {
        let id = scenario.id();

        if let Some(inversion) = delta.inversion {
            self.notifier
                .notify(Delta::new(id, DeltaPayload::InversionDetected(inversion)));
        }

        if let Some(boost) = delta.boost {
            self.notifier
                .notify(Delta::new(id, DeltaPayload::PriorityBoost(boost)));
        }

        if delta.stats_due {
            let snapshot = project(scenario, now);
            self.notifier
                .notify(Delta::new(id, DeltaPayload::StatsUpdate(Arc::new(snapshot))));
        }
    }
}
