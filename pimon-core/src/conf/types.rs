use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const LIVE_SCENARIO: &str = "live";

/// Top-level monitor configuration (`pimon.hcl`).
///
/// Every field has a default, so an empty file describes the stock monitor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Scenario that receives lines no marker claims.
    pub default_scenario: String,

    /// What a live event does to a scenario that a replay already finalized.
    pub live_resumption: LiveResumption,

    pub source: SourceConfig,
    pub retention: RetentionConfig,
    pub broadcast: BroadcastConfig,
    pub scenarios: Vec<ScenarioConfig>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            default_scenario: LIVE_SCENARIO.to_string(),
            live_resumption: LiveResumption::default(),
            source: SourceConfig::default(),
            retention: RetentionConfig::default(),
            broadcast: BroadcastConfig::default(),
            scenarios: vec![
                ScenarioConfig::new(LIVE_SCENARIO, "Live Monitor", &[]),
                ScenarioConfig::new(
                    "pi_detailed",
                    "PI Detailed Test",
                    &["PI Detailed Test", "pi_detailed"],
                ),
                ScenarioConfig::new("pi_test2", "PI Test 2", &["PI Test 2", "pi_test2"]),
                ScenarioConfig::new("custom", "Custom Analysis", &[]),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveResumption {
    /// `end_time` survives later live events.
    #[default]
    Keep,
    /// The first live event clears `end_time`.
    Reopen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartPosition {
    /// Skip whatever the file held when the watcher started.
    #[default]
    End,
    Beginning,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub start: StartPosition,
    pub poll_interval_ms: u64,
    pub retry_delay_ms: u64,
}

impl SourceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("xv6_output.log"),
            start: StartPosition::End,
            poll_interval_ms: 100,
            retry_delay_ms: 2000,
        }
    }
}

/// History bounds. Totals keep counting past these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetentionConfig {
    pub events: usize,
    pub boosts: usize,
    pub inversions: usize,
    pub timeline: usize,
    /// Completed replays remembered by the monitor, across all scenarios.
    pub replays: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            events: 1000,
            boosts: 10_000,
            inversions: 10_000,
            timeline: 10_000,
            replays: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BroadcastConfig {
    /// Deltas buffered per subscriber before the slowest one starts losing them.
    pub capacity: usize,

    /// Publish a stats update every N processed events.
    pub stats_every: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            stats_every: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Substrings that route a raw line to this scenario.
    #[serde(default)]
    pub markers: Vec<String>,
}

impl ScenarioConfig {
    pub fn new(id: &str, display_name: &str, markers: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: Some(display_name.to_string()),
            markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}
