//! Per-scenario state.
//!
//! A scenario is an isolated analysis bucket: its own bounded event history,
//! process table, boost and inversion records. The store maps scenario ids to
//! independently locked scenarios so that writers to one never wait on another.

mod ring;
mod severity;
mod state;
mod store;
mod types;


pub use ring::RingBuffer;
pub use severity::{Severity, SeverityCounts};
pub use state::Scenario;
pub use store::{ScenarioHandle, ScenarioStore, read_scenario, write_scenario};
pub use types::{
    ActiveProcess, BoostEvent, InversionEvent, ProcessStat, ProcessState, TimelineEntry,
};
