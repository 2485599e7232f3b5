use crate::broadcast::NullNotifier;
use crate::cli::config::{dump_json, dump_yaml};
use crate::conf::load_or_default;
use crate::monitor::Monitor;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Replay `file` into `scenario` and print the final snapshot.
pub fn run_replay(file: &Path, scenario: &str, config: Option<&Path>, yaml: bool) -> Result<()> {
    let cfg = load_or_default(config)?;
    let monitor = Monitor::new(&cfg, Arc::new(NullNotifier));

    let snapshot = monitor
        .replay_file(file, scenario)
        .with_context(|| format!("replay of {} into '{scenario}' failed", file.display()))?;

    if yaml {
        dump_yaml(&snapshot)
    } else {
        dump_json(&snapshot)
    }
}
