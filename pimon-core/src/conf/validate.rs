use crate::conf::{MonitorConfig, ValidationReport};
use std::collections::{HashMap, HashSet};

/// Check a parsed config, collecting every problem instead of stopping at the first.
pub fn validate_config(cfg: &MonitorConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    validate_limits(cfg, &mut report);
    validate_scenarios(cfg, &mut report);

    report
}

fn validate_limits(cfg: &MonitorConfig, report: &mut ValidationReport) {
    let limits = [
        ("source.poll_interval_ms", cfg.source.poll_interval_ms as usize),
        ("source.retry_delay_ms", cfg.source.retry_delay_ms as usize),
        ("retention.events", cfg.retention.events),
        ("retention.boosts", cfg.retention.boosts),
        ("retention.inversions", cfg.retention.inversions),
        ("retention.timeline", cfg.retention.timeline),
        ("retention.replays", cfg.retention.replays),
        ("broadcast.capacity", cfg.broadcast.capacity),
        ("broadcast.stats_every", cfg.broadcast.stats_every as usize),
    ];

    for (field, value) in limits {
        if value == 0 {
            report.zero_value(field);
        }
    }
}

fn validate_scenarios(cfg: &MonitorConfig, report: &mut ValidationReport) {
    let mut seen_ids = HashSet::new();
    let mut marker_owner: HashMap<&str, &str> = HashMap::new();

    for (index, scenario) in cfg.scenarios.iter().enumerate() {
        if scenario.id.trim().is_empty() {
            report.empty_scenario_id(index);
        } else if !seen_ids.insert(scenario.id.as_str()) {
            report.duplicate_scenario(&scenario.id, index);
        }

        for marker in &scenario.markers {
            if marker.is_empty() {
                report.empty_marker(&scenario.id, index);
                continue;
            }

            match marker_owner.get(marker.as_str()) {
                Some(owner) if *owner != scenario.id => {
                    report.shared_marker(marker, owner, &scenario.id);
                }
                Some(_) => {}
                None => {
                    marker_owner.insert(marker, &scenario.id);
                }
            }
        }
    }

    if !seen_ids.contains(cfg.default_scenario.as_str()) {
        report.unknown_default_scenario(&cfg.default_scenario);
    }
}
