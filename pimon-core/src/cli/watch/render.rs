use super::constants::{DASHBOARD_INVERSIONS, DASHBOARD_PROCESSES};
use crate::broadcast::{Delta, DeltaPayload};
use crate::projector::Snapshot;
use crate::scenario::{ProcessStat, Severity};
use owo_colors::OwoColorize;
use std::io;
use std::io::Write;

fn severity_label(severity: i64) -> &'static str {
    match Severity::classify(severity) {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
    }
}

fn priority(p: Option<i32>) -> String {
    p.map_or_else(|| "-".to_string(), |p| p.to_string())
}

pub fn render_stats(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    let status = if snapshot.finalized { "finalized" } else { "live" };
    out.push_str(&format!(
        "pimon: {} [{}] ({status})\n\
         ==========================\n\
         uptime: {:.1}s | events: {} | boosts: {} | inversions: {}\n\
         boost rate: {:.2}/s | avg boosts/process: {:.2} | active: {} ({} running)\n\n",
        snapshot.name,
        snapshot.scenario,
        snapshot.uptime,
        snapshot.total_events,
        snapshot.total_boosts,
        snapshot.total_inversions,
        snapshot.boost_rate,
        snapshot.avg_boosts_per_process,
        snapshot.active_processes,
        snapshot.running_processes,
    ));

    let counts = snapshot.inversions_by_severity;
    let total = counts.total();
    if total > 0 {
        out.push_str("Inversions by severity:\n");
        for (label, count) in [
            ("low", counts.low),
            ("medium", counts.medium),
            ("high", counts.high),
        ] {
            let pct = (count as f64 / total as f64) * 100.0;
            let bars = (pct / 5.0).floor() as usize;
            out.push_str(&format!(
                "  {:<8} {:<20} {:>5.1}% ({count})\n",
                label,
                "█".repeat(bars),
                pct
            ));
        }
        if let Some(max) = snapshot.max_severity {
            out.push_str(&format!("  max severity: {max}\n"));
        }
        out.push('\n');
    } else {
        out.push_str("Inversions by severity: <none>\n\n");
    }

    if !snapshot.process_stats.is_empty() {
        // most boosted first, ties by pid
        let mut processes: Vec<&ProcessStat> = snapshot.process_stats.values().collect();
        processes.sort_by(|a, b| {
            b.boosts_received
                .cmp(&a.boosts_received)
                .then(a.pid.cmp(&b.pid))
        });

        out.push_str(&format!(
            "{:>5}  {:<12} {:>5} {:>5} {:>5} {:>6} {:>6} {:>5} {:>6}\n",
            "PID", "NAME", "PRIO", "BEST", "WORST", "BOOST+", "BOOST-", "LOCKS", "BLOCKS"
        ));
        for p in processes.iter().take(DASHBOARD_PROCESSES) {
            out.push_str(&format!(
                "{:>5}  {:<12} {:>5} {:>5} {:>5} {:>6} {:>6} {:>5} {:>6}\n",
                p.pid,
                p.name.as_deref().unwrap_or("-"),
                priority(p.priority),
                priority(p.best_priority),
                priority(p.worst_priority),
                p.boosts_received,
                p.boosts_given,
                p.locks_held,
                p.blocks,
            ));
        }
        if processes.len() > DASHBOARD_PROCESSES {
            out.push_str(&format!(
                "  ... {} more\n",
                processes.len() - DASHBOARD_PROCESSES
            ));
        }
        out.push('\n');
    }

    let recent: Vec<_> = snapshot
        .recent_inversions
        .iter()
        .rev()
        .take(DASHBOARD_INVERSIONS)
        .collect();
    if !recent.is_empty() {
        out.push_str("Recent inversions:\n");
        for inv in recent {
            out.push_str(&format!(
                "  {} pid {} ({}) blocked by pid {} ({}), severity {} {}\n",
                inv.timestamp.format("%H:%M:%S%.3f"),
                inv.high_priority_pid,
                inv.high_priority,
                inv.low_priority_pid,
                inv.low_priority,
                inv.severity,
                severity_label(inv.severity),
            ));
        }
    }

    out
}

pub fn redraw(output: &str) {
    print!("\x1b[2J\x1b[H");
    println!("{output}");
    let _ = io::stdout().flush();
}

/// One line per delta, `None` for deltas pretty mode does not show.
pub fn render_pretty(delta: &Delta) -> Option<String> {
    let scenario = format!("[{}]", delta.scenario);

    match &delta.payload {
        DeltaPayload::PriorityBoost(b) => Some(format!(
            "{} {} pid {} boosted by pid {}: {} → {}",
            scenario.dimmed(),
            "boost".green().bold(),
            b.holder_pid,
            b.waiter_pid,
            b.old_priority,
            b.new_priority,
        )),
        DeltaPayload::InversionDetected(inv) => {
            let label = severity_label(inv.severity);
            let label = match Severity::classify(inv.severity) {
                Severity::Low => label.yellow().to_string(),
                Severity::Medium => label.bright_red().to_string(),
                Severity::High => label.red().bold().to_string(),
            };
            Some(format!(
                "{} {} pid {} ({}) blocked by pid {} ({}), severity {} {label}",
                scenario.dimmed(),
                "inversion".red().bold(),
                inv.high_priority_pid,
                inv.high_priority,
                inv.low_priority_pid,
                inv.low_priority,
                inv.severity,
            ))
        }
        DeltaPayload::StatsUpdate(_) => None,
    }
}
