use std::time::Duration;

pub const RENDER_TICK: Duration = Duration::from_secs(1);

/// Processes listed on the dashboard, most boosted first.
pub const DASHBOARD_PROCESSES: usize = 10;

/// Recent inversions listed on the dashboard.
pub const DASHBOARD_INVERSIONS: usize = 5;
