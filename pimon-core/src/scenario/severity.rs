use serde::Serialize;

/// Inversion severity class. Severity is `holder_priority - requester_priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// 3 or less
    Low,
    /// 4 to 6
    Medium,
    /// above 6
    High,
}

impl Severity {
    pub fn classify(severity: i64) -> Self {
        match severity {
            ..=3 => Self::Low,
            4..=6 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Running inversion counts per severity class.
///
/// Counted as inversions are recorded, so the totals do not shrink when old
/// inversions fall out of the bounded history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: i64) {
        match Severity::classify(severity) {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.low + self.medium + self.high
    }
}
