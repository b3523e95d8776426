use std::{fmt::Display, ops::AddAssign};

use serde::{Deserialize, Serialize};

/// Tally of the per-invoice outcomes of a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Invoices that are settled and credited, whether during this scan or before it.
    pub settled: usize,
    /// Invoices that are still pending at the node, or that were cleaned up because the node forgot them.
    pub unsettled: usize,
    /// Invoices whose settlement attempt failed. They will be retried on the next scan.
    pub failed: usize,
}

impl ScanSummary {
    pub fn total(&self) -> usize {
        self.settled + self.unsettled + self.failed
    }
}

impl AddAssign for ScanSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.settled += rhs.settled;
        self.unsettled += rhs.unsettled;
        self.failed += rhs.failed;
    }
}

impl Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { settled, unsettled, failed } = self;
        write!(f, "{} invoices: {settled} settled, {unsettled} unsettled, {failed} failed", self.total())
    }
}
