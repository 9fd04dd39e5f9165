//! Run accounting.

use serde::Serialize;

/// Final state of one inspected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No mapping for the extension.
    Unknown,
    /// Content-type already correct.
    Unchanged,
    /// Content-type replaced.
    Updated,
    /// Would have been replaced, but the run is a dry run.
    WouldUpdate,
    /// Updating the object failed.
    Failed,
}

/// Counters for a finished run.
///
/// `updated` counts only update calls that completed without error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Objects taken from the listing.
    pub inspected: usize,
    /// Objects whose content-type was replaced.
    pub updated: usize,
    /// Objects that already had the right content-type.
    pub unchanged: usize,
    /// Objects without a mapped extension.
    pub unknown: usize,
    /// Objects that would have been updated in a dry run.
    pub would_update: usize,
    /// Objects whose update failed.
    pub failed: usize,
}

impl RunSummary {
    /// Accounts for one object.
    pub fn record(&mut self, outcome: Outcome) {
        self.inspected += 1;
        match outcome {
            Outcome::Unknown => self.unknown += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::WouldUpdate => self.would_update += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    /// Whether any object failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
