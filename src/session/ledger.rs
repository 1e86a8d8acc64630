//! Per-session history and usage quota.

use serde::Serialize;

use crate::Result;
use crate::export;
use crate::types::{Diagnosis, Genre};

/// Default number of attempts allowed per session.
pub const DEFAULT_MAX_USAGE: u32 = 5;

/// One recorded diagnosis and the genre it was requested under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub diagnosis: Diagnosis,
    pub genre: Option<Genre>,
}

/// History and quota for one user session.
///
/// The usage counter counts attempts, not successes: an attempt whose
/// provider call or parse fails still consumes quota. The counter keeps
/// climbing past the cap so callers can see how many attempts were refused.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLedger {
    history: Vec<HistoryEntry>,
    usage_count: u32,
    max_usage: u32,
}

impl SessionLedger {
    pub fn new(max_usage: u32) -> Self {
        Self {
            history: Vec::new(),
            usage_count: 0,
            max_usage,
        }
    }

    /// Count one attempt. Returns whether it is permitted, i.e. whether the
    /// count before this call was below the cap.
    pub fn record_attempt(&mut self) -> bool {
        let permitted = self.usage_count < self.max_usage;
        self.usage_count = self.usage_count.saturating_add(1);
        permitted
    }

    /// Add a successfully parsed diagnosis to the history.
    pub fn append(&mut self, diagnosis: Diagnosis, genre: Option<Genre>) {
        self.history.push(HistoryEntry { diagnosis, genre });
    }

    /// Render the history as CSV with a header row.
    pub fn export(&self) -> Result<String> {
        export::to_csv(&self.history)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn usage_count(&self) -> u32 {
        self.usage_count
    }

    pub fn max_usage(&self) -> u32 {
        self.max_usage
    }

    /// Attempts left before the cap.
    pub fn remaining(&self) -> u32 {
        self.max_usage.saturating_sub(self.usage_count)
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_count >= self.max_usage
    }
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_USAGE)
    }
}
