//! Append-only activity log of processing attempts.

use crate::models::log::{AlertLog, LogStatus};
use crate::{AppError, Result};

/// Insertion-ordered log entries. Entries are never removed.
#[derive(Debug, Default, Clone)]
pub struct ActivityLog {
    entries: Vec<AlertLog>,
}

impl ActivityLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` and return its id.
    pub fn append(&mut self, entry: AlertLog) -> String {
        let id = entry.id.clone();
        self.entries.push(entry);
        id
    }

    /// Finish the pending entry `log_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id and
    /// `AppError::AlreadyConsumed` if the entry already completed.
    pub fn complete(&mut self, log_id: &str, status: LogStatus, content: String) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == log_id)
            .ok_or_else(|| AppError::NotFound(format!("log entry {log_id}")))?;
        entry.complete(status, content)
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, log_id: &str) -> Option<&AlertLog> {
        self.entries.iter().find(|entry| entry.id == log_id)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[AlertLog] {
        &self.entries
    }

    /// Entries by timestamp descending; same-instant entries keep reverse
    /// insertion order.
    #[must_use]
    pub fn newest_first(&self) -> Vec<AlertLog> {
        let mut indexed: Vec<(usize, &AlertLog)> = self.entries.iter().enumerate().collect();
        indexed.sort_by(|(left_idx, left), (right_idx, right)| {
            right
                .timestamp
                .cmp(&left.timestamp)
                .then_with(|| right_idx.cmp(left_idx))
        });
        indexed.into_iter().map(|(_, entry)| entry.clone()).collect()
    }

    /// Number of entries with `status`.
    #[must_use]
    pub fn count(&self, status: LogStatus) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status == status)
            .count()
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
