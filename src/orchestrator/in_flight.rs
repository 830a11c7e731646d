//! Per-alert in-flight guard.
//!
//! An alert id is held in the [`InFlightSet`] for exactly as long as an
//! [`InFlightGuard`] for it is alive. Dropping the guard releases the id on
//! every exit path, including panics inside the processing task.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

type Ids = Arc<Mutex<HashSet<String>>>;

/// Set of alert ids currently being processed.
#[derive(Debug, Clone, Default)]
pub struct InFlightSet {
    ids: Ids,
}

impl InFlightSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `alert_id`. Returns `None` if it is already being processed.
    #[must_use]
    pub fn try_acquire(&self, alert_id: &str) -> Option<InFlightGuard> {
        let inserted = self
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(alert_id.to_owned());
        inserted.then(|| InFlightGuard {
            ids: Arc::clone(&self.ids),
            alert_id: alert_id.to_owned(),
        })
    }

    /// Whether `alert_id` is currently held.
    #[must_use]
    pub fn contains(&self, alert_id: &str) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(alert_id)
    }

    /// Number of alerts currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no alert is currently held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scoped claim on one alert id; releases it on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    ids: Ids,
    alert_id: String,
}

impl InFlightGuard {
    /// The alert this guard holds.
    #[must_use]
    pub fn alert_id(&self) -> &str {
        &self.alert_id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.alert_id);
    }
}
