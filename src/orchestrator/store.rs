//! Shared in-memory application state: alerts, activity log, settings.
//!
//! All state lives for the process lifetime only. Every method takes the
//! lock for a short synchronous section and never across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use super::activity::ActivityLog;
use crate::models::alert::Alert;
use crate::models::log::{AlertLog, LogStatus};
use crate::models::schedule::ScheduleSpec;
use crate::models::settings::AppSettings;
use crate::{AppError, Result};

#[derive(Debug, Default)]
struct StoreState {
    alerts: Vec<Alert>,
    log: ActivityLog,
    settings: AppSettings,
}

/// Lock-protected alert collection, activity log and settings.
#[derive(Debug, Default)]
pub struct AlertStore {
    state: Mutex<StoreState>,
}

impl AlertStore {
    /// Create a store with the given initial settings.
    #[must_use]
    pub fn new(settings: AppSettings) -> Self {
        Self {
            state: Mutex::new(StoreState {
                settings,
                ..StoreState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an alert to the collection.
    pub fn insert(&self, alert: Alert) {
        self.lock().alerts.push(alert);
    }

    /// Snapshot of an alert.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no alert has `id`.
    pub fn get(&self, id: &str) -> Result<Alert> {
        self.lock()
            .alerts
            .iter()
            .find(|alert| alert.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Snapshot of all alerts in creation order.
    #[must_use]
    pub fn list(&self) -> Vec<Alert> {
        self.lock().alerts.clone()
    }

    /// Apply `edit` to the alert `id` and return the edited snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no alert has `id`, or any error
    /// returned by `edit` (in which case the alert is left unchanged).
    pub fn modify<F>(&self, id: &str, edit: F) -> Result<Alert>
    where
        F: FnOnce(&mut Alert) -> Result<()>,
    {
        let mut state = self.lock();
        let alert = state
            .alerts
            .iter_mut()
            .find(|alert| alert.id == id)
            .ok_or_else(|| not_found(id))?;
        let mut edited = alert.clone();
        edit(&mut edited)?;
        *alert = edited.clone();
        Ok(edited)
    }

    /// Remove and return the alert `id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no alert has `id`.
    pub fn remove(&self, id: &str) -> Result<Alert> {
        let mut state = self.lock();
        let index = state
            .alerts
            .iter()
            .position(|alert| alert.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(state.alerts.remove(index))
    }

    /// Active alerts whose `next_run` has elapsed at `now`.
    #[must_use]
    pub fn due(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.lock()
            .alerts
            .iter()
            .filter(|alert| alert.is_due(now))
            .cloned()
            .collect()
    }

    /// Record a completed run on the alert `id`: `last_run = now`, and
    /// `next_run` from `reschedule` applied to the alert's current schedule.
    ///
    /// Returns the new `next_run`, or `None` if the alert was deleted while
    /// it was being processed.
    pub fn record_run<F>(&self, id: &str, now: DateTime<Utc>, reschedule: F) -> Option<DateTime<Utc>>
    where
        F: FnOnce(&ScheduleSpec) -> DateTime<Utc>,
    {
        let mut state = self.lock();
        let alert = state.alerts.iter_mut().find(|alert| alert.id == id)?;
        alert.last_run = Some(now);
        alert.next_run = reschedule(&alert.schedule);
        Some(alert.next_run)
    }

    /// Append a log entry and return its id.
    pub fn append_log(&self, entry: AlertLog) -> String {
        self.lock().log.append(entry)
    }

    /// Finish a pending log entry.
    ///
    /// # Errors
    ///
    /// See [`ActivityLog::complete`].
    pub fn complete_log(&self, log_id: &str, status: LogStatus, content: String) -> Result<()> {
        self.lock().log.complete(log_id, status, content)
    }

    /// Snapshot of one log entry.
    #[must_use]
    pub fn log_entry(&self, log_id: &str) -> Option<AlertLog> {
        self.lock().log.get(log_id).cloned()
    }

    /// Log entries, newest first.
    #[must_use]
    pub fn logs(&self) -> Vec<AlertLog> {
        self.lock().log.newest_first()
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> AppSettings {
        self.lock().settings.clone()
    }

    /// Replace the settings.
    pub fn set_settings(&self, settings: AppSettings) {
        self.lock().settings = settings;
    }

    /// Aggregate counters over alerts and log entries.
    #[must_use]
    pub fn stats(&self) -> AlertStats {
        let state = self.lock();
        AlertStats {
            total_alerts: state.alerts.len(),
            active_alerts: state.alerts.iter().filter(|alert| alert.is_active).count(),
            sent: state.log.count(LogStatus::Success),
            failed: state.log.count(LogStatus::Failed),
            pending: state.log.count(LogStatus::Pending),
        }
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct AlertStats {
    /// Number of alerts.
    pub total_alerts: usize,
    /// Number of active alerts.
    pub active_alerts: usize,
    /// Log entries that completed successfully.
    pub sent: usize,
    /// Log entries that failed.
    pub failed: usize,
    /// Log entries still pending.
    pub pending: usize,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("alert {id}"))
}
