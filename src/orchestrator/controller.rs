//! Alert controller: the single command surface over application state.
//!
//! Every mutation (create, update, delete, toggle, process, settings)
//! goes through [`AlertController`]. The dispatch loop and the HTTP API
//! both hold an `Arc` to the same controller.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, Instrument};

use super::in_flight::InFlightGuard;
use super::processor::{AlertProcessor, ProcessOutcome};
use super::seed;
use super::store::{AlertStats, AlertStore};
use crate::clock::Clock;
use crate::generation::ContentGenerator;
use crate::models::alert::{Alert, AlertUpdate, NewAlert};
use crate::models::log::AlertLog;
use crate::models::settings::AppSettings;
use crate::scheduler::next_run;
use crate::{AppError, Result};

/// Owner of alerts, activity log, settings and the alert processor.
pub struct AlertController {
    store: Arc<AlertStore>,
    processor: Arc<AlertProcessor>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl AlertController {
    /// Build a controller with empty state.
    #[must_use]
    pub fn new(
        settings: AppSettings,
        generator: Arc<dyn ContentGenerator>,
        clock: Arc<dyn Clock>,
        tz: Tz,
        generation_timeout: Option<Duration>,
    ) -> Self {
        let store = Arc::new(AlertStore::new(settings));
        let processor = Arc::new(AlertProcessor::new(
            Arc::clone(&store),
            generator,
            Arc::clone(&clock),
            tz,
            generation_timeout,
        ));
        Self {
            store,
            processor,
            clock,
            tz,
        }
    }

    /// Clock used for due checks and rescheduling.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The processor that runs passes for this controller.
    #[must_use]
    pub fn processor(&self) -> &Arc<AlertProcessor> {
        &self.processor
    }

    /// Load the built-in sample alerts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a sample fails validation.
    pub fn seed_defaults(&self) -> Result<usize> {
        let samples = seed::default_alerts();
        let count = samples.len();
        for sample in samples {
            self.create(sample)?;
        }
        info!(count, "seeded default alerts");
        Ok(count)
    }

    /// Create an active alert scheduled from now.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the name or prompt is blank.
    pub fn create(&self, mut input: NewAlert) -> Result<Alert> {
        input.name = required("name", &input.name)?;
        input.prompt = required("prompt", &input.prompt)?;
        input.email = self.email_or_default(&input.email);

        let next = next_run(&input.schedule, self.clock.now(), &self.tz);
        let alert = Alert::new(input, next);
        info!(alert_id = %alert.id, name = %alert.name, next_run = %alert.next_run, "alert created");
        self.store.insert(alert.clone());
        Ok(alert)
    }

    /// Apply a partial update. A schedule change recomputes `next_run`
    /// from now, not from the previous `next_run`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id, or
    /// `AppError::Validation` if a provided name or prompt is blank.
    pub fn update(&self, id: &str, update: AlertUpdate) -> Result<Alert> {
        let name = update.name.as_deref().map(|v| required("name", v)).transpose()?;
        let prompt = update
            .prompt
            .as_deref()
            .map(|v| required("prompt", v))
            .transpose()?;
        let email = update.email.as_deref().map(|v| self.email_or_default(v));
        let now = self.clock.now();

        let alert = self.store.modify(id, |alert| {
            if let Some(name) = name {
                alert.name = name;
            }
            if let Some(prompt) = prompt {
                alert.prompt = prompt;
            }
            if let Some(email) = email {
                alert.email = email;
            }
            if let Some(flag) = update.is_ai_generated {
                alert.is_ai_generated = flag;
            }
            if let Some(schedule) = update.schedule {
                alert.schedule = schedule;
                alert.next_run = next_run(&schedule, now, &self.tz);
            }
            Ok(())
        })?;
        info!(alert_id = id, "alert updated");
        Ok(alert)
    }

    /// Remove an alert. Its log entries are kept.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id.
    pub fn delete(&self, id: &str) -> Result<Alert> {
        let alert = self.store.remove(id)?;
        info!(alert_id = id, "alert deleted");
        Ok(alert)
    }

    /// Flip `is_active`. `next_run` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id.
    pub fn toggle(&self, id: &str) -> Result<Alert> {
        let alert = self.store.modify(id, |alert| {
            alert.is_active = !alert.is_active;
            Ok(())
        })?;
        info!(alert_id = id, is_active = alert.is_active, "alert toggled");
        Ok(alert)
    }

    /// Snapshot of one alert.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id.
    pub fn get(&self, id: &str) -> Result<Alert> {
        self.store.get(id)
    }

    /// All alerts in creation order.
    #[must_use]
    pub fn list(&self) -> Vec<Alert> {
        self.store.list()
    }

    /// Active alerts due at `now`.
    #[must_use]
    pub fn due_alerts(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.store.due(now)
    }

    /// Claim `alert` and spawn its processing pass. Returns `None` when the
    /// alert is already in flight.
    #[must_use]
    pub fn start_processing(&self, alert: Alert) -> Option<JoinHandle<ProcessOutcome>> {
        let guard = self.processor.try_begin(&alert.id)?;
        Some(self.spawn_pass(guard, alert))
    }

    /// Claim `alert_id` and spawn its pass only if the stored alert is still
    /// due at `now`. The due check runs under the claim, so a pass that
    /// finished after the caller's scan is not repeated for the same due
    /// instant.
    #[must_use]
    pub fn start_if_due(
        &self,
        alert_id: &str,
        now: DateTime<Utc>,
    ) -> Option<JoinHandle<ProcessOutcome>> {
        let guard = self.processor.try_begin(alert_id)?;
        let current = self.store.get(alert_id).ok();
        let Some(alert) = current.filter(|alert| alert.is_due(now)) else {
            debug!(alert_id, "alert no longer due, skipping");
            drop(guard);
            return None;
        };
        Some(self.spawn_pass(guard, alert))
    }

    fn spawn_pass(&self, guard: InFlightGuard, alert: Alert) -> JoinHandle<ProcessOutcome> {
        let processor = Arc::clone(&self.processor);
        let span = info_span!("process_alert", alert_id = %alert.id);
        tokio::spawn(async move { processor.run(guard, alert).await }.instrument(span))
    }

    /// Run the alert now and wait for the pass to finish. Returns `None`
    /// when a pass is already in flight.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id.
    pub async fn trigger_now(&self, id: &str) -> Result<Option<ProcessOutcome>> {
        let alert = self.store.get(id)?;
        Ok(self.processor.process(alert).await)
    }

    /// Start a manual run in the background. Returns `false` when a pass is
    /// already in flight.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id.
    pub fn spawn_trigger(&self, id: &str) -> Result<bool> {
        let alert = self.store.get(id)?;
        Ok(self.start_processing(alert).is_some())
    }

    /// Activity log, newest first.
    #[must_use]
    pub fn logs(&self) -> Vec<AlertLog> {
        self.store.logs()
    }

    /// Snapshot of one log entry.
    #[must_use]
    pub fn log_entry(&self, log_id: &str) -> Option<AlertLog> {
        self.store.log_entry(log_id)
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> AppSettings {
        self.store.settings()
    }

    /// Validate and replace the settings. A blank SMTP password keeps the
    /// stored one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the settings are inconsistent.
    pub fn update_settings(&self, mut settings: AppSettings) -> Result<AppSettings> {
        settings.validate()?;
        if settings.smtp_pass.is_empty() {
            settings.smtp_pass = self.store.settings().smtp_pass;
        }
        self.store.set_settings(settings.clone());
        info!(delivery_method = ?settings.delivery_method, "settings updated");
        Ok(settings)
    }

    /// Dashboard counters.
    #[must_use]
    pub fn stats(&self) -> AlertStats {
        self.store.stats()
    }

    fn email_or_default(&self, email: &str) -> String {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            self.store.settings().default_email
        } else {
            trimmed.to_owned()
        }
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}
