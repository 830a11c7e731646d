//! Per-alert processing: in-flight claim, pending log entry, content
//! generation, log completion, and rescheduling.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

use super::in_flight::{InFlightGuard, InFlightSet};
use super::store::AlertStore;
use crate::clock::Clock;
use crate::generation::ContentGenerator;
use crate::models::alert::Alert;
use crate::models::log::{AlertLog, LogStatus, FAILURE_CONTENT};
use crate::scheduler::next_run;
use crate::{AppError, Result};

/// Result of one processing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Processed alert.
    pub alert_id: String,
    /// Log entry written for this pass.
    pub log_id: String,
    /// Final log status.
    pub status: LogStatus,
    /// Rescheduled trigger, `None` if the alert was deleted mid-pass.
    pub next_run: Option<DateTime<Utc>>,
}

/// Executes processing passes and owns the in-flight set.
pub struct AlertProcessor {
    store: Arc<AlertStore>,
    in_flight: InFlightSet,
    generator: Arc<dyn ContentGenerator>,
    clock: Arc<dyn Clock>,
    tz: Tz,
    timeout: Option<Duration>,
}

impl AlertProcessor {
    /// Construct a processor writing to `store`.
    #[must_use]
    pub fn new(
        store: Arc<AlertStore>,
        generator: Arc<dyn ContentGenerator>,
        clock: Arc<dyn Clock>,
        tz: Tz,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            store,
            in_flight: InFlightSet::new(),
            generator,
            clock,
            tz,
            timeout,
        }
    }

    /// Ids currently being processed.
    #[must_use]
    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    /// Claim `alert_id` for processing. `None` means a pass is already
    /// running and the caller must do nothing.
    #[must_use]
    pub fn try_begin(&self, alert_id: &str) -> Option<InFlightGuard> {
        let guard = self.in_flight.try_acquire(alert_id);
        if guard.is_none() {
            debug!(alert_id, "alert already in flight, skipping");
        }
        guard
    }

    /// Claim and run a full pass for `alert`. Returns `None` without side
    /// effects when the alert is already in flight.
    pub async fn process(&self, alert: Alert) -> Option<ProcessOutcome> {
        let guard = self.try_begin(&alert.id)?;
        Some(self.run(guard, alert).await)
    }

    /// Run a pass under an already acquired `guard`. Generation failures
    /// are recorded on the log entry and never propagate.
    pub async fn run(&self, guard: InFlightGuard, alert: Alert) -> ProcessOutcome {
        let log_id = self
            .store
            .append_log(AlertLog::pending(&alert, self.clock.now()));
        info!(alert_id = %alert.id, log_id, "processing alert");

        let generated = if alert.is_ai_generated {
            self.generate(&alert.prompt).await
        } else {
            Ok(alert.prompt.clone())
        };

        let status = match generated {
            Ok(content) => {
                self.finish_log(&log_id, LogStatus::Success, content);
                LogStatus::Success
            }
            Err(err) => {
                warn!(alert_id = %alert.id, log_id, %err, "content generation failed");
                self.finish_log(&log_id, LogStatus::Failed, FAILURE_CONTENT.to_owned());
                LogStatus::Failed
            }
        };

        let finished_at = self.clock.now();
        let next = self.store.record_run(&alert.id, finished_at, |schedule| {
            next_run(schedule, finished_at, &self.tz)
        });
        match next {
            Some(next_run) => info!(alert_id = %alert.id, ?status, %next_run, "alert rescheduled"),
            None => debug!(alert_id = %alert.id, "alert deleted during processing"),
        }

        drop(guard);

        ProcessOutcome {
            alert_id: alert.id,
            log_id,
            status,
            next_run: next,
        }
    }

    /// Run the generator in its own task so a panic inside it surfaces as a
    /// failed pass instead of unwinding through `run`.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let generator = Arc::clone(&self.generator);
        let prompt = prompt.to_owned();
        let mut call = tokio::spawn(async move { generator.generate(&prompt).await });

        let joined = match self.timeout {
            Some(limit) => {
                if let Ok(joined) = tokio::time::timeout(limit, &mut call).await {
                    joined
                } else {
                    call.abort();
                    return Err(AppError::Generation(format!(
                        "timed out after {}ms",
                        limit.as_millis()
                    )));
                }
            }
            None => call.await,
        };

        joined.map_err(|err| AppError::Generation(format!("generation task failed: {err}")))?
    }

    fn finish_log(&self, log_id: &str, status: LogStatus, content: String) {
        if let Err(err) = self.store.complete_log(log_id, status, content) {
            error!(log_id, %err, "failed to complete log entry");
        }
    }
}
