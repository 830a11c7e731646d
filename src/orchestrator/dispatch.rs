//! Fixed-period dispatch loop that fires due alerts.
//!
//! Each tick reads "now" from the controller's clock, scans the alert
//! collection synchronously, claims every due alert that is not already in
//! flight, re-checks due-ness under the claim, and spawns one processing
//! task per claim. Due-ness is recomputed from `next_run` on every tick;
//! the loop holds no per-alert state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};

use super::controller::AlertController;
use super::processor::ProcessOutcome;

/// Scanner over the controller's alert collection.
pub struct DispatchLoop {
    controller: Arc<AlertController>,
}

impl DispatchLoop {
    /// Create a dispatcher for `controller`.
    #[must_use]
    pub fn new(controller: Arc<AlertController>) -> Self {
        Self { controller }
    }

    /// Run one scan. Returns handles for the passes started by this tick.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn tick(&self) -> Vec<JoinHandle<ProcessOutcome>> {
        let now = self.controller.clock().now();
        let due = self.controller.due_alerts(now);
        if due.is_empty() {
            return Vec::new();
        }

        let started: Vec<_> = due
            .into_iter()
            .filter_map(|alert| self.controller.start_if_due(&alert.id, now))
            .collect();
        debug!(%now, started = started.len(), "dispatch tick");
        started
    }

    /// Spawn the background loop ticking every `period` until `cancel` fires.
    #[must_use]
    pub fn spawn(self, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(
            async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                info!(period_ms = period.as_millis(), "dispatch loop started");
                loop {
                    tokio::select! {
                        () = cancel.cancelled() => {
                            info!("dispatch loop shutting down");
                            break;
                        }
                        _ = interval.tick() => {
                            drop(self.tick());
                        }
                    }
                }
            }
            .instrument(info_span!("dispatch_loop")),
        )
    }
}

/// Spawn a dispatch loop for `controller`.
#[must_use]
pub fn spawn_dispatch_loop(
    controller: Arc<AlertController>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    DispatchLoop::new(controller).spawn(period, cancel)
}
