//! Shared test helpers for controller-level integration tests.
//!
//! Provides a controller wired to a [`ManualClock`] plus scripted content
//! generators so individual test modules can focus on behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::{Notify, Semaphore};

use alert_genius::clock::{Clock, ManualClock};
use alert_genius::generation::{ContentGenerator, GenerateFuture};
use alert_genius::models::alert::NewAlert;
use alert_genius::models::schedule::ScheduleSpec;
use alert_genius::models::settings::AppSettings;
use alert_genius::orchestrator::AlertController;
use alert_genius::AppError;

/// Fixed starting instant for every test clock (a Wednesday).
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0)
        .single()
        .expect("valid start")
}

/// Build a controller in UTC around `generator`, returning the clock that
/// drives it.
pub fn controller_with(
    generator: Arc<dyn ContentGenerator>,
    timeout: Option<Duration>,
) -> (Arc<AlertController>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let controller = AlertController::new(
        AppSettings::default(),
        generator,
        Arc::clone(&clock) as Arc<dyn Clock>,
        chrono_tz::UTC,
        timeout,
    );
    (Arc::new(controller), clock)
}

/// Controller with an echoing generator and no timeout.
pub fn controller() -> (Arc<AlertController>, Arc<ManualClock>) {
    controller_with(Arc::new(EchoGenerator::default()), None)
}

/// Alert payload with the given schedule.
pub fn new_alert(name: &str, prompt: &str, schedule: ScheduleSpec, ai: bool) -> NewAlert {
    NewAlert {
        name: name.into(),
        prompt: prompt.into(),
        email: "ops@example.com".into(),
        schedule,
        is_ai_generated: ai,
    }
}

/// Returns `"generated: {prompt}"` and counts calls.
#[derive(Debug, Default)]
pub struct EchoGenerator {
    pub calls: AtomicUsize,
}

impl ContentGenerator for EchoGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("generated: {prompt}"))
        })
    }
}

/// Always fails.
#[derive(Debug, Default)]
pub struct FailingGenerator;

impl ContentGenerator for FailingGenerator {
    fn generate<'a>(&'a self, _prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async { Err(AppError::Generation("upstream unavailable".into())) })
    }
}

/// Blocks each call until the test releases a permit.
#[derive(Debug)]
pub struct GatedGenerator {
    gate: Semaphore,
    entered: Notify,
    pub calls: AtomicUsize,
}

impl GatedGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
            entered: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    /// Let `n` blocked or future calls complete.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Wait until some call has entered the generator.
    pub async fn wait_entered(&self) {
        tokio::time::timeout(Duration::from_secs(5), self.entered.notified())
            .await
            .expect("generator was never called");
    }
}

impl ContentGenerator for GatedGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|err| AppError::Generation(err.to_string()))?;
            permit.forget();
            Ok(format!("gated: {prompt}"))
        })
    }
}

/// Panics inside the generation future.
#[derive(Debug, Default)]
pub struct PanickingGenerator;

impl ContentGenerator for PanickingGenerator {
    fn generate<'a>(&'a self, _prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(explode())
    }
}

async fn explode() -> alert_genius::Result<String> {
    panic!("generator blew up")
}
