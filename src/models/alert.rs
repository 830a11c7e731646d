//! Alert entity and the command payloads that create or edit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::ScheduleSpec;

/// A recurring alert owned by the alert controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Alert {
    /// Unique record identifier; never reused.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Content prompt, used verbatim when not AI-generated.
    pub prompt: String,
    /// Target email address.
    pub email: String,
    /// Recurrence rule.
    pub schedule: ScheduleSpec,
    /// Inactive alerts are skipped by the dispatch loop.
    pub is_active: bool,
    /// Whether content is delegated to the generation collaborator.
    pub is_ai_generated: bool,
    /// Instant of the last completed processing pass.
    pub last_run: Option<DateTime<Utc>>,
    /// Instant of the next scheduled trigger.
    pub next_run: DateTime<Utc>,
}

impl Alert {
    /// Construct a new active alert with a generated identifier.
    #[must_use]
    pub fn new(input: NewAlert, next_run: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            prompt: input.prompt,
            email: input.email,
            schedule: input.schedule,
            is_active: true,
            is_ai_generated: input.is_ai_generated,
            last_run: None,
            next_run,
        }
    }

    /// Whether the alert should fire at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now >= self.next_run
    }
}

fn default_true() -> bool {
    true
}

/// Payload for creating an alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewAlert {
    /// Display name.
    pub name: String,
    /// Content prompt.
    pub prompt: String,
    /// Target email; blank falls back to the default email setting.
    #[serde(default)]
    pub email: String,
    /// Recurrence rule.
    pub schedule: ScheduleSpec,
    /// Whether content is AI-generated.
    #[serde(default = "default_true")]
    pub is_ai_generated: bool,
}

/// Partial update for an existing alert. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AlertUpdate {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New content prompt.
    #[serde(default)]
    pub prompt: Option<String>,
    /// New target email.
    #[serde(default)]
    pub email: Option<String>,
    /// New recurrence rule; recomputes `next_run` from now.
    #[serde(default)]
    pub schedule: Option<ScheduleSpec>,
    /// New AI-generation flag.
    #[serde(default)]
    pub is_ai_generated: Option<bool>,
}
