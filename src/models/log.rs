//! Activity log entry recording one processing attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alert::Alert;
use crate::{AppError, Result};

/// Content stored on a log entry while generation is running.
pub const PLACEHOLDER_CONTENT: &str = "Generating content...";

/// Content stored on a log entry when generation fails.
pub const FAILURE_CONTENT: &str = "Error generating alert.";

/// Lifecycle status for a log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    /// Processing started, content not yet available.
    Pending,
    /// Content generated.
    Success,
    /// Content generation failed.
    Failed,
}

/// A processing attempt. Alert name and email are snapshots taken at
/// creation and do not follow later edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AlertLog {
    /// Unique record identifier.
    pub id: String,
    /// Alert this attempt belongs to (lookup only).
    pub alert_id: String,
    /// Alert name at creation time.
    pub alert_name: String,
    /// Alert email at creation time.
    pub email_target: String,
    /// Placeholder, generated content, or failure message.
    pub content: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: LogStatus,
}

impl AlertLog {
    /// Construct a pending entry for `alert`.
    #[must_use]
    pub fn pending(alert: &Alert, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            alert_id: alert.id.clone(),
            alert_name: alert.name.clone(),
            email_target: alert.email.clone(),
            content: PLACEHOLDER_CONTENT.to_owned(),
            timestamp,
            status: LogStatus::Pending,
        }
    }

    /// Move the entry out of `Pending` and record its final content.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AlreadyConsumed` if the entry is already terminal,
    /// or `AppError::Validation` if `status` is `Pending`.
    pub fn complete(&mut self, status: LogStatus, content: String) -> Result<()> {
        if self.status != LogStatus::Pending {
            return Err(AppError::AlreadyConsumed(format!(
                "log entry {} is already {:?}",
                self.id, self.status
            )));
        }
        if status == LogStatus::Pending {
            return Err(AppError::Validation(
                "log entry must complete as success or failed".into(),
            ));
        }
        self.status = status;
        self.content = content;
        Ok(())
    }
}
