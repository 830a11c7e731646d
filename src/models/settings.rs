//! Dashboard settings held in memory for the process lifetime.

use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// How generated alert content would be delivered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Content is only recorded in the activity log.
    #[default]
    Simulated,
    /// Content would be sent through the configured SMTP relay.
    Smtp,
}

fn default_email() -> String {
    "admin@ag.com".into()
}

fn default_smtp_port() -> u16 {
    587
}

/// Mutable application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AppSettings {
    /// Email used when an alert is created without one.
    #[serde(default = "default_email")]
    pub default_email: String,
    /// Delivery method.
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP user name.
    #[serde(default)]
    pub smtp_user: String,
    /// SMTP password; accepted on input, never serialized out.
    #[serde(default, skip_serializing)]
    pub smtp_pass: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_email: default_email(),
            delivery_method: DeliveryMethod::default(),
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_user: String::new(),
            smtp_pass: String::new(),
        }
    }
}

impl AppSettings {
    /// Validate field combinations.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the default email is blank or SMTP
    /// delivery is selected without a host and port.
    pub fn validate(&self) -> Result<()> {
        if self.default_email.trim().is_empty() {
            return Err(AppError::Validation("default_email must not be empty".into()));
        }
        if self.delivery_method == DeliveryMethod::Smtp {
            if self.smtp_host.trim().is_empty() {
                return Err(AppError::Validation(
                    "smtp_host is required for smtp delivery".into(),
                ));
            }
            if self.smtp_port == 0 {
                return Err(AppError::Validation(
                    "smtp_port must be greater than zero".into(),
                ));
            }
        }
        Ok(())
    }
}
