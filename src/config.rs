//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::settings::AppSettings;
use crate::{AppError, Result};

/// Keychain service name used for stored credentials.
const KEYRING_SERVICE: &str = "alert-genius";

/// Dispatch loop timing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DispatchConfig {
    /// Tick period in milliseconds.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tick_millis: default_tick_millis(),
        }
    }
}

fn default_tick_millis() -> u64 {
    1000
}

/// Content-generation collaborator settings.
///
/// The API key is loaded at runtime via OS keychain or environment
/// variables, not from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the generative language API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Per-call timeout; 0 means no timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// API key (populated at runtime).
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            timeout_seconds: default_timeout_seconds(),
            api_key: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_http_port() -> u16 {
    8080
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_timezone() -> String {
    "UTC".into()
}

fn default_true() -> bool {
    true
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// HTTP port for the dashboard API.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Address the HTTP API binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    /// IANA time zone used for calendar arithmetic.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Load the built-in sample alerts on startup.
    #[serde(default = "default_true")]
    pub seed_defaults: bool,
    /// Dispatch loop timing.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Content-generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Initial dashboard settings.
    #[serde(default)]
    pub settings: AppSettings,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            timezone: default_timezone(),
            seed_defaults: true,
            dispatch: DispatchConfig::default(),
            generation: GenerationConfig::default(),
            settings: AppSettings::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Populate the generation API key from OS keychain or environment.
    ///
    /// Tries the `alert-genius` keyring entry first, then the
    /// `GEMINI_API_KEY` and `API_KEY` environment variables. A missing key
    /// is not an error; generation then runs in simulated mode.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the keychain lookup task panics.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.generation.api_key =
            load_credential("gemini_api_key", &["GEMINI_API_KEY", "API_KEY"]).await?;
        Ok(())
    }

    /// Time zone for calendar arithmetic.
    #[must_use]
    pub fn time_zone(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }

    /// Dispatch tick period.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.dispatch.tick_millis)
    }

    /// Generation timeout, `None` when disabled.
    #[must_use]
    pub fn generation_timeout(&self) -> Option<Duration> {
        (self.generation.timeout_seconds > 0)
            .then(|| Duration::from_secs(self.generation.timeout_seconds))
    }

    fn validate(&self) -> Result<()> {
        if self.dispatch.tick_millis == 0 {
            return Err(AppError::Config(
                "dispatch.tick_millis must be greater than zero".into(),
            ));
        }

        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|err| AppError::Config(format!("invalid timezone {}: {err}", self.timezone)))?;

        if self.generation.model.trim().is_empty() {
            return Err(AppError::Config("generation.model must not be empty".into()));
        }

        self.settings
            .validate()
            .map_err(|err| AppError::Config(format!("invalid settings: {err}")))?;

        Ok(())
    }
}

/// Load a credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_keys: &[&str]) -> Result<Option<String>> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(Some(value)),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            debug!(key = keyring_key, ?err, "keychain lookup failed, trying env var");
        }
    }

    Ok(env_keys
        .iter()
        .find_map(|name| env::var(name).ok().filter(|value| !value.is_empty())))
}
