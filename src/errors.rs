//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Caller supplied input that failed validation.
    Validation(String),
    /// Requested entity does not exist.
    NotFound(String),
    /// Log entry has already left the pending state.
    AlreadyConsumed(String),
    /// Content-generation collaborator failed or timed out.
    Generation(String),
    /// HTTP server failure.
    Http(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::AlreadyConsumed(msg) => write!(f, "already consumed: {msg}"),
            Self::Generation(msg) => write!(f, "generation: {msg}"),
            Self::Http(msg) => write!(f, "http: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Generation(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
