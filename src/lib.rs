#![forbid(unsafe_code)]

//! Recurring alert scheduler: next-run calculation, due-alert dispatch,
//! content generation, and an append-only activity log.

pub mod clock;
pub mod config;
pub mod errors;
pub mod generation;
pub mod http;
pub mod models;
pub mod orchestrator;
pub mod scheduler;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
