//! Recurrence scheduling: next-run calculation and display labels.

pub mod format;
pub mod next_run;

pub use format::format_schedule;
pub use next_run::{next_run, next_run_utc};
