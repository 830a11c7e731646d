//! Alert orchestration modules.
//!
//! Covers the in-memory alert store and activity log, the controller that
//! owns them, per-alert processing with its in-flight guard, and the
//! dispatch loop.

pub mod activity;
pub mod controller;
pub mod dispatch;
pub mod in_flight;
pub mod processor;
pub mod seed;
pub mod store;

pub use controller::AlertController;
pub use dispatch::{spawn_dispatch_loop, DispatchLoop};
pub use processor::{AlertProcessor, ProcessOutcome};
