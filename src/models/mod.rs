//! Domain model module declarations.

pub mod alert;
pub mod log;
pub mod schedule;
pub mod settings;

pub use alert::{Alert, AlertUpdate, NewAlert};
pub use log::{AlertLog, LogStatus};
pub use schedule::{Frequency, ScheduleSpec};
pub use settings::{AppSettings, DeliveryMethod};
