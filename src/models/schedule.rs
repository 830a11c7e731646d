//! Recurrence rule attached to an alert.

use serde::{Deserialize, Serialize};

/// Recurrence frequency for a schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// Every `interval_hours` hours.
    Hourly,
    /// Once per calendar day.
    Daily,
    /// Once per week on `day_of_week`.
    Weekly,
    /// Every other week on `day_of_week`.
    Biweekly,
    /// Once per month on `day_of_month`.
    Monthly,
    /// Every six months on `day_of_month`.
    SemiAnnually,
    /// Once per year on `month` / `day_of_month`.
    Annually,
}

/// Recurrence rule. Fields that do not apply to `kind` are ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleSpec {
    /// Recurrence frequency.
    pub kind: Frequency,
    /// Hour step for [`Frequency::Hourly`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_hours: Option<u32>,
    /// Weekday (Sunday = 0) for weekly and biweekly schedules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u32>,
    /// Day of month (1-31) for monthly, semi-annual and annual schedules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    /// Month (January = 0) for annual schedules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl ScheduleSpec {
    fn of(kind: Frequency) -> Self {
        Self {
            kind,
            interval_hours: None,
            day_of_week: None,
            day_of_month: None,
            month: None,
        }
    }

    /// Every `interval_hours` hours.
    #[must_use]
    pub fn hourly(interval_hours: u32) -> Self {
        Self {
            interval_hours: Some(interval_hours),
            ..Self::of(Frequency::Hourly)
        }
    }

    /// Once per day.
    #[must_use]
    pub fn daily() -> Self {
        Self::of(Frequency::Daily)
    }

    /// Weekly on the given weekday (Sunday = 0).
    #[must_use]
    pub fn weekly(day_of_week: u32) -> Self {
        Self {
            day_of_week: Some(day_of_week),
            ..Self::of(Frequency::Weekly)
        }
    }

    /// Every two weeks on the given weekday (Sunday = 0).
    #[must_use]
    pub fn biweekly(day_of_week: u32) -> Self {
        Self {
            day_of_week: Some(day_of_week),
            ..Self::of(Frequency::Biweekly)
        }
    }

    /// Monthly on the given day of month.
    #[must_use]
    pub fn monthly(day_of_month: u32) -> Self {
        Self {
            day_of_month: Some(day_of_month),
            ..Self::of(Frequency::Monthly)
        }
    }

    /// Every six months on the given day of month.
    #[must_use]
    pub fn semi_annually(day_of_month: u32) -> Self {
        Self {
            day_of_month: Some(day_of_month),
            ..Self::of(Frequency::SemiAnnually)
        }
    }

    /// Yearly on the given month (January = 0) and day of month.
    #[must_use]
    pub fn annually(month: u32, day_of_month: u32) -> Self {
        Self {
            month: Some(month),
            day_of_month: Some(day_of_month),
            ..Self::of(Frequency::Annually)
        }
    }

    /// Hour step with the zero/absent case defaulted to 1.
    #[must_use]
    pub fn effective_interval_hours(&self) -> u32 {
        self.interval_hours.filter(|h| *h > 0).unwrap_or(1)
    }

    /// Target weekday, Monday when absent, wrapped into 0-6.
    #[must_use]
    pub fn effective_day_of_week(&self) -> u32 {
        self.day_of_week.unwrap_or(1) % 7
    }

    /// Target day of month, 1 when absent, clamped into 1-31.
    #[must_use]
    pub fn effective_day_of_month(&self) -> u32 {
        self.day_of_month.unwrap_or(1).clamp(1, 31)
    }

    /// Target month, January when absent, clamped into 0-11.
    #[must_use]
    pub fn effective_month(&self) -> u32 {
        self.month.unwrap_or(0).min(11)
    }
}
