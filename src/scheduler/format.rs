//! Human-readable schedule labels.

use crate::models::schedule::{Frequency, ScheduleSpec};

fn day_name(day_of_week: u32) -> &'static str {
    match day_of_week {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        _ => "Sat",
    }
}

fn month_name(month0: u32) -> &'static str {
    match month0 {
        0 => "Jan",
        1 => "Feb",
        2 => "Mar",
        3 => "Apr",
        4 => "May",
        5 => "Jun",
        6 => "Jul",
        7 => "Aug",
        8 => "Sep",
        9 => "Oct",
        10 => "Nov",
        _ => "Dec",
    }
}

/// Display label for a schedule, built from the same effective values the
/// next-run calculator uses.
#[must_use]
pub fn format_schedule(spec: &ScheduleSpec) -> String {
    match spec.kind {
        Frequency::Hourly => {
            let hours = spec.effective_interval_hours();
            let unit = if hours == 1 { "Hour" } else { "Hours" };
            format!("Every {hours} {unit}")
        }
        Frequency::Daily => "Daily".to_owned(),
        Frequency::Weekly => format!("Weekly ({})", day_name(spec.effective_day_of_week())),
        Frequency::Biweekly => format!("Bi-Weekly ({})", day_name(spec.effective_day_of_week())),
        Frequency::Monthly => format!("Monthly (Day {})", spec.effective_day_of_month()),
        Frequency::SemiAnnually => {
            format!("Semi-Annually (Day {})", spec.effective_day_of_month())
        }
        Frequency::Annually => format!(
            "Annually ({} {})",
            month_name(spec.effective_month()),
            spec.effective_day_of_month()
        ),
    }
}
