//! Next-run calculation for recurrence rules.
//!
//! Calendar arithmetic (days, weekdays, months) happens on the wall clock
//! of the configured time zone so an alert keeps its local time of day
//! across DST changes. Hourly steps are absolute.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use tracing::warn;

use crate::models::schedule::{Frequency, ScheduleSpec};

/// Extra cycles applied when calendar arithmetic fails to move past the
/// reference instant.
const MAX_CORRECTIONS: u32 = 4;

/// Compute the next trigger instant for `spec`, strictly after `reference`.
///
/// Total for every `ScheduleSpec`: absent or out-of-range fields fall back
/// to their defaults. Weekly and biweekly schedules never fire later the
/// same day; a match on today's weekday moves a full week ahead.
#[must_use]
pub fn next_run<Tz: TimeZone>(
    spec: &ScheduleSpec,
    reference: DateTime<Utc>,
    tz: &Tz,
) -> DateTime<Utc> {
    let mut candidate = advance(spec, reference, tz);
    let mut corrections = 0;
    while candidate <= reference && corrections < MAX_CORRECTIONS {
        candidate = advance(spec, candidate, tz);
        corrections += 1;
    }

    if candidate > reference {
        return candidate;
    }

    warn!(%reference, kind = ?spec.kind, "calendar step did not advance, falling back to one hour");
    reference
        .checked_add_signed(Duration::hours(1))
        .unwrap_or(reference)
}

/// [`next_run`] evaluated on the UTC calendar.
#[must_use]
pub fn next_run_utc(spec: &ScheduleSpec, reference: DateTime<Utc>) -> DateTime<Utc> {
    next_run(spec, reference, &Utc)
}

/// One cycle forward from `from`. Returns `from` unchanged when the
/// result would leave chrono's representable range.
fn advance<Tz: TimeZone>(spec: &ScheduleSpec, from: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let local = from.with_timezone(tz).naive_local();
    let target = match spec.kind {
        Frequency::Hourly => {
            let step = Duration::hours(i64::from(spec.effective_interval_hours()));
            return from.checked_add_signed(step).unwrap_or(from);
        }
        Frequency::Daily => add_days(local, 1),
        Frequency::Weekly => add_days(local, days_until_weekday(local, spec.effective_day_of_week())),
        Frequency::Biweekly => add_days(
            local,
            days_until_weekday(local, spec.effective_day_of_week()) + 7,
        ),
        Frequency::Monthly => shift_months(local, 1, spec.effective_day_of_month()),
        Frequency::SemiAnnually => shift_months(local, 6, spec.effective_day_of_month()),
        Frequency::Annually => in_month(
            local,
            local.year() + 1,
            spec.effective_month() + 1,
            spec.effective_day_of_month(),
        ),
    };

    target.and_then(|naive| resolve_local(tz, naive)).unwrap_or(from)
}

/// Days until the next `weekday` (Sunday = 0), in `1..=7`.
fn days_until_weekday(local: NaiveDateTime, weekday: u32) -> u64 {
    let current = local.weekday().num_days_from_sunday();
    match (weekday + 7 - current) % 7 {
        0 => 7,
        days => u64::from(days),
    }
}

fn add_days(local: NaiveDateTime, days: u64) -> Option<NaiveDateTime> {
    local.checked_add_days(Days::new(days))
}

/// Move `months` calendar months forward, then pin the day of month.
fn shift_months(local: NaiveDateTime, months: u32, day_of_month: u32) -> Option<NaiveDateTime> {
    let month0 = local.month0() + months;
    let years = i32::try_from(month0 / 12).ok()?;
    in_month(local, local.year() + years, month0 % 12 + 1, day_of_month)
}

/// Same time of day on `day_of_month` of `year`/`month` (1-based), clamped
/// to the month's last day.
fn in_month(
    local: NaiveDateTime,
    year: i32,
    month: u32,
    day_of_month: u32,
) -> Option<NaiveDateTime> {
    let day = day_of_month.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(local.time()))
}

/// Number of days in `month` (1-based) of `year`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

/// Map a wall-clock time back to an instant. Ambiguous times (DST fall
/// back) take the earlier instant; skipped times (DST spring forward) move
/// one hour later.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}
