//! Unit tests for next-run calculation.
//!
//! Covers the strictly-future invariant, exact hourly steps, weekday
//! targeting, end-of-month clamping, and DST handling in a named zone.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use chrono_tz::America::New_York;

use alert_genius::models::schedule::{Frequency, ScheduleSpec};
use alert_genius::scheduler::next_run::days_in_month;
use alert_genius::scheduler::{next_run, next_run_utc};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single().expect("valid instant")
}

fn every_kind() -> Vec<ScheduleSpec> {
    let mut specs = vec![ScheduleSpec::daily(), ScheduleSpec::hourly(1), ScheduleSpec::hourly(0)];
    for dow in 0..7 {
        specs.push(ScheduleSpec::weekly(dow));
        specs.push(ScheduleSpec::biweekly(dow));
    }
    for dom in [1, 15, 28, 29, 30, 31] {
        specs.push(ScheduleSpec::monthly(dom));
        specs.push(ScheduleSpec::semi_annually(dom));
        specs.push(ScheduleSpec::annually(1, dom));
        specs.push(ScheduleSpec::annually(11, dom));
    }
    specs
}

fn sample_references() -> Vec<DateTime<Utc>> {
    let mut refs = Vec::new();
    let start = utc(2023, 12, 25, 0, 0);
    // Three weeks of references at uneven hours, spanning a year boundary.
    for step in 0..(21 * 5_i64) {
        refs.push(start + Duration::minutes(step * 293));
    }
    refs.extend([
        utc(2024, 1, 31, 23, 59),
        utc(2024, 2, 29, 12, 0),
        utc(2024, 12, 31, 23, 59),
        utc(2023, 8, 31, 6, 0),
    ]);
    refs
}

#[test]
fn result_is_strictly_after_reference_for_every_kind() {
    for spec in every_kind() {
        for reference in sample_references() {
            let next = next_run_utc(&spec, reference);
            assert!(next > reference, "{spec:?} from {reference} gave {next}");
        }
    }
}

#[test]
fn result_is_strictly_after_reference_in_dst_zone() {
    for spec in every_kind() {
        for reference in sample_references() {
            let next = next_run(&spec, reference, &New_York);
            assert!(next > reference, "{spec:?} from {reference} gave {next}");
        }
    }
}

#[test]
fn hourly_adds_exact_interval() {
    let reference = utc(2024, 3, 10, 6, 17);
    for hours in [1, 2, 4, 12, 48] {
        let next = next_run_utc(&ScheduleSpec::hourly(hours), reference);
        assert_eq!(next - reference, Duration::hours(i64::from(hours)));
    }
}

#[test]
fn hourly_steps_are_absolute_across_dst() {
    let reference = utc(2024, 3, 10, 6, 30);
    let next = next_run(&ScheduleSpec::hourly(3), reference, &New_York);
    assert_eq!(next - reference, Duration::hours(3));
}

#[test]
fn hourly_zero_or_absent_interval_defaults_to_one_hour() {
    let reference = utc(2024, 5, 1, 9, 0);
    let zero = next_run_utc(&ScheduleSpec::hourly(0), reference);
    assert_eq!(zero - reference, Duration::hours(1));

    let absent = ScheduleSpec {
        kind: Frequency::Hourly,
        interval_hours: None,
        day_of_week: None,
        day_of_month: None,
        month: None,
    };
    assert_eq!(next_run_utc(&absent, reference) - reference, Duration::hours(1));
}

#[test]
fn daily_adds_one_calendar_day() {
    let reference = utc(2024, 2, 28, 8, 45);
    assert_eq!(next_run_utc(&ScheduleSpec::daily(), reference), utc(2024, 2, 29, 8, 45));
}

#[test]
fn weekly_on_same_weekday_moves_a_full_week() {
    // 2024-05-15 is a Wednesday.
    let reference = utc(2024, 5, 15, 10, 0);
    let next = next_run_utc(&ScheduleSpec::weekly(3), reference);
    assert_eq!(next, utc(2024, 5, 22, 10, 0));
}

#[test]
fn weekly_wraps_around_week_boundary() {
    // Saturday to Sunday.
    let reference = utc(2024, 5, 18, 22, 0);
    let next = next_run_utc(&ScheduleSpec::weekly(0), reference);
    assert_eq!(next, utc(2024, 5, 19, 22, 0));
}

#[test]
fn weekly_lands_on_target_weekday_within_seven_days() {
    for reference in sample_references() {
        for dow in 0..7 {
            let next = next_run_utc(&ScheduleSpec::weekly(dow), reference);
            assert_eq!(next.weekday().num_days_from_sunday(), dow);
            let gap = next - reference;
            assert!(gap > Duration::zero() && gap <= Duration::days(7), "gap {gap}");
        }
    }
}

#[test]
fn biweekly_lands_on_target_weekday_between_one_and_two_weeks() {
    for reference in sample_references() {
        for dow in 0..7 {
            let next = next_run_utc(&ScheduleSpec::biweekly(dow), reference);
            assert_eq!(next.weekday().num_days_from_sunday(), dow);
            let gap = next - reference;
            assert!(gap > Duration::days(7) && gap <= Duration::days(14), "gap {gap}");
        }
    }
}

#[test]
fn weekly_defaults_to_monday() {
    let spec = ScheduleSpec {
        kind: Frequency::Weekly,
        interval_hours: None,
        day_of_week: None,
        day_of_month: None,
        month: None,
    };
    let next = next_run_utc(&spec, utc(2024, 5, 15, 10, 0));
    assert_eq!(next, utc(2024, 5, 20, 10, 0));
}

#[test]
fn monthly_clamps_to_february_end() {
    let common = next_run_utc(&ScheduleSpec::monthly(31), utc(2023, 1, 15, 9, 0));
    assert_eq!(common, utc(2023, 2, 28, 9, 0));

    let leap = next_run_utc(&ScheduleSpec::monthly(31), utc(2024, 1, 15, 9, 0));
    assert_eq!(leap, utc(2024, 2, 29, 9, 0));
}

#[test]
fn monthly_from_month_end_does_not_overflow_into_following_month() {
    let next = next_run_utc(&ScheduleSpec::monthly(31), utc(2024, 1, 31, 9, 0));
    assert_eq!(next, utc(2024, 2, 29, 9, 0));

    let next = next_run_utc(&ScheduleSpec::monthly(31), utc(2024, 3, 31, 9, 0));
    assert_eq!(next, utc(2024, 4, 30, 9, 0));
}

#[test]
fn monthly_rolls_over_year_end() {
    let next = next_run_utc(&ScheduleSpec::monthly(5), utc(2024, 12, 20, 7, 0));
    assert_eq!(next, utc(2025, 1, 5, 7, 0));
}

#[test]
fn day_of_month_matches_clamped_target() {
    for reference in sample_references() {
        for dom in [1, 15, 28, 29, 30, 31] {
            for spec in [
                ScheduleSpec::monthly(dom),
                ScheduleSpec::semi_annually(dom),
                ScheduleSpec::annually(1, dom),
            ] {
                let next = next_run_utc(&spec, reference);
                let expected = dom.min(days_in_month(next.year(), next.month()));
                assert_eq!(next.day(), expected, "{spec:?} from {reference}");
            }
        }
    }
}

#[test]
fn semi_annually_advances_six_months() {
    let next = next_run_utc(&ScheduleSpec::semi_annually(31), utc(2024, 8, 31, 12, 0));
    assert_eq!(next, utc(2025, 2, 28, 12, 0));

    let next = next_run_utc(&ScheduleSpec::semi_annually(10), utc(2024, 3, 2, 12, 0));
    assert_eq!(next, utc(2024, 9, 10, 12, 0));
}

#[test]
fn annually_pins_month_and_clamps_day() {
    // February 29 in a non-leap target year.
    let next = next_run_utc(&ScheduleSpec::annually(1, 29), utc(2024, 3, 1, 0, 0));
    assert_eq!(next, utc(2025, 2, 28, 0, 0));

    let next = next_run_utc(&ScheduleSpec::annually(1, 29), utc(2023, 6, 1, 0, 0));
    assert_eq!(next, utc(2024, 2, 29, 0, 0));

    let next = next_run_utc(&ScheduleSpec::annually(11, 25), utc(2024, 1, 10, 18, 0));
    assert_eq!(next, utc(2025, 12, 25, 18, 0));
}

#[test]
fn irrelevant_fields_are_ignored() {
    let reference = utc(2024, 5, 15, 10, 0);
    let noisy = ScheduleSpec {
        kind: Frequency::Daily,
        interval_hours: Some(0),
        day_of_week: Some(42),
        day_of_month: Some(99),
        month: Some(77),
    };
    assert_eq!(next_run_utc(&noisy, reference), utc(2024, 5, 16, 10, 0));
}

#[test]
fn out_of_range_day_of_month_is_clamped() {
    let spec = ScheduleSpec::monthly(45);
    let next = next_run_utc(&spec, utc(2024, 3, 10, 0, 0));
    assert_eq!(next, utc(2024, 4, 30, 0, 0));
}

#[test]
fn daily_keeps_local_time_across_spring_forward() {
    // 2024-03-09 12:00 EST.
    let reference = utc(2024, 3, 9, 17, 0);
    let next = next_run(&ScheduleSpec::daily(), reference, &New_York);
    // 2024-03-10 12:00 EDT.
    assert_eq!(next, utc(2024, 3, 10, 16, 0));
    assert_eq!(next - reference, Duration::hours(23));
}

#[test]
fn skipped_local_time_moves_forward_an_hour() {
    // 2024-03-09 02:30 EST; 02:30 does not exist on 2024-03-10.
    let reference = utc(2024, 3, 9, 7, 30);
    let next = next_run(&ScheduleSpec::daily(), reference, &New_York);
    // 2024-03-10 03:30 EDT.
    assert_eq!(next, utc(2024, 3, 10, 7, 30));
    assert!(next > reference);
}

#[test]
fn ambiguous_local_time_takes_earlier_instant() {
    // 2024-11-02 01:30 EDT; 01:30 occurs twice on 2024-11-03.
    let reference = utc(2024, 11, 2, 5, 30);
    let next = next_run(&ScheduleSpec::daily(), reference, &New_York);
    assert_eq!(next, utc(2024, 11, 3, 5, 30));
}

#[test]
fn weekday_is_evaluated_in_local_zone() {
    // 2024-05-16 02:00 UTC is still Wednesday 22:00 in New York.
    let reference = utc(2024, 5, 16, 2, 0);
    let next = next_run(&ScheduleSpec::weekly(4), reference, &New_York);
    // Thursday 2024-05-16 22:00 EDT.
    assert_eq!(next, utc(2024, 5, 17, 2, 0));
}
