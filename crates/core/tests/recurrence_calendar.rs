//! Recurrence rules evaluated across whole calendar ranges

use condo::{InvalidRuleError, RecurrenceRule, is_due};
use jiff::{
    Span,
    civil::{Date, Weekday, date},
};
use testresult::TestResult;

fn days(from: Date, count: usize) -> impl Iterator<Item = Date> {
    from.series(Span::new().days(1)).take(count)
}

#[test]
fn single_weekday_rule_fires_on_that_weekday_only() -> TestResult {
    for iso in 1..=7_i16 {
        let rule = RecurrenceRule::from_values(&[iso], &[], &[])?;

        for day in days(date(2024, 1, 1), 366) {
            let expected = i16::from(day.weekday().to_monday_one_offset()) == iso;

            assert_eq!(is_due(&rule, day), expected, "weekday {iso} on {day}");
        }
    }

    Ok(())
}

#[test]
fn first_of_month_rule_fires_twelve_times_a_year() -> TestResult {
    let rule = RecurrenceRule::from_values(&[], &[1], &[])?;

    let fired: Vec<Date> = days(date(2025, 1, 1), 365)
        .filter(|day| rule.is_due(*day))
        .collect();

    assert_eq!(fired.len(), 12);
    assert!(fired.iter().all(|day| day.day() == 1), "only the 1st");

    Ok(())
}

#[test]
fn month_rule_fires_every_day_of_listed_months() -> TestResult {
    let rule = RecurrenceRule::from_values(&[], &[], &[2])?;

    let fired = days(date(2024, 1, 1), 366)
        .filter(|day| rule.is_due(*day))
        .count();

    assert_eq!(fired, 29, "February 2024 has 29 days");

    Ok(())
}

#[test]
fn weekend_mornings_in_summer() -> TestResult {
    let weekend = [Weekday::Saturday, Weekday::Sunday]
        .map(|weekday| i16::from(weekday.to_monday_one_offset()));

    let rule = RecurrenceRule::from_values(&weekend, &[], &[7, 8])?;

    let fired: Vec<Date> = days(date(2025, 1, 1), 365)
        .filter(|day| rule.is_due(*day))
        .collect();

    assert!(
        fired.iter().all(|day| {
            matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday)
                && matches!(day.month(), 7 | 8)
        }),
        "only summer weekends"
    );
    assert_eq!(fired.len(), 18, "July and August 2025 have 18 weekend days");

    Ok(())
}

#[test]
fn invalid_rules_fail_at_construction() {
    assert_eq!(
        RecurrenceRule::from_values(&[], &[0], &[]),
        Err(InvalidRuleError::MonthDay(0))
    );
    assert_eq!(
        RecurrenceRule::from_values(&[], &[31], &[4, 6, 9, 11]),
        Err(InvalidRuleError::Unsatisfiable)
    );
}
