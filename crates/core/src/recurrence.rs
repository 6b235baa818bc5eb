//! Recurrence Rules
//!
//! Calendar filters built from optional weekday, month-day and month sets. An empty set
//! leaves its axis unconstrained; a rule is due on a date when every axis accepts it.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::civil::{Date, Weekday};
use serde::{Deserialize, Serialize, Serializer};
use smallvec::SmallVec;
use thiserror::Error;

/// Months in one Gregorian calendar cycle.
const GREGORIAN_CYCLE_MONTHS: i64 = 400 * 12;

/// Rule construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidRuleError {
    /// Weekday number outside ISO `1..=7` (Monday is `1`).
    #[error("weekday {0} is outside 1..=7")]
    Weekday(i16),

    /// Day of month outside `1..=31`.
    #[error("day of month {0} is outside 1..=31")]
    MonthDay(i16),

    /// Month outside `1..=12`.
    #[error("month {0} is outside 1..=12")]
    Month(i16),

    /// All sets empty. Every-day rules must be built with [`RecurrenceRule::every_day`].
    #[error("rule has no constraints; use an explicit every-day rule instead")]
    Unconstrained,

    /// No selected month has any of the selected days (e.g. the 31st of February).
    #[error("rule can never be due")]
    Unsatisfiable,
}

/// Value outside the range of an [`OrdinalSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange(pub i16);

/// Set of ordinals in `1..=MAX`, stored as a bitmask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OrdinalSet<const MAX: u8> {
    bits: u32,
}

/// ISO weekday numbers, Monday = 1.
pub type WeekdaySet = OrdinalSet<7>;

/// Days of the month.
pub type MonthDaySet = OrdinalSet<31>;

/// Months of the year.
pub type MonthSet = OrdinalSet<12>;

impl<const MAX: u8> OrdinalSet<MAX> {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Insert an ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] when `value` is not within `1..=MAX`.
    pub fn try_insert(&mut self, value: i16) -> Result<(), OutOfRange> {
        if value < 1 || value > i16::from(MAX) {
            return Err(OutOfRange(value));
        }

        self.bits |= 1 << value;

        Ok(())
    }

    /// Build a set from ordinals, failing on the first out-of-range value.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] for the first value outside `1..=MAX`.
    pub fn try_from_values<I>(values: I) -> Result<Self, OutOfRange>
    where
        I: IntoIterator<Item = i16>,
    {
        let mut set = Self::empty();

        for value in values {
            set.try_insert(value)?;
        }

        Ok(set)
    }

    /// Whether `value` is a member.
    #[must_use]
    pub fn contains(self, value: i16) -> bool {
        (1..=i16::from(MAX)).contains(&value) && self.bits & (1 << value) != 0
    }

    /// Whether no ordinal is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = i16> {
        (1..=i16::from(MAX)).filter(move |value| self.contains(*value))
    }

    /// Members in ascending order, collected for storage.
    #[must_use]
    pub fn to_values(self) -> Vec<i16> {
        self.iter().collect()
    }

    fn accepts(self, value: i16) -> bool {
        self.is_empty() || self.contains(value)
    }
}

impl WeekdaySet {
    /// Build a weekday set from jiff weekdays.
    pub fn from_weekdays<I>(weekdays: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        Self {
            bits: weekdays
                .into_iter()
                .fold(0, |bits, weekday| bits | 1 << iso_weekday(weekday)),
        }
    }

    /// Whether the weekday is a member.
    #[must_use]
    pub fn contains_weekday(self, weekday: Weekday) -> bool {
        self.contains(iso_weekday(weekday))
    }
}

impl<const MAX: u8> Debug for OrdinalSet<MAX> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<const MAX: u8> Serialize for OrdinalSet<MAX> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

fn iso_weekday(weekday: Weekday) -> i16 {
    i16::from(weekday.to_monday_one_offset())
}

/// Maximum day number a month can hold in any year.
fn max_days_in_month(month: i16) -> i16 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Recurrence rule over weekdays, days of the month and months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredRule", into = "StoredRule")]
pub struct RecurrenceRule {
    weekdays: WeekdaySet,
    monthdays: MonthDaySet,
    months: MonthSet,
}

impl RecurrenceRule {
    /// A rule that is due on every date.
    #[must_use]
    pub const fn every_day() -> Self {
        Self {
            weekdays: WeekdaySet::empty(),
            monthdays: MonthDaySet::empty(),
            months: MonthSet::empty(),
        }
    }

    /// Create a constrained rule.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRuleError::Unconstrained`] when every set is empty and
    /// [`InvalidRuleError::Unsatisfiable`] when no selected month holds a selected day.
    pub fn new(
        weekdays: WeekdaySet,
        monthdays: MonthDaySet,
        months: MonthSet,
    ) -> Result<Self, InvalidRuleError> {
        if weekdays.is_empty() && monthdays.is_empty() && months.is_empty() {
            return Err(InvalidRuleError::Unconstrained);
        }

        let rule = Self {
            weekdays,
            monthdays,
            months,
        };

        if !rule.is_satisfiable() {
            return Err(InvalidRuleError::Unsatisfiable);
        }

        Ok(rule)
    }

    /// Create a rule from raw ordinals.
    ///
    /// # Errors
    ///
    /// Returns the axis-specific error for the first out-of-range value, then applies the
    /// checks of [`RecurrenceRule::new`].
    pub fn from_values(
        weekdays: &[i16],
        monthdays: &[i16],
        months: &[i16],
    ) -> Result<Self, InvalidRuleError> {
        let (weekdays, monthdays, months) = parse_sets(weekdays, monthdays, months)?;

        Self::new(weekdays, monthdays, months)
    }

    /// Rebuild a persisted rule. Only [`RecurrenceRule::every_day`] persists with every set
    /// empty, so empty input decodes to it.
    ///
    /// Satisfiability is not checked here: a stored rule that names an impossible date
    /// decodes and is never due.
    ///
    /// # Errors
    ///
    /// Returns the axis-specific error for the first out-of-range value.
    pub fn from_stored(
        weekdays: &[i16],
        monthdays: &[i16],
        months: &[i16],
    ) -> Result<Self, InvalidRuleError> {
        let (weekdays, monthdays, months) = parse_sets(weekdays, monthdays, months)?;

        Ok(Self {
            weekdays,
            monthdays,
            months,
        })
    }

    /// Weekday constraint.
    #[must_use]
    pub const fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    /// Day-of-month constraint.
    #[must_use]
    pub const fn monthdays(&self) -> MonthDaySet {
        self.monthdays
    }

    /// Month constraint.
    #[must_use]
    pub const fn months(&self) -> MonthSet {
        self.months
    }

    /// Whether the rule places no constraint at all.
    #[must_use]
    pub const fn is_every_day(&self) -> bool {
        self.weekdays.is_empty() && self.monthdays.is_empty() && self.months.is_empty()
    }

    /// Whether the rule is due on `date`.
    #[must_use]
    pub fn is_due(&self, date: Date) -> bool {
        self.weekdays.accepts(iso_weekday(date.weekday()))
            && self.monthdays.accepts(i16::from(date.day()))
            && self.months.accepts(i16::from(date.month()))
    }

    /// First date on or after `from` on which the rule is due.
    ///
    /// Walks the selected months of one 400-year Gregorian cycle, after which every date
    /// falls on the same weekday again, so `None` means the rule is never due.
    #[must_use]
    pub fn next_due(&self, from: Date) -> Option<Date> {
        let start = from.first_of_month();

        (0..GREGORIAN_CYCLE_MONTHS)
            .map_while(|offset| start.checked_add(jiff::Span::new().months(offset)).ok())
            .filter(|month| self.months.accepts(i16::from(month.month())))
            .flat_map(|month| {
                month
                    .series(jiff::Span::new().days(1))
                    .take_while(move |day| day.month() == month.month())
            })
            .find(|day| *day >= from && self.is_due(*day))
    }

    fn is_satisfiable(&self) -> bool {
        if self.monthdays.is_empty() {
            return true;
        }

        (1..=12)
            .filter(|month| self.months.accepts(*month))
            .any(|month| {
                self.monthdays
                    .iter()
                    .any(|day| day <= max_days_in_month(month))
            })
    }
}

/// Pure predicate form of [`RecurrenceRule::is_due`].
#[must_use]
pub fn is_due(rule: &RecurrenceRule, date: Date) -> bool {
    rule.is_due(date)
}

fn parse_sets(
    weekdays: &[i16],
    monthdays: &[i16],
    months: &[i16],
) -> Result<(WeekdaySet, MonthDaySet, MonthSet), InvalidRuleError> {
    let weekdays = WeekdaySet::try_from_values(weekdays.iter().copied())
        .map_err(|OutOfRange(value)| InvalidRuleError::Weekday(value))?;

    let monthdays = MonthDaySet::try_from_values(monthdays.iter().copied())
        .map_err(|OutOfRange(value)| InvalidRuleError::MonthDay(value))?;

    let months = MonthSet::try_from_values(months.iter().copied())
        .map_err(|OutOfRange(value)| InvalidRuleError::Month(value))?;

    Ok((weekdays, monthdays, months))
}

/// Serialized rule shape: plain ordinal lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredRule {
    #[serde(default)]
    weekdays: SmallVec<[i16; 7]>,

    #[serde(default)]
    monthdays: SmallVec<[i16; 4]>,

    #[serde(default)]
    months: SmallVec<[i16; 4]>,
}

impl TryFrom<StoredRule> for RecurrenceRule {
    type Error = InvalidRuleError;

    fn try_from(value: StoredRule) -> Result<Self, Self::Error> {
        Self::from_stored(&value.weekdays, &value.monthdays, &value.months)
    }
}

impl From<RecurrenceRule> for StoredRule {
    fn from(rule: RecurrenceRule) -> Self {
        Self {
            weekdays: rule.weekdays.iter().collect(),
            monthdays: rule.monthdays.iter().collect(),
            months: rule.months.iter().collect(),
        }
    }
}
