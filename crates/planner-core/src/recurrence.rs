//! Recurrence directives and the date advancer.
//!
//! A directive is the short text attached to a task describing how it
//! repeats:
//!
//! - `y` repeats every calendar year on the same month and day;
//! - `d <n>` repeats every `n` days, `1 <= n <= 366`.
//!
//! [`parse`] turns a directive into a [`RecurrenceRule`], and
//! [`next_occurrence`] walks a date forward by whole rule steps until it
//! reaches a reference date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::date;
use crate::error::{CoreError, ValidationError};

/// Largest interval accepted by the `d <n>` directive.
pub const MAX_INTERVAL_DAYS: u16 = 366;

/// A day count in `1..=MAX_INTERVAL_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayInterval(u16);

impl DayInterval {
    pub fn new(days: u16) -> Option<Self> {
        (1..=MAX_INTERVAL_DAYS)
            .contains(&days)
            .then_some(Self(days))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

/// A validated recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceRule {
    /// One calendar year per step, keeping month and day.
    Yearly,
    /// A fixed number of calendar days per step.
    EveryNDays(DayInterval),
}

impl RecurrenceRule {
    /// Builds an `EveryNDays` rule, checking the interval bound.
    pub fn every_n_days(days: u16) -> Result<Self, ValidationError> {
        DayInterval::new(days)
            .map(RecurrenceRule::EveryNDays)
            .ok_or_else(|| ValidationError::IntervalOutOfRange(days.to_string()))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::Yearly => write!(f, "y"),
            RecurrenceRule::EveryNDays(interval) => write!(f, "d {}", interval.get()),
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parses a recurrence directive.
///
/// The directive is split on whitespace. The first field selects the rule
/// kind; `y` takes no parameter and `d` takes exactly one day count.
/// A day count that is not an integer in `1..=366` is reported as
/// [`ValidationError::IntervalOutOfRange`].
pub fn parse(directive: &str) -> Result<RecurrenceRule, ValidationError> {
    let fields: Vec<&str> = directive.split_whitespace().collect();

    match fields.as_slice() {
        [] => Err(ValidationError::EmptyDirective),
        ["y"] => Ok(RecurrenceRule::Yearly),
        ["y", ..] => Err(ValidationError::MalformedYearlyRule),
        ["d", days] => days
            .parse::<u16>()
            .ok()
            .and_then(DayInterval::new)
            .map(RecurrenceRule::EveryNDays)
            .ok_or_else(|| ValidationError::IntervalOutOfRange(days.to_string())),
        ["d", ..] => Err(ValidationError::MalformedDailyRule),
        [kind, ..] => Err(ValidationError::UnknownRuleKind(kind.to_string())),
    }
}

/// Returns the first date reached by stepping `from` forward by `rule` that
/// is on or after `reference`.
///
/// At least one step is always taken, so the result is strictly after
/// `from` even when `from` already satisfies the reference.
///
/// Yearly steps are computed from `from` itself (the k-th step is
/// `from + 12k months`) and month arithmetic clamps to the end of the
/// month: a February 29 start falls on February 28 in common years and
/// returns to February 29 in leap years.
///
/// Returns `None` if the result falls after [`date::MAX_YEAR`], since
/// `YYYYMMDD` has no room for a five-digit year.
pub fn next_occurrence(
    rule: RecurrenceRule,
    from: NaiveDate,
    reference: NaiveDate,
) -> Option<NaiveDate> {
    let next = match rule {
        RecurrenceRule::Yearly => next_yearly(from, reference),
        RecurrenceRule::EveryNDays(interval) => next_every_n_days(from, reference, interval.get()),
    };
    next.filter(|d| d.year() <= date::MAX_YEAR)
}

fn next_yearly(from: NaiveDate, reference: NaiveDate) -> Option<NaiveDate> {
    // Every step below `reference.year() - 1` lands before the reference.
    let mut years = (reference.year() - from.year() - 1).max(1);

    loop {
        let months = u32::try_from(years).ok()?.checked_mul(12)?;
        let candidate = from.checked_add_months(Months::new(months))?;
        if candidate >= reference {
            return Some(candidate);
        }
        years += 1;
    }
}

fn next_every_n_days(from: NaiveDate, reference: NaiveDate, days: u16) -> Option<NaiveDate> {
    let step = i64::from(days);
    let gap = reference.signed_duration_since(from).num_days();

    let steps = if gap <= step {
        1
    } else {
        (gap + step - 1) / step
    };

    let offset = u64::try_from(steps.checked_mul(step)?).ok()?;
    from.checked_add_days(Days::new(offset))
}

/// Computes the next occurrence from wire-format inputs.
///
/// `now` and `date` are `YYYYMMDD` strings, `directive` is a recurrence
/// directive. The result is the next occurrence in `YYYYMMDD` form.
pub fn next_date(now: &str, date: &str, directive: &str) -> Result<String, CoreError> {
    let reference = date::parse(now)?;
    let from = date::parse(date)?;
    let rule = parse(directive)?;

    next_occurrence(rule, from, reference)
        .map(date::format)
        .ok_or_else(|| CoreError::DateOutOfRange(date.to_string()))
}
