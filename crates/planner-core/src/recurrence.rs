//! The next-occurrence engine.
//!
//! [`next_occurrence`] is the single entry point the API layer calls: given
//! a reference day `now`, an anchor date string and a repeat rule string,
//! it returns the first date the rule lands on strictly after `now`. The
//! returned date is never equal to `now`, even when the raw arithmetic
//! lands exactly on it.

use chrono::{Datelike, Duration, NaiveDate};

use crate::date::{format_date, parse_date};
use crate::error::CoreError;
use crate::rule::Rule;

/// Defensive bound on the monthly scan. Every satisfiable rule terminates
/// well inside this (any day in 1..=31 exists in some month of every year);
/// only unsatisfiable combinations like `m 31 4` would otherwise loop.
const MONTH_SCAN_LIMIT: u32 = 4000;

/// Computes the next occurrence of `rule` anchored at `start`, strictly
/// after `now`, in the 8-digit `YYYYMMDD` wire form.
pub fn next_occurrence(now: NaiveDate, start: &str, rule: &str) -> Result<String, CoreError> {
    if rule.trim().is_empty() {
        return Err(CoreError::MissingRule);
    }
    let start = parse_date(start)?;
    let rule: Rule = rule.parse()?;
    let next = next_date(now, start, &rule)?;
    Ok(format_date(next))
}

/// The advancer over already-parsed values.
pub fn next_date(now: NaiveDate, start: NaiveDate, rule: &Rule) -> Result<NaiveDate, CoreError> {
    match rule {
        Rule::Daily { interval } => Ok(next_daily(now, start, *interval)),
        Rule::Yearly => Ok(next_yearly(now, start)),
        Rule::Weekly { weekdays } => Ok(next_weekly(now, start, weekdays)),
        Rule::Monthly { days, months } => next_monthly(now, start, days, months),
    }
}

/// Smallest positive multiple of `interval` added to `start` that lands
/// strictly after `now`. Closed form of the add-one-step-at-a-time loop;
/// the anchor itself never qualifies.
fn next_daily(now: NaiveDate, start: NaiveDate, interval: u32) -> NaiveDate {
    let interval = i64::from(interval);
    let elapsed = (now - start).num_days();
    let steps = if elapsed < 0 { 1 } else { elapsed / interval + 1 };
    start + Duration::days(steps * interval)
}

fn next_yearly(now: NaiveDate, start: NaiveDate) -> NaiveDate {
    let mut date = start;
    loop {
        let year = date.year() + 1;
        // A Feb 29 anchor rolls forward to Mar 1 in non-leap years, never
        // back to Feb 28, and the rolled date becomes the anchor for later
        // years.
        let next = match NaiveDate::from_ymd_opt(year, date.month(), date.day()) {
            Some(next) => next,
            None => first_of_month(year, 3),
        };
        if next > now {
            return next;
        }
        date = next;
    }
}

fn next_weekly(now: NaiveDate, start: NaiveDate, weekdays: &[u32]) -> NaiveDate {
    let mut date = start;
    loop {
        // Both conditions must hold at the same candidate: being past `now`
        // on a non-member weekday does not terminate the scan.
        if weekdays.contains(&date.weekday().number_from_monday()) && date > now {
            return date;
        }
        date += Duration::days(1);
    }
}

/// Scans month by month from the anchor, resolving each day entry within
/// the current month, and returns the earliest candidate that is on or
/// after `start` and strictly after `now`.
fn next_monthly(
    now: NaiveDate,
    start: NaiveDate,
    days: &[i32],
    months: &[u32],
) -> Result<NaiveDate, CoreError> {
    let mut cursor = start;
    for _ in 0..MONTH_SCAN_LIMIT {
        let (year, month) = (cursor.year(), cursor.month());
        if !months.is_empty() && !months.contains(&month) {
            cursor = first_of_next_month(year, month);
            continue;
        }
        let candidate = days
            .iter()
            .filter_map(|&day| resolve_day(year, month, day))
            .filter(|&date| date >= start && date > now)
            .min();
        if let Some(date) = candidate {
            return Ok(date);
        }
        cursor = first_of_next_month(year, month);
    }
    Err(CoreError::InvalidInput(format!(
        "no monthly occurrence within {MONTH_SCAN_LIMIT} months"
    )))
}

/// Resolves a day entry within a concrete month. Positive entries beyond
/// the month's length are skipped, not clamped; negative entries count from
/// the month's end and clamp upward to day 1.
fn resolve_day(year: i32, month: u32, day: i32) -> Option<NaiveDate> {
    if day < 0 {
        let last = days_in_month(year, month) as i32;
        let resolved = (last + day + 1).max(1);
        NaiveDate::from_ymd_opt(year, month, resolved as u32)
    } else {
        NaiveDate::from_ymd_opt(year, month, day as u32)
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always valid")
}

fn first_of_next_month(year: i32, month: u32) -> NaiveDate {
    if month == 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    first_of_next_month(year, month)
        .pred_opt()
        .expect("day before the 1st always exists")
        .day()
}
