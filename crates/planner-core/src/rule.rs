//! The repeat-rule grammar.
//!
//! A rule string is whitespace-separated fields; the first field is the
//! kind discriminator (`d`, `y`, `w` or `m`) and the rest are kind-specific
//! operands. Parsing validates every operand range so the advancer in
//! [`crate::recurrence`] can assume well-formed input.

use std::str::FromStr;

use crate::error::CoreError;

/// Largest interval accepted by a `d` rule.
pub const MAX_DAILY_INTERVAL: u32 = 400;

/// A parsed repeat rule. The closed set of kinds keeps dispatch in the
/// advancer exhaustive at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// `d <n>`: every `n` days.
    Daily { interval: u32 },
    /// `y`: yearly on the anchor's month and day.
    Yearly,
    /// `w <d,...>`: on the given ISO weekdays (1 = Monday .. 7 = Sunday).
    Weekly { weekdays: Vec<u32> },
    /// `m <d,...> [<m,...>]`: on the given days of the month, optionally
    /// restricted to the given months. Negative days count from the month's
    /// end (-1 = last day, -2 = second-to-last). An empty month list means
    /// every month.
    Monthly { days: Vec<i32>, months: Vec<u32> },
}

impl FromStr for Rule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let Some(kind) = fields.next() else {
            return Err(CoreError::MissingRule);
        };
        let operands: Vec<&str> = fields.collect();

        match kind {
            "d" => {
                let [raw] = operands.as_slice() else {
                    return Err(CoreError::InvalidOperand(format!(
                        "rule 'd' expects exactly one operand, got {}",
                        operands.len()
                    )));
                };
                let interval: u32 = raw.parse().map_err(|_| {
                    CoreError::InvalidOperand(format!("day interval is not a number: {raw:?}"))
                })?;
                if !(1..=MAX_DAILY_INTERVAL).contains(&interval) {
                    return Err(CoreError::InvalidOperand(format!(
                        "day interval out of range 1..={MAX_DAILY_INTERVAL}: {interval}"
                    )));
                }
                Ok(Rule::Daily { interval })
            }
            // Trailing operands after `y` carry no meaning and are ignored.
            "y" => Ok(Rule::Yearly),
            "w" => {
                let Some(list) = operands.first() else {
                    return Err(CoreError::InvalidOperand(
                        "rule 'w' expects a weekday list".to_string(),
                    ));
                };
                let mut weekdays = Vec::new();
                for part in list.split(',') {
                    let weekday: u32 = part.parse().map_err(|_| {
                        CoreError::InvalidOperand(format!("weekday is not a number: {part:?}"))
                    })?;
                    if !(1..=7).contains(&weekday) {
                        return Err(CoreError::InvalidOperand(format!(
                            "weekday out of range 1..=7: {weekday}"
                        )));
                    }
                    weekdays.push(weekday);
                }
                Ok(Rule::Weekly { weekdays })
            }
            "m" => {
                let Some(day_list) = operands.first() else {
                    return Err(CoreError::InvalidOperand(
                        "rule 'm' expects a day-of-month list".to_string(),
                    ));
                };
                let mut days = Vec::new();
                for part in day_list.split(',') {
                    let day: i32 = part.parse().map_err(|_| {
                        CoreError::InvalidOperand(format!(
                            "day of month is not a number: {part:?}"
                        ))
                    })?;
                    if day == 0 || !(-2..=31).contains(&day) {
                        return Err(CoreError::InvalidOperand(format!(
                            "day of month out of range -2..=-1 or 1..=31: {day}"
                        )));
                    }
                    days.push(day);
                }
                let mut months = Vec::new();
                if let Some(month_list) = operands.get(1) {
                    for part in month_list.split(',') {
                        let month: u32 = part.parse().map_err(|_| {
                            CoreError::InvalidOperand(format!("month is not a number: {part:?}"))
                        })?;
                        if !(1..=12).contains(&month) {
                            return Err(CoreError::InvalidOperand(format!(
                                "month out of range 1..=12: {month}"
                            )));
                        }
                        months.push(month);
                    }
                }
                Ok(Rule::Monthly { days, months })
            }
            other => Err(CoreError::UnsupportedRule(other.to_string())),
        }
    }
}
