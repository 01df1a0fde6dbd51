//! The 8-digit `YYYYMMDD` date format used on the wire and in storage.
//!
//! Dates are whole calendar days with no time-of-day component, so they are
//! represented as [`NaiveDate`] throughout; two moments on the same day are
//! equal by construction.

use chrono::NaiveDate;

use crate::error::CoreError;

/// chrono format string for the canonical 8-digit form.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Parses an 8-digit `YYYYMMDD` string into a calendar day.
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| CoreError::InvalidStartDate(s.to_string()))
}

/// Formats a calendar day back into its canonical 8-digit form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_canonical_form() {
        let date = parse_date("20240229").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "2024", "2024-01-01", "20240230", "20241301", "abcdefgh"] {
            assert!(
                matches!(parse_date(input), Err(CoreError::InvalidStartDate(_))),
                "expected {input:?} to be rejected"
            );
        }
    }

    proptest! {
        // Formatting a date and re-parsing it yields the identical date.
        #[test]
        fn round_trips(days in 0i64..200_000) {
            let date = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap()
                + chrono::Duration::days(days);
            prop_assert_eq!(parse_date(&format_date(date)).unwrap(), date);
        }
    }
}
