//! Quarter-hour boundary arithmetic.
//!
//! The generated page advertises when the next refresh is due. That value is
//! advisory only - nothing here feeds back into row selection, and the
//! resolver never calls this module.

use chrono::{Duration, NaiveDateTime, Timelike};

/// The next aligned quarter-hour boundary at or after `now`.
///
/// A `now` that already sits exactly on a boundary (minute divisible by 15,
/// zero seconds) is returned unchanged; otherwise the next boundary strictly
/// after `now`, rolling over hours and days as needed. Sub-second precision
/// is truncated.
#[must_use]
pub fn next_quarter_hour(now: NaiveDateTime) -> NaiveDateTime {
    let trimmed = now.with_nanosecond(0).unwrap_or(now);
    let into_block = i64::from((trimmed.minute() % 15) * 60 + trimmed.second());
    if into_block == 0 {
        return trimmed;
    }
    trimmed + Duration::seconds(900 - into_block)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 8)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn rounds_up_within_the_hour() {
        assert_eq!(next_quarter_hour(at(10, 7, 30)), at(10, 15, 0));
        assert_eq!(next_quarter_hour(at(10, 0, 1)), at(10, 15, 0));
        assert_eq!(next_quarter_hour(at(10, 44, 59)), at(10, 45, 0));
    }

    #[test]
    fn exact_boundary_is_unchanged() {
        assert_eq!(next_quarter_hour(at(10, 15, 0)), at(10, 15, 0));
        assert_eq!(next_quarter_hour(at(0, 0, 0)), at(0, 0, 0));
    }

    #[test]
    fn rolls_over_hour_and_day() {
        assert_eq!(next_quarter_hour(at(10, 50, 0)), at(11, 0, 0));
        let next = next_quarter_hour(at(23, 59, 0));
        assert_eq!(
            next,
            NaiveDate::from_ymd_opt(2024, 11, 9)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn sub_second_precision_is_truncated() {
        let now = at(10, 15, 0).with_nanosecond(250).unwrap();
        assert_eq!(next_quarter_hour(now), at(10, 15, 0));
    }
}
