//! Calendar stepping for monthly recurring obligations.
//!
//! Each recurrence step advances by one calendar month with explicit
//! month/year rollover (month 12 wraps to month 1 of the next year) and a
//! day-of-month clamp for shorter months. Occurrence dates are always
//! derived from the series anchor, so a clamped February date does not
//! drift the rest of the series.

use chrono::{Datelike, NaiveDate};

/// Date of the `steps`-th monthly occurrence after `anchor`.
pub fn add_months(anchor: NaiveDate, steps: u32) -> NaiveDate {
    let mut year = anchor.year();
    let mut month = anchor.month() as i32 + steps as i32;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    let month = month as u32;
    let day = anchor.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(anchor)
}

/// Whole calendar months between `anchor` and `target`, clamped at zero.
/// Used to fast-forward a series whose anchor predates the window.
pub fn months_until(anchor: NaiveDate, target: NaiveDate) -> u32 {
    let span = (target.year() - anchor.year()) * 12 + target.month() as i32
        - anchor.month() as i32;
    span.max(0) as u32
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn december_rolls_over_to_january() {
        assert_eq!(add_months(date(2024, 12, 15), 1), date(2025, 1, 15));
        assert_eq!(add_months(date(2024, 11, 30), 3), date(2025, 2, 28));
    }

    #[test]
    fn day_of_month_clamps_without_drift() {
        let anchor = date(2024, 1, 31);
        assert_eq!(add_months(anchor, 1), date(2024, 2, 29));
        // March occurrence is derived from the anchor, not from February.
        assert_eq!(add_months(anchor, 2), date(2024, 3, 31));
    }

    #[test]
    fn months_until_fast_forwards_old_anchors() {
        assert_eq!(months_until(date(2023, 5, 10), date(2024, 5, 1)), 12);
        assert_eq!(months_until(date(2024, 5, 10), date(2024, 5, 1)), 0);
        assert_eq!(months_until(date(2024, 6, 1), date(2024, 5, 1)), 0);
    }
}
