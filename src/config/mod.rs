//! Process-wide read-only configuration: warning thresholds and the
//! holiday table. Both are initialized once and never mutated.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::money::{Money, Percentage};

/// Thresholds evaluated against each projected day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastThresholds {
    /// Balances below this raise a low-balance warning.
    pub low_balance: Money,
    /// Credit accounts projected above this utilization raise a warning.
    pub high_credit_utilization: Percentage,
    /// Single-day outflows above this raise a large-outflow warning.
    pub large_outflow: Money,
    /// Balances under `low_balance * approaching_multiplier` (but not yet
    /// low) raise an approaching-threshold warning.
    pub approaching_multiplier: Decimal,
}

impl Default for ForecastThresholds {
    fn default() -> Self {
        Self {
            low_balance: Money::new(dec!(100.00)),
            high_credit_utilization: Percentage::new(dec!(0.80)),
            large_outflow: Money::new(dec!(1000.00)),
            approaching_multiplier: dec!(1.5),
        }
    }
}

/// A holiday whose concrete date is recomputed per calendar year.
#[derive(Debug, Clone, Copy)]
pub struct Holiday {
    pub name: &'static str,
    rule: HolidayRule,
}

#[derive(Debug, Clone, Copy)]
enum HolidayRule {
    Fixed { month: u32, day: u32 },
    NthWeekday { month: u32, weekday: Weekday, nth: u32 },
    LastWeekday { month: u32, weekday: Weekday },
}

impl Holiday {
    /// The holiday's date in the given calendar year.
    pub fn date_in(&self, year: i32) -> NaiveDate {
        match self.rule {
            HolidayRule::Fixed { month, day } => {
                NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
            }
            HolidayRule::NthWeekday {
                month,
                weekday,
                nth,
            } => nth_weekday_of_month(year, month, weekday, nth),
            HolidayRule::LastWeekday { month, weekday } => {
                last_weekday_of_month(year, month, weekday)
            }
        }
    }
}

/// Holidays observed for spending-proximity analysis.
pub static HOLIDAYS: Lazy<Vec<Holiday>> = Lazy::new(|| {
    vec![
        Holiday {
            name: "New Year's Day",
            rule: HolidayRule::Fixed { month: 1, day: 1 },
        },
        Holiday {
            name: "Memorial Day",
            rule: HolidayRule::LastWeekday {
                month: 5,
                weekday: Weekday::Mon,
            },
        },
        Holiday {
            name: "Independence Day",
            rule: HolidayRule::Fixed { month: 7, day: 4 },
        },
        Holiday {
            name: "Labor Day",
            rule: HolidayRule::NthWeekday {
                month: 9,
                weekday: Weekday::Mon,
                nth: 1,
            },
        },
        Holiday {
            name: "Thanksgiving",
            rule: HolidayRule::NthWeekday {
                month: 11,
                weekday: Weekday::Thu,
                nth: 4,
            },
        },
        Holiday {
            name: "Christmas Day",
            rule: HolidayRule::Fixed {
                month: 12,
                day: 25,
            },
        },
    ]
});

/// Resolved holiday dates for one calendar year.
pub fn holidays_for_year(year: i32) -> Vec<(&'static str, NaiveDate)> {
    HOLIDAYS
        .iter()
        .map(|holiday| (holiday.name, holiday.date_in(year)))
        .collect()
}

fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default();
    let offset = (weekday.num_days_from_monday() + 7 - first.weekday().num_days_from_monday()) % 7;
    first + Duration::days(offset as i64 + 7 * (nth as i64 - 1))
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> NaiveDate {
    let last = last_day_of_month(year, month);
    let back = (last.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    last - Duration::days(back as i64)
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or_default()
}
