//! Deficit and confidence calculations derived from balance projections.
//!
//! Every function here is pure: no state, no side effects, fully
//! recomputed on each call.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::AccountKind;
use crate::errors::{EngineError, EngineResult};
use crate::forecast::{DailyProjection, WarningFlag};
use crate::money::{CalcMoney, Money, Percentage};

/// Default net-of-tax income rate: a 20% effective tax burden means 80% of
/// gross income is available. A parameter, not a hard-coded business rule.
pub const DEFAULT_NET_INCOME_RATE: Decimal = dec!(0.80);

/// Confidence scores never leave this band.
pub const CONFIDENCE_FLOOR: Decimal = dec!(0.1);
pub const CONFIDENCE_CEILING: Decimal = dec!(1.0);

const BASE_CONFIDENCE: Decimal = dec!(0.9);
const CREDIT_KIND_PENALTY: Decimal = dec!(0.05);
const BUSY_DAY_PENALTY: Decimal = dec!(0.05);
const BUSY_DAY_ITEMS: usize = 5;

/// Metrics chain derived from a projection's minimum balance: how much is
/// missing, and what income would cover it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ForecastSummary {
    pub required_funds: Money,
    pub daily_deficit: CalcMoney,
    pub yearly_deficit: CalcMoney,
    pub required_gross_income: CalcMoney,
    pub hourly_rate_20: CalcMoney,
    pub hourly_rate_30: CalcMoney,
    pub hourly_rate_40: CalcMoney,
}

/// Average daily shortfall needed to keep the balance at zero: `0` when the
/// minimum balance is non-negative, else `|min| / days`.
pub fn daily_deficit(min_balance: CalcMoney, days: u32) -> EngineResult<CalcMoney> {
    if days == 0 {
        return Err(EngineError::Division(
            "projection span must cover at least one day".into(),
        ));
    }
    if !min_balance.is_negative() {
        return Ok(CalcMoney::ZERO);
    }
    Ok(CalcMoney::new(
        min_balance.as_decimal().abs() / Decimal::from(days),
    ))
}

pub fn yearly_deficit(daily: CalcMoney) -> CalcMoney {
    CalcMoney::new(daily.as_decimal() * dec!(365))
}

/// Gross income needed to cover a yearly deficit after taxes.
pub fn required_income(yearly_deficit: CalcMoney, net_rate: Percentage) -> EngineResult<CalcMoney> {
    if net_rate.as_decimal() <= Decimal::ZERO {
        return Err(EngineError::Division(
            "net income rate must be positive".into(),
        ));
    }
    Ok(CalcMoney::new(
        yearly_deficit.as_decimal() / net_rate.as_decimal(),
    ))
}

pub fn hourly_rate(required_income: CalcMoney, hours_per_week: u32) -> EngineResult<CalcMoney> {
    if hours_per_week == 0 {
        return Err(EngineError::Division(
            "hours per week must be positive".into(),
        ));
    }
    Ok(CalcMoney::new(
        required_income.as_decimal() / dec!(52) / Decimal::from(hours_per_week),
    ))
}

/// Bounded self-assessment of one projected day.
///
/// Starts at 0.9 and subtracts a fixed penalty per warning flag, then the
/// account-kind penalty, then the transaction-volume penalty, clamping to
/// `[0.1, 1.0]` last. Each deduction is individually inspectable, which is
/// the point of the additive model.
pub fn day_confidence(
    warnings: &BTreeSet<WarningFlag>,
    kind: AccountKind,
    item_count: usize,
) -> Percentage {
    let mut score = BASE_CONFIDENCE;
    for flag in warnings {
        score -= flag_penalty(*flag);
    }
    if kind == AccountKind::Credit {
        score -= CREDIT_KIND_PENALTY;
    }
    if item_count > BUSY_DAY_ITEMS {
        score -= BUSY_DAY_PENALTY;
    }
    Percentage::new(score).clamped(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}

fn flag_penalty(flag: WarningFlag) -> Decimal {
    match flag {
        WarningFlag::InsufficientFunds => dec!(0.25),
        WarningFlag::LowBalance => dec!(0.20),
        WarningFlag::HighCreditUtilization => dec!(0.15),
        WarningFlag::LargeOutflow => dec!(0.10),
        WarningFlag::ApproachingThreshold => dec!(0.05),
    }
}

/// Derives the full metrics chain from a projection sequence. An empty
/// sequence yields a zeroed summary rather than an error: there is nothing
/// to be short of.
pub fn summarize(days: &[DailyProjection], net_rate: Percentage) -> EngineResult<ForecastSummary> {
    let min_balance = match days.iter().map(|day| day.balance).min() {
        Some(balance) => balance,
        None => return Ok(ForecastSummary::default()),
    };
    let daily = daily_deficit(min_balance, days.len() as u32)?;
    let yearly = yearly_deficit(daily);
    let required = required_income(yearly, net_rate)?;
    let required_funds = if min_balance.is_negative() {
        min_balance.abs().to_display()
    } else {
        Money::ZERO
    };
    Ok(ForecastSummary {
        required_funds,
        daily_deficit: daily,
        yearly_deficit: yearly,
        required_gross_income: required,
        hourly_rate_20: hourly_rate(required, 20)?,
        hourly_rate_30: hourly_rate(required, 30)?,
        hourly_rate_40: hourly_rate(required, 40)?,
    })
}
