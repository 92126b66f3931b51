//! Trend and seasonality analysis over historical transactions.
//!
//! A [`TrendReport`] is built once from a transaction batch and read-only
//! thereafter. Analysis of an empty batch is an error, never a default
//! trend: zero samples cannot support a direction claim.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::Holiday;
use crate::domain::HistoricalTransaction;
use crate::errors::{EngineError, EngineResult};
use crate::money::{CalcMoney, Percentage};

const STABLE_STRENGTH: Decimal = dec!(0.3);
const HOLIDAY_PROXIMITY_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Signed-amount sums bucketed by calendar period, plus holiday-proximity
/// totals and an overall seasonality strength.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalFactors {
    /// Keyed by calendar month, 1-12.
    pub monthly: BTreeMap<u32, CalcMoney>,
    /// Keyed by weekday, 0-6 with Monday as 0.
    pub weekday: BTreeMap<u32, CalcMoney>,
    /// Keyed by day of month, 1-31; only observed days appear.
    pub day_of_month: BTreeMap<u32, CalcMoney>,
    /// Totals for transactions within ±7 days of each configured holiday.
    pub holiday_proximity: BTreeMap<String, CalcMoney>,
    pub strength: Percentage,
}

/// Aggregate trend over a historical transaction batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub average_daily_change: CalcMoney,
    pub volatility: CalcMoney,
    pub direction: TrendDirection,
    pub strength: Percentage,
    pub seasonal: SeasonalFactors,
    pub confidence: Percentage,
}

/// Builds a [`TrendReport`] from a historical batch.
pub fn analyze(
    transactions: &[HistoricalTransaction],
    holidays: &[Holiday],
) -> EngineResult<TrendReport> {
    if transactions.is_empty() {
        return Err(EngineError::InsufficientData);
    }
    let mut sorted: Vec<&HistoricalTransaction> = transactions.iter().collect();
    sorted.sort_by_key(|txn| txn.date);

    let changes = daily_net_changes(&sorted);
    let mean = mean(&changes);
    let volatility = sample_std_dev(&changes);
    let (direction, strength) = direction_and_strength(&sorted, volatility);
    let seasonal = seasonal_factors(&sorted, holidays);
    let confidence = confidence(sorted.len(), mean, volatility);

    tracing::debug!(
        transactions = sorted.len(),
        ?direction,
        "trend analysis complete"
    );
    Ok(TrendReport {
        average_daily_change: CalcMoney::new(mean),
        volatility: CalcMoney::new(volatility),
        direction,
        strength: Percentage::new(strength),
        seasonal,
        confidence: Percentage::new(confidence),
    })
}

/// Sample standard deviation of per-day net changes. Exposed for the
/// orchestrator, which prefers historical volatility over projected
/// volatility when a history exists.
pub fn daily_volatility(transactions: &[HistoricalTransaction]) -> CalcMoney {
    let mut sorted: Vec<&HistoricalTransaction> = transactions.iter().collect();
    sorted.sort_by_key(|txn| txn.date);
    CalcMoney::new(sample_std_dev(&daily_net_changes(&sorted)))
}

fn daily_net_changes(sorted: &[&HistoricalTransaction]) -> Vec<Decimal> {
    let mut per_day: BTreeMap<chrono::NaiveDate, Decimal> = BTreeMap::new();
    for txn in sorted {
        *per_day.entry(txn.date).or_default() += txn.amount.as_decimal();
    }
    per_day.into_values().collect()
}

fn direction_and_strength(
    sorted: &[&HistoricalTransaction],
    volatility: Decimal,
) -> (TrendDirection, Decimal) {
    let quartile = (sorted.len() / 4).max(1);
    let first: Decimal = sorted[..quartile]
        .iter()
        .map(|txn| txn.amount.as_decimal())
        .sum::<Decimal>()
        / Decimal::from(quartile as u64);
    let last: Decimal = sorted[sorted.len() - quartile..]
        .iter()
        .map(|txn| txn.amount.as_decimal())
        .sum::<Decimal>()
        / Decimal::from(quartile as u64);
    let diff = last - first;

    if diff.is_zero() || diff.abs() < volatility {
        return (TrendDirection::Stable, STABLE_STRENGTH);
    }
    let direction = if diff > Decimal::ZERO {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };
    let strength = if volatility.is_zero() {
        Decimal::ONE
    } else {
        (diff.abs() / (volatility * dec!(10))).min(Decimal::ONE)
    };
    (direction, strength)
}

fn seasonal_factors(sorted: &[&HistoricalTransaction], holidays: &[Holiday]) -> SeasonalFactors {
    let mut monthly: BTreeMap<u32, Decimal> = (1..=12).map(|month| (month, Decimal::ZERO)).collect();
    let mut weekday: BTreeMap<u32, Decimal> = (0..7).map(|day| (day, Decimal::ZERO)).collect();
    let mut day_of_month: BTreeMap<u32, Decimal> = BTreeMap::new();
    let mut holiday_proximity: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut total_volume = Decimal::ZERO;

    for txn in sorted {
        let amount = txn.amount.as_decimal();
        total_volume += amount.abs();
        *monthly.entry(txn.date.month()).or_default() += amount;
        *weekday
            .entry(txn.date.weekday().num_days_from_monday())
            .or_default() += amount;
        *day_of_month.entry(txn.date.day()).or_default() += amount;

        for holiday in holidays {
            let year = txn.date.year();
            let near = [year - 1, year, year + 1].into_iter().any(|candidate| {
                let observed = holiday.date_in(candidate);
                (txn.date - observed).num_days().abs() <= HOLIDAY_PROXIMITY_DAYS
            });
            if near {
                *holiday_proximity
                    .entry(holiday.name.to_string())
                    .or_default() += amount;
            }
        }
    }

    let strength = if total_volume.is_zero() {
        Decimal::ZERO
    } else {
        let monthly_values: Vec<Decimal> = monthly.values().copied().collect();
        let weekday_values: Vec<Decimal> = weekday.values().copied().collect();
        let spread = population_variance(&monthly_values).max(population_variance(&weekday_values));
        (spread / (total_volume / dec!(12))).min(Decimal::ONE)
    };

    SeasonalFactors {
        monthly: to_calc_map(monthly),
        weekday: to_calc_map(weekday),
        day_of_month: to_calc_map(day_of_month),
        holiday_proximity: holiday_proximity
            .into_iter()
            .map(|(name, sum)| (name, CalcMoney::new(sum)))
            .collect(),
        strength: Percentage::new(strength),
    }
}

fn confidence(count: usize, mean: Decimal, volatility: Decimal) -> Decimal {
    let count_bonus = (Decimal::from(count as u64) / dec!(10)).min(dec!(0.2));
    let volatility_bonus = if mean.is_zero() {
        Decimal::ZERO
    } else {
        dec!(0.1) * (Decimal::ONE - (volatility / mean.abs()).min(Decimal::ONE))
    };
    (dec!(0.7) + count_bonus + volatility_bonus)
        .max(dec!(0.1))
        .min(Decimal::ONE)
}

fn to_calc_map(map: BTreeMap<u32, Decimal>) -> BTreeMap<u32, CalcMoney> {
    map.into_iter()
        .map(|(key, sum)| (key, CalcMoney::new(sum)))
        .collect()
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len() as u64)
}

fn population_variance(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let center = mean(values);
    values
        .iter()
        .map(|value| (*value - center) * (*value - center))
        .sum::<Decimal>()
        / Decimal::from(values.len() as u64)
}

fn sample_std_dev(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let center = mean(values);
    let variance = values
        .iter()
        .map(|value| (*value - center) * (*value - center))
        .sum::<Decimal>()
        / Decimal::from(values.len() as u64 - 1);
    variance
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}
