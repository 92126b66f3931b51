//! Exact-sum distribution of monetary totals.
//!
//! Both splitters guarantee that the returned parts sum bit-for-bit to the
//! input total, using the largest-remainder method: each raw share is
//! truncated to minor units, then the leftover cents are handed out to the
//! shares with the largest truncated remainder. Ordering is deterministic
//! (ties broken by first-seen index) so results are reproducible.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::errors::{EngineError, EngineResult};
use crate::money::{Money, Percentage, DISPLAY_SCALE};

/// Weight sums further than this from 100% are rejected.
pub const WEIGHT_SUM_EPSILON: Decimal = dec!(0.0001);

/// Splits `total` into `parts` equal shares.
///
/// The remainder in minor units goes to the first `remainder` shares, so
/// `equal_split($100.00, 3)` yields `[$33.34, $33.33, $33.33]`. The
/// algorithm is sign-agnostic: negative totals mirror positive ones.
pub fn equal_split(total: Money, parts: usize) -> EngineResult<Vec<Money>> {
    if parts == 0 {
        return Err(EngineError::Distribution(
            "part count must be at least one".into(),
        ));
    }
    let cents = total.minor_units() as i128;
    let count = parts as i128;
    let base = cents / count;
    let remainder = cents - base * count;
    let step = remainder.signum();
    let extras = remainder.unsigned_abs() as usize;

    let mut shares = Vec::with_capacity(parts);
    for index in 0..parts {
        let adjust = if index < extras { step } else { 0 };
        shares.push(Money::from_minor_units((base + adjust) as i64));
    }
    Ok(shares)
}

/// Splits `total` proportionally to `weights`.
///
/// Weights must sum to 100% within [`WEIGHT_SUM_EPSILON`]; a malformed
/// weight list is never silently treated as an equal split. Raw shares are
/// computed at full precision; the residual left by truncation is
/// redistributed one minor unit at a time by largest remainder.
pub fn weighted_split(total: Money, weights: &[Percentage]) -> EngineResult<Vec<Money>> {
    if weights.is_empty() {
        return Err(EngineError::Distribution("weight list is empty".into()));
    }
    let sum: Decimal = weights.iter().map(|w| w.as_decimal()).sum();
    if (sum - Decimal::ONE).abs() >= WEIGHT_SUM_EPSILON {
        return Err(EngineError::WeightSum {
            actual: (sum * dec!(100)).round_dp(2),
        });
    }

    let mut truncated = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for weight in weights {
        let raw = total.as_decimal() * weight.as_decimal();
        let share = raw.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::ToZero);
        remainders.push((raw - share).abs());
        truncated.push(Money::new(share));
    }

    let allocated: Money = truncated.iter().copied().sum();
    let residual_cents = total.minor_units() - allocated.minor_units();
    if residual_cents != 0 {
        let step = Money::from_minor_units(residual_cents.signum());
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));
        for index in 0..residual_cents.unsigned_abs() as usize {
            truncated[order[index % order.len()]] += step;
        }
    }
    Ok(truncated)
}
