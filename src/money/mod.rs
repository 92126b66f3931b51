//! Fixed-precision monetary value objects.
//!
//! Monetary amounts live in one of two precision domains: [`Money`] carries
//! two fractional digits and is used at every system boundary, while
//! [`CalcMoney`] carries four and is used for intermediate arithmetic so
//! that multi-step chains (ratios, averages, day-by-day accumulation) do not
//! compound display-level rounding error. [`Percentage`] is a four-digit
//! ratio used for weights, utilization, and confidence scores.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Fractional digits carried by display-domain amounts.
pub const DISPLAY_SCALE: u32 = 2;
/// Fractional digits carried by calculation-domain amounts.
pub const CALC_SCALE: u32 = 4;

fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// Rejects values with more than [`DISPLAY_SCALE`] fractional digits.
///
/// Applied at ingestion boundaries so that upstream data cannot smuggle
/// sub-cent precision into the engine.
pub fn validate_input_precision(value: Decimal) -> EngineResult<()> {
    if value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::ToZero) != value {
        return Err(EngineError::Precision {
            value,
            max: DISPLAY_SCALE,
        });
    }
    Ok(())
}

/// Display-domain monetary amount, always carrying exactly two fractional
/// digits. Immutable; every operation returns a new value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Rounds half-up to display precision.
    pub fn new(value: Decimal) -> Self {
        Self(round_half_up(value, DISPLAY_SCALE))
    }

    /// Validating constructor for ingestion boundaries. Fails if the value
    /// carries more than two fractional digits.
    pub fn try_new(value: Decimal) -> EngineResult<Self> {
        validate_input_precision(value)?;
        Ok(Self::new(value))
    }

    /// Builds a value from integer minor units (cents).
    pub fn from_minor_units(cents: i64) -> Self {
        Self(Decimal::new(cents, DISPLAY_SCALE))
    }

    /// The amount expressed in integer minor units (cents).
    pub fn minor_units(&self) -> i64 {
        self.0.mantissa() as i64
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn to_calc(&self) -> CalcMoney {
        CalcMoney::new(self.0)
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calculation-domain monetary amount carrying four fractional digits.
/// Arithmetic chains stay here until the final boundary conversion.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CalcMoney(Decimal);

impl CalcMoney {
    pub const ZERO: CalcMoney = CalcMoney(Decimal::ZERO);

    /// Rounds half-up to calculation precision.
    pub fn new(value: Decimal) -> Self {
        Self(round_half_up(value, CALC_SCALE))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Boundary conversion: rounds half-up to display precision.
    pub fn to_display(&self) -> Money {
        Money::new(self.0)
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for CalcMoney {
    type Output = CalcMoney;
    fn add(self, rhs: CalcMoney) -> CalcMoney {
        CalcMoney(self.0 + rhs.0)
    }
}

impl Sub for CalcMoney {
    type Output = CalcMoney;
    fn sub(self, rhs: CalcMoney) -> CalcMoney {
        CalcMoney(self.0 - rhs.0)
    }
}

impl Neg for CalcMoney {
    type Output = CalcMoney;
    fn neg(self) -> CalcMoney {
        CalcMoney(-self.0)
    }
}

impl AddAssign for CalcMoney {
    fn add_assign(&mut self, rhs: CalcMoney) {
        self.0 += rhs.0;
    }
}

impl SubAssign for CalcMoney {
    fn sub_assign(&mut self, rhs: CalcMoney) {
        self.0 -= rhs.0;
    }
}

impl Sum for CalcMoney {
    fn sum<I: Iterator<Item = CalcMoney>>(iter: I) -> CalcMoney {
        iter.fold(CalcMoney::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for CalcMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Four-digit fixed-point ratio, expected in `[0, 1]`. Participates in
/// different rounding rules than [`Money`]: four decimals always, never two.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(round_half_up(value, CALC_SCALE))
    }

    pub fn one() -> Self {
        Self::new(Decimal::ONE)
    }

    /// Converts percent points (`33.33`) into a ratio (`0.3333`).
    pub fn from_percent(points: Decimal) -> Self {
        Self::new(points / dec!(100))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// The ratio expressed in percent points, rounded to two digits.
    pub fn as_percent_points(&self) -> Decimal {
        (self.0 * dec!(100)).round_dp(2)
    }

    pub fn clamped(self, floor: Decimal, ceiling: Decimal) -> Self {
        Self(self.0.clamp(floor, ceiling))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
