//! Bill-splitting entry points.

use crate::distribution;
use crate::money::{Money, Percentage};

use super::ServiceResult;

pub struct SplitService;

impl SplitService {
    /// Splits a bill total into equal shares that sum exactly to the total.
    pub fn equal(total: Money, parts: usize) -> ServiceResult<Vec<Money>> {
        Ok(distribution::equal_split(total, parts)?)
    }

    /// Splits a bill total proportionally to the given weights.
    pub fn weighted(total: Money, weights: &[Percentage]) -> ServiceResult<Vec<Money>> {
        Ok(distribution::weighted_split(total, weights)?)
    }
}
