#![doc(test(attr(deny(warnings))))]

//! Cashflow Core offers cashflow forecasting, exact-money distribution,
//! and trend-analysis primitives that power bills-and-cashflow workflows.
//!
//! Monetary values live in two fixed-precision domains (two display
//! digits at boundaries, four calculation digits in between), totals are
//! distributed without losing cents, and account balances are projected
//! day by day from known and recurring obligations.

pub mod config;
pub mod core;
pub mod distribution;
pub mod domain;
pub mod errors;
pub mod forecast;
pub mod money;
pub mod trend;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cashflow Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
