use rust_decimal::Decimal;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Error type that captures invalid inputs to the forecasting and
/// distribution engine. None of these conditions are transient; callers
/// must correct the input and resubmit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Value {value} carries more than {max} fractional digits")]
    Precision { value: Decimal, max: u32 },
    #[error("Invalid distribution: {0}")]
    Distribution(String),
    #[error("Weights sum to {actual}% instead of 100%")]
    WeightSum { actual: Decimal },
    #[error("Invalid divisor: {0}")]
    Division(String),
    #[error("Trend analysis requires at least one transaction")]
    InsufficientData,
    #[error("Forecast resolved to zero accounts")]
    NoAccounts,
}
