pub mod forecast_service;
pub mod split_service;
pub mod trend_service;

pub use forecast_service::{
    AccountForecastReport, CustomForecastParameters, CustomForecastReport,
    CustomForecastStatistics, DailyResult, ForecastService, ForecastStatistics,
};
pub use split_service::SplitService;
pub use trend_service::TrendService;

use crate::errors::EngineError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0}")]
    Invalid(String),
}
