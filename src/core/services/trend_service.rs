//! Trend analysis entry point over collaborator-provided history.

use crate::config::HOLIDAYS;
use crate::domain::CashflowData;
use crate::trend::{self, TrendReport};

use super::ServiceResult;

pub struct TrendService;

impl TrendService {
    /// Analyzes the data set's transaction history against the configured
    /// holiday table.
    pub fn analyze(data: &CashflowData) -> ServiceResult<TrendReport> {
        let report = trend::analyze(&data.history, &HOLIDAYS)?;
        tracing::info!(
            transactions = data.history.len(),
            direction = ?report.direction,
            "trend analysis served"
        );
        Ok(report)
    }
}
