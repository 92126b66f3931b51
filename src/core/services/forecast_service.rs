//! Forecast orchestration over collaborator-provided snapshots.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ForecastThresholds;
use crate::domain::{AccountSnapshot, BillOccurrence, CashflowData};
use crate::errors::EngineError;
use crate::forecast::{
    metrics, projector, DailyProjection, ForecastSummary, ForecastWindow, Scenario, WarningFlag,
};
use crate::money::{CalcMoney, Money, Percentage};
use crate::trend;

use super::{ServiceError, ServiceResult};

const HIGH_UTILIZATION_CUTOFF: Decimal = dec!(0.90);
const LOW_BALANCE_DAY_SHARE: Decimal = dec!(0.25);
const VOLATILITY_SHARE: Decimal = dec!(0.20);
const AGGREGATE_PENALTY: Decimal = dec!(0.10);

/// Aggregate statistics over one account's projection sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastStatistics {
    pub average_balance: CalcMoney,
    pub minimum_balance: CalcMoney,
    pub maximum_balance: CalcMoney,
    pub average_inflow: CalcMoney,
    pub average_outflow: CalcMoney,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_credit_utilization: Option<Percentage>,
    pub balance_volatility: CalcMoney,
}

/// Result of a single-account forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountForecastReport {
    pub account_id: Uuid,
    pub days: Vec<DailyProjection>,
    pub summary: ForecastSummary,
    pub statistics: ForecastStatistics,
    pub confidence: Percentage,
}

/// Adjustable parameters for a multi-account scenario forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomForecastParameters {
    /// Accounts to include; empty selects every account in the data set.
    pub account_ids: Vec<Uuid>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub scenario: Scenario,
    /// When present, only bills carrying one of these categories project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Per-month expense multipliers, keyed by calendar month (1-12).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seasonal_multipliers: BTreeMap<u32, Decimal>,
    pub include_pending: bool,
    pub include_recurring: bool,
    pub include_transfers: bool,
}

impl CustomForecastParameters {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            account_ids: Vec::new(),
            start,
            end,
            scenario: Scenario::Baseline,
            categories: None,
            seasonal_multipliers: BTreeMap::new(),
            include_pending: true,
            include_recurring: true,
            include_transfers: true,
        }
    }

    pub fn for_accounts(mut self, account_ids: Vec<Uuid>) -> Self {
        self.account_ids = account_ids;
        self
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_seasonal_multipliers(mut self, multipliers: BTreeMap<u32, Decimal>) -> Self {
        self.seasonal_multipliers = multipliers;
        self
    }
}

/// One aggregated day across every selected account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyResult {
    pub date: NaiveDate,
    pub income: Money,
    pub expenses: Money,
    pub balance: CalcMoney,
    pub confidence: Percentage,
}

/// Whole-window aggregates for a custom forecast.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomForecastStatistics {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_change: Money,
    pub minimum_balance: CalcMoney,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_balance_date: Option<NaiveDate>,
    pub maximum_balance: CalcMoney,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_balance_date: Option<NaiveDate>,
    pub average_daily_balance: CalcMoney,
}

/// Result of a multi-account scenario forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomForecastReport {
    pub days: Vec<DailyResult>,
    pub statistics: CustomForecastStatistics,
    pub confidence: Percentage,
}

pub struct ForecastService;

impl ForecastService {
    /// Projects one account across the window and derives summary metrics,
    /// aggregate statistics, and an overall confidence score.
    pub fn account_forecast(
        data: &CashflowData,
        window: &ForecastWindow,
        thresholds: &ForecastThresholds,
    ) -> ServiceResult<AccountForecastReport> {
        let account_id = window
            .account_ids
            .first()
            .copied()
            .ok_or_else(|| ServiceError::Invalid("Forecast window names no account".into()))?;
        let account = data
            .accounts
            .iter()
            .find(|account| account.id == account_id)
            .ok_or_else(|| ServiceError::Invalid("Account not found".into()))?;

        let days = projector::project_account(
            account,
            &data.bills,
            &data.incomes,
            &data.transfers,
            window,
            thresholds,
        );
        let summary = metrics::summarize(&days, Percentage::new(metrics::DEFAULT_NET_INCOME_RATE))?;
        let statistics = Self::statistics(account, &days, data);
        let confidence = Self::overall_confidence(account, &days, &statistics);
        tracing::info!(
            account = %account.id,
            days = days.len(),
            confidence = %confidence,
            "account forecast complete"
        );
        Ok(AccountForecastReport {
            account_id,
            days,
            summary,
            statistics,
            confidence,
        })
    }

    /// Projects every selected account simultaneously and aggregates the
    /// per-day income, expenses, and combined balance.
    pub fn custom_forecast(
        data: &CashflowData,
        params: &CustomForecastParameters,
        thresholds: &ForecastThresholds,
    ) -> ServiceResult<CustomForecastReport> {
        let selected: Vec<&AccountSnapshot> = data
            .accounts
            .iter()
            .filter(|account| {
                params.account_ids.is_empty() || params.account_ids.contains(&account.id)
            })
            .collect();
        if selected.is_empty() {
            return Err(EngineError::NoAccounts.into());
        }

        let bills = Self::filter_bills(&data.bills, params.categories.as_deref());
        let per_account: Vec<Vec<DailyProjection>> = selected
            .iter()
            .map(|account| {
                let mut window = ForecastWindow::new(account.id, params.start, params.end)
                    .with_scenario(params.scenario)
                    .with_seasonal_multipliers(params.seasonal_multipliers.clone());
                window.include_pending = params.include_pending;
                window.include_recurring = params.include_recurring;
                window.include_transfers = params.include_transfers;
                projector::project_account(
                    account,
                    &bills,
                    &data.incomes,
                    &data.transfers,
                    &window,
                    thresholds,
                )
            })
            .collect();

        let span = per_account.first().map_or(0, Vec::len);
        let mut days = Vec::with_capacity(span);
        let mut statistics = CustomForecastStatistics::default();
        let mut balance_total = Decimal::ZERO;

        for index in 0..span {
            let mut income = Money::ZERO;
            let mut expenses = Money::ZERO;
            let mut balance = CalcMoney::ZERO;
            let mut confidence_sum = Decimal::ZERO;
            let date = per_account[0][index].date;
            for projection in per_account.iter().map(|days| &days[index]) {
                income += projection.inflow;
                expenses += projection.outflow;
                balance += projection.balance;
                confidence_sum += projection.confidence.as_decimal();
            }
            let confidence =
                Percentage::new(confidence_sum / Decimal::from(per_account.len() as u64));

            if days.is_empty() || balance < statistics.minimum_balance {
                statistics.minimum_balance = balance;
                statistics.minimum_balance_date = Some(date);
            }
            if days.is_empty() || balance > statistics.maximum_balance {
                statistics.maximum_balance = balance;
                statistics.maximum_balance_date = Some(date);
            }
            statistics.total_income += income;
            statistics.total_expenses += expenses;
            balance_total += balance.as_decimal();

            days.push(DailyResult {
                date,
                income,
                expenses,
                balance,
                confidence,
            });
        }

        statistics.net_change = statistics.total_income - statistics.total_expenses;
        if !days.is_empty() {
            statistics.average_daily_balance =
                CalcMoney::new(balance_total / Decimal::from(days.len() as u64));
        }

        let confidence = Self::mean_confidence(days.iter().map(|day| day.confidence));
        tracing::info!(
            accounts = selected.len(),
            days = days.len(),
            scenario = ?params.scenario,
            "custom forecast complete"
        );
        Ok(CustomForecastReport {
            days,
            statistics,
            confidence,
        })
    }

    fn filter_bills(bills: &[BillOccurrence], categories: Option<&[String]>) -> Vec<BillOccurrence> {
        match categories {
            Some(wanted) => bills
                .iter()
                .filter(|bill| {
                    bill.category
                        .as_ref()
                        .map_or(false, |category| wanted.contains(category))
                })
                .cloned()
                .collect(),
            None => bills.to_vec(),
        }
    }

    fn statistics(
        account: &AccountSnapshot,
        days: &[DailyProjection],
        data: &CashflowData,
    ) -> ForecastStatistics {
        if days.is_empty() {
            return ForecastStatistics::default();
        }
        let count = Decimal::from(days.len() as u64);
        let balances: Vec<Decimal> = days.iter().map(|day| day.balance.as_decimal()).collect();
        let average_balance = balances.iter().copied().sum::<Decimal>() / count;
        let average_inflow =
            days.iter().map(|day| day.inflow.as_decimal()).sum::<Decimal>() / count;
        let average_outflow =
            days.iter().map(|day| day.outflow.as_decimal()).sum::<Decimal>() / count;

        // Historical volatility wins over projected volatility when a
        // transaction history exists.
        let balance_volatility = if data.history.is_empty() {
            CalcMoney::new(sample_std_dev(&balances))
        } else {
            trend::daily_volatility(&data.history)
        };

        ForecastStatistics {
            average_balance: CalcMoney::new(average_balance),
            minimum_balance: days
                .iter()
                .map(|day| day.balance)
                .min()
                .unwrap_or(CalcMoney::ZERO),
            maximum_balance: days
                .iter()
                .map(|day| day.balance)
                .max()
                .unwrap_or(CalcMoney::ZERO),
            average_inflow: CalcMoney::new(average_inflow),
            average_outflow: CalcMoney::new(average_outflow),
            peak_credit_utilization: projector::peak_utilization(account, days)
                .map(Percentage::new),
            balance_volatility,
        }
    }

    fn overall_confidence(
        account: &AccountSnapshot,
        days: &[DailyProjection],
        statistics: &ForecastStatistics,
    ) -> Percentage {
        if days.is_empty() {
            return Percentage::new(metrics::CONFIDENCE_FLOOR);
        }
        let mut score = days
            .iter()
            .map(|day| day.confidence.as_decimal())
            .sum::<Decimal>()
            / Decimal::from(days.len() as u64);

        let over_utilized = statistics
            .peak_credit_utilization
            .map_or(false, |peak| peak.as_decimal() > HIGH_UTILIZATION_CUTOFF);
        if over_utilized {
            score -= AGGREGATE_PENALTY;
        }
        if account.kind.is_depository() {
            let low_days = days
                .iter()
                .filter(|day| day.warnings.contains(&WarningFlag::LowBalance))
                .count();
            let share = Decimal::from(low_days as u64) / Decimal::from(days.len() as u64);
            if share > LOW_BALANCE_DAY_SHARE {
                score -= AGGREGATE_PENALTY;
            }
        }
        let volatility_cap = statistics.average_balance.as_decimal().abs() * VOLATILITY_SHARE;
        if statistics.balance_volatility.as_decimal() > volatility_cap {
            score -= AGGREGATE_PENALTY;
        }
        Percentage::new(score).clamped(metrics::CONFIDENCE_FLOOR, metrics::CONFIDENCE_CEILING)
    }

    fn mean_confidence(values: impl Iterator<Item = Percentage>) -> Percentage {
        let collected: Vec<Decimal> = values.map(|value| value.as_decimal()).collect();
        if collected.is_empty() {
            return Percentage::new(metrics::CONFIDENCE_FLOOR);
        }
        let mean = collected.iter().copied().sum::<Decimal>()
            / Decimal::from(collected.len() as u64);
        Percentage::new(mean).clamped(metrics::CONFIDENCE_FLOOR, metrics::CONFIDENCE_CEILING)
    }
}

fn sample_std_dev(values: &[Decimal]) -> Decimal {
    use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let mean = values.iter().copied().sum::<Decimal>() / Decimal::from(values.len() as u64);
    let variance = values
        .iter()
        .map(|value| (*value - mean) * (*value - mean))
        .sum::<Decimal>()
        / Decimal::from(values.len() as u64 - 1);
    variance
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}
