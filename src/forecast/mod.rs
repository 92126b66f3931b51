//! Balance projection over a date window.
//!
//! [`projector`] walks the window day by day accumulating line items into a
//! balance trajectory; [`metrics`] derives the deficit/required-income chain
//! and per-day confidence from the result.

pub mod metrics;
pub mod projector;
pub mod schedule;

pub use metrics::ForecastSummary;
pub use projector::project_account;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{CalcMoney, Money, Percentage};

/// Enumerated risk conditions attached to a projected day. Declaration
/// order is the canonical penalty order used by the confidence score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WarningFlag {
    InsufficientFunds,
    LowBalance,
    HighCreditUtilization,
    LargeOutflow,
    ApproachingThreshold,
}

/// Multiplicative adjustment applied to projected income and expense
/// streams to model best/worst-case forecasts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scenario {
    #[default]
    Baseline,
    Optimistic,
    Pessimistic,
}

impl Scenario {
    pub fn income_multiplier(&self) -> Decimal {
        match self {
            Scenario::Baseline => Decimal::ONE,
            Scenario::Optimistic => dec!(1.1),
            Scenario::Pessimistic => dec!(0.9),
        }
    }

    pub fn expense_multiplier(&self) -> Decimal {
        match self {
            Scenario::Baseline => Decimal::ONE,
            Scenario::Optimistic => dec!(0.9),
            Scenario::Pessimistic => dec!(1.1),
        }
    }
}

/// Immutable description of one forecast request: the accounts, the date
/// range, and which item classes participate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastWindow {
    pub account_ids: Vec<Uuid>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub include_pending: bool,
    pub include_recurring: bool,
    pub include_transfers: bool,
    pub scenario: Scenario,
    /// Optional per-month multipliers applied to expense items, keyed by
    /// calendar month (1-12).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seasonal_multipliers: BTreeMap<u32, Decimal>,
}

impl ForecastWindow {
    pub fn new(account_id: Uuid, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            account_ids: vec![account_id],
            start,
            end,
            include_pending: true,
            include_recurring: true,
            include_transfers: true,
            scenario: Scenario::Baseline,
            seasonal_multipliers: BTreeMap::new(),
        }
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn without_pending(mut self) -> Self {
        self.include_pending = false;
        self
    }

    pub fn without_recurring(mut self) -> Self {
        self.include_recurring = false;
        self
    }

    pub fn without_transfers(mut self) -> Self {
        self.include_transfers = false;
        self
    }

    pub fn with_seasonal_multipliers(mut self, multipliers: BTreeMap<u32, Decimal>) -> Self {
        self.seasonal_multipliers = multipliers;
        self
    }

    /// Number of days covered, inclusive of both endpoints.
    pub fn days(&self) -> u32 {
        if self.end < self.start {
            return 0;
        }
        ((self.end - self.start).num_days() + 1) as u32
    }
}

/// Classifies a projected line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineItemKind {
    Bill,
    RecurringBill,
    Income,
    TransferIn,
    TransferOut,
}

impl LineItemKind {
    pub fn is_inflow(&self) -> bool {
        matches!(self, LineItemKind::Income | LineItemKind::TransferIn)
    }
}

/// One contributing item on a projected day, carrying its scenario-adjusted
/// display amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub kind: LineItemKind,
    pub label: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One projected day for one account. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyProjection {
    pub date: NaiveDate,
    pub balance: CalcMoney,
    pub inflow: Money,
    pub outflow: Money,
    pub confidence: Percentage,
    pub warnings: BTreeSet<WarningFlag>,
    pub line_items: Vec<LineItem>,
}
