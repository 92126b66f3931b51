use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

/// A bill due against an account, either a one-off occurrence or the anchor
/// of a monthly recurring series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillOccurrence {
    pub account_id: Uuid,
    pub name: String,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub recurring: bool,
    pub status: BillStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl BillOccurrence {
    pub fn new(
        account_id: Uuid,
        name: impl Into<String>,
        due_date: NaiveDate,
        amount: Money,
    ) -> Self {
        Self {
            account_id,
            name: name.into(),
            due_date,
            amount,
            recurring: false,
            status: BillStatus::Pending,
            category: None,
        }
    }

    /// Marks the bill as the anchor of a monthly recurring series.
    pub fn recurring_monthly(mut self) -> Self {
        self.recurring = true;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillStatus {
    Pending,
    Paid,
}

/// An expected income deposit for an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeOccurrence {
    pub account_id: Uuid,
    pub source: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub status: IncomeStatus,
}

impl IncomeOccurrence {
    pub fn new(
        account_id: Uuid,
        source: impl Into<String>,
        date: NaiveDate,
        amount: Money,
    ) -> Self {
        Self {
            account_id,
            source: source.into(),
            date,
            amount,
            status: IncomeStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IncomeStatus {
    Pending,
    Deposited,
}

/// A scheduled movement between two accounts. Transfers are balance-neutral
/// across the ledger but shift funds between projections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferOccurrence {
    pub from_account: Uuid,
    pub to_account: Uuid,
    pub date: NaiveDate,
    pub amount: Money,
}

impl TransferOccurrence {
    pub fn new(from_account: Uuid, to_account: Uuid, date: NaiveDate, amount: Money) -> Self {
        Self {
            from_account,
            to_account,
            date,
            amount,
        }
    }
}
