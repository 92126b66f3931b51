use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A settled historical transaction, as supplied by the storage
/// collaborator for trend analysis. Amounts are signed: inflows positive,
/// outflows negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalTransaction {
    pub date: NaiveDate,
    pub amount: Money,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl HistoricalTransaction {
    pub fn new(date: NaiveDate, amount: Money, kind: TransactionKind) -> Self {
        Self {
            date,
            amount,
            kind,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}
