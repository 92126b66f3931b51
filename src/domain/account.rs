use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Identifiable;
use crate::money::Money;

/// Point-in-time snapshot of a financial account as supplied by the
/// storage collaborator. The engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountSnapshot {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub available_balance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Money>,
}

impl AccountSnapshot {
    pub fn new(name: impl Into<String>, kind: AccountKind, available_balance: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            available_balance,
            credit_limit: None,
        }
    }

    /// Attaches a credit limit, relevant for [`AccountKind::Credit`].
    pub fn with_credit_limit(mut self, limit: Money) -> Self {
        self.credit_limit = Some(limit);
        self
    }
}

impl Identifiable for AccountSnapshot {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Closed set of supported account classifications. Account-kind-specific
/// behavior dispatches on this enum at compile time, never via runtime
/// discovery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
    Cash,
}

impl AccountKind {
    /// Deposit-style accounts where a low balance is a user-facing risk.
    pub fn is_depository(&self) -> bool {
        matches!(self, AccountKind::Checking | AccountKind::Savings)
    }
}
