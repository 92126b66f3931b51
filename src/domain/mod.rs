//! Input data contracts supplied by external collaborators.
//!
//! The engine consumes these as immutable snapshots; ownership stays with
//! the call that created them and nothing here is shared mutable state.

pub mod account;
pub mod common;
pub mod obligation;
pub mod transaction;

pub use account::{AccountKind, AccountSnapshot};
pub use common::Identifiable;
pub use obligation::{
    BillOccurrence, BillStatus, IncomeOccurrence, IncomeStatus, TransferOccurrence,
};
pub use transaction::{HistoricalTransaction, TransactionKind};

use serde::{Deserialize, Serialize};

/// Bundle of collaborator-provided records consumed by a forecast call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashflowData {
    pub accounts: Vec<AccountSnapshot>,
    pub bills: Vec<BillOccurrence>,
    pub incomes: Vec<IncomeOccurrence>,
    pub transfers: Vec<TransferOccurrence>,
    pub history: Vec<HistoricalTransaction>,
}
