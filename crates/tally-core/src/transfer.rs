//! Transfers between accounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount};

/// Money moved from one account of a book to another.
///
/// Transfers are not spending: they change the balances of both accounts by
/// the same amount in opposite directions and never count against a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Date of the transfer
    pub date: NaiveDate,
    /// Debited account
    pub from: AccountId,
    /// Credited account
    pub to: AccountId,
    /// Positive amount moved
    pub amount: Amount,
    /// Free-form description
    pub note: Option<String>,
}

impl Transfer {
    /// Create a transfer without a note.
    #[must_use]
    pub const fn new(date: NaiveDate, from: AccountId, to: AccountId, amount: Amount) -> Self {
        Self {
            date,
            from,
            to,
            amount,
            note: None,
        }
    }

    /// Attach a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether `account` is on either side of the transfer.
    #[must_use]
    pub fn involves(&self, account: AccountId) -> bool {
        self.from == account || self.to == account
    }
}
