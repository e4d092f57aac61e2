//! Accounts and the transactions recorded on them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, CategoryId};

/// Stable identifier of an account within its book.
///
/// Ids are handed out in increasing order and never reused, so an id held by
/// a transfer or a console context stays meaningful after other accounts are
/// removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u32);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single movement of money on an account.
///
/// Negative amounts are spending, positive amounts are income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date the transaction happened
    pub date: NaiveDate,
    /// Signed amount
    pub amount: Amount,
    /// Free-form description
    pub note: Option<String>,
    /// Spending category, if classified
    pub category: Option<CategoryId>,
}

impl Transaction {
    /// Create an uncategorized transaction without a note.
    #[must_use]
    pub const fn new(date: NaiveDate, amount: Amount) -> Self {
        Self {
            date,
            amount,
            note: None,
            category: None,
        }
    }

    /// Attach a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Classify under a category.
    #[must_use]
    pub const fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }
}

/// A named account holding transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable id
    pub id: AccountId,
    /// Display name, unique in the book ignoring case
    pub name: String,
    /// Transactions in the order they were recorded
    pub transactions: Vec<Transaction>,
}

impl Account {
    pub(crate) fn new(id: AccountId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transactions: Vec::new(),
        }
    }

    /// Transactions dated within `[from, to)`; open ends are unbounded.
    pub fn transactions_between(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> impl Iterator<Item = (usize, &Transaction)> {
        self.transactions
            .iter()
            .enumerate()
            .filter(move |(_, txn)| from.map_or(true, |d| txn.date >= d))
            .filter(move |(_, txn)| to.map_or(true, |d| txn.date < d))
    }
}
