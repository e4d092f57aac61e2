//! Book error types.

use thiserror::Error;

use crate::{AccountId, Amount, CategoryId};

/// Error returned when an operation on a [`Book`](crate::Book) is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// Account and category names must not be blank.
    #[error("name must not be empty")]
    EmptyName,
    /// An account with this name (ignoring case) already exists.
    #[error("an account named \"{0}\" already exists")]
    DuplicateAccount(String),
    /// A category with this name (ignoring case) already exists.
    #[error("a category named \"{0}\" already exists")]
    DuplicateCategory(String),
    /// No account has this id.
    #[error("unknown account {0}")]
    UnknownAccount(AccountId),
    /// No category has this id.
    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),
    /// The amount is not in the book's currency.
    #[error("amount {found} is not in the book currency {expected}")]
    CurrencyMismatch {
        /// The book currency.
        expected: String,
        /// The offending amount.
        found: Amount,
    },
    /// A transfer names the same account on both sides.
    #[error("cannot transfer from an account to itself")]
    SameAccount,
    /// Transfers and budgets need a strictly positive amount.
    #[error("amount must be positive, got {0}")]
    NotPositive(Amount),
    /// The account still takes part in transfers.
    #[error("account \"{name}\" is used by {transfers} transfer(s)")]
    AccountInUse {
        /// The account name.
        name: String,
        /// Number of transfers referencing it.
        transfers: usize,
    },
    /// A balance or total no longer fits in a decimal.
    #[error("amount total is out of range")]
    Overflow,
    /// No transaction at this position.
    #[error("account \"{account}\" has no transaction #{index}")]
    NoSuchTransaction {
        /// The account name.
        account: String,
        /// The requested position.
        index: usize,
    },
}
