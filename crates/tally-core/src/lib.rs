//! Core types for tally
//!
//! This crate provides the domain model behind the tally console:
//!
//! - [`Amount`] - A decimal number with a currency
//! - [`Period`] - A recurring budget period (daily through yearly)
//! - [`Book`] - The top-level container of accounts, categories and transfers
//! - [`Account`] and [`Transaction`] - Money held somewhere and its movements
//! - [`Category`] and [`Budget`] - Spending classification and limits
//! - [`Transfer`] - Money moved between two accounts of the same book
//!
//! # Example
//!
//! ```
//! use tally_core::{Amount, Book, Budget, Period, Transaction};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let mut book = Book::new("Household", "USD");
//! let checking = book.open_account("Checking").unwrap();
//! let food = book.add_category("Food").unwrap();
//! book.set_budget(food, Budget::new(Amount::new(dec!(300), "USD"), Period::Monthly)).unwrap();
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! book.record(
//!     checking,
//!     Transaction::new(day, Amount::new(dec!(-42.50), "USD")).with_category(food),
//! )
//! .unwrap();
//!
//! assert_eq!(book.balance(checking).unwrap().number, dec!(-42.50));
//! let status = book.budget_status(food, day).unwrap().unwrap();
//! assert_eq!(status.remaining.number, dec!(257.50));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod amount;
pub mod book;
pub mod category;
pub mod error;
pub mod period;
pub mod transfer;

pub use account::{Account, AccountId, Transaction};
pub use amount::Amount;
pub use book::Book;
pub use category::{Budget, BudgetStatus, Category, CategoryId};
pub use error::BookError;
pub use period::{Period, UnknownPeriod};
pub use transfer::Transfer;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
