//! Spending categories and their budgets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, Period};

/// Stable identifier of a category within its book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A spending limit that resets every period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum spending per period
    pub limit: Amount,
    /// How often the limit resets
    pub period: Period,
}

impl Budget {
    /// Create a budget.
    #[must_use]
    pub const fn new(limit: Amount, period: Period) -> Self {
        Self { limit, period }
    }
}

/// A named spending category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable id
    pub id: CategoryId,
    /// Display name, unique in the book ignoring case
    pub name: String,
    /// Optional budget
    pub budget: Option<Budget>,
}

impl Category {
    pub(crate) fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            budget: None,
        }
    }
}

/// Spending against a budget for the period containing a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetStatus {
    /// The budget being evaluated
    pub budget: Budget,
    /// First day of the period
    pub start: NaiveDate,
    /// First day after the period
    pub end: NaiveDate,
    /// Net spending in the period
    pub spent: Amount,
    /// `limit - spent`; negative when over budget
    pub remaining: Amount,
}

impl BudgetStatus {
    /// Whether spending exceeded the limit.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.remaining.is_negative()
    }
}
