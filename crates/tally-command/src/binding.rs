//! Parsed argument values collected during one descent.

use chrono::NaiveDate;
use std::fmt;
use tally_core::{AccountId, Amount, CategoryId, Period};

use crate::error::GrammarError;
use crate::ArgKind;

/// A typed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Free text
    Text(String),
    /// An amount of money
    Money(Amount),
    /// A calendar date
    Date(NaiveDate),
    /// A budget period
    Period(Period),
    /// A resolved account
    Account(AccountId),
    /// A resolved category
    Category(CategoryId),
}

impl Value {
    /// The kind of argument that produces this value.
    #[must_use]
    pub const fn kind(&self) -> ArgKind {
        match self {
            Self::Text(_) => ArgKind::Text,
            Self::Money(_) => ArgKind::Money,
            Self::Date(_) => ArgKind::Date,
            Self::Period(_) => ArgKind::Period,
            Self::Account(_) => ArgKind::Account,
            Self::Category(_) => ArgKind::Category,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "\"{text}\""),
            Self::Money(amount) => write!(f, "{amount}"),
            Self::Date(date) => write!(f, "{date}"),
            Self::Period(period) => write!(f, "{period}"),
            Self::Account(id) => write!(f, "account {id}"),
            Self::Category(id) => write!(f, "category {id}"),
        }
    }
}

macro_rules! typed_accessors {
    ($($(#[$doc:meta])* $name:ident, $opt:ident => $variant:ident($ty:ty);)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, id: &str) -> Result<$ty, GrammarError> {
                match self.get(id)? {
                    Value::$variant(v) => Ok(v.clone()),
                    other => Err(GrammarError::BindingKind {
                        id: id.to_string(),
                        expected: ArgKind::$variant,
                        found: other.kind(),
                    }),
                }
            }

            #[doc = concat!("Like [`Bindings::", stringify!($name), "`], but `None` when `id` is unbound.")]
            pub fn $opt(&self, id: &str) -> Result<Option<$ty>, GrammarError> {
                if self.contains(id) {
                    self.$name(id).map(Some)
                } else {
                    Ok(None)
                }
            }
        )*
    };
}

/// Identifier to value map, in binding order.
///
/// Each identifier is bound at most once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<(String, Value)>,
}

impl Bindings {
    /// An empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind `id` to `value`.
    pub fn add(&mut self, id: impl Into<String>, value: Value) -> Result<(), GrammarError> {
        let id = id.into();
        if self.contains(&id) {
            return Err(GrammarError::DuplicateBinding { id });
        }
        self.entries.push((id, value));
        Ok(())
    }

    /// Move every binding of `other` into `self`, in order.
    pub fn merge(&mut self, other: Self) -> Result<(), GrammarError> {
        for (id, value) in other.entries {
            self.add(id, value)?;
        }
        Ok(())
    }

    /// Whether `id` is bound.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(bound, _)| bound == id)
    }

    /// The value bound to `id`.
    pub fn get(&self, id: &str) -> Result<&Value, GrammarError> {
        self.optional(id).ok_or_else(|| GrammarError::MissingBinding {
            id: id.to_string(),
        })
    }

    /// The value bound to `id`, if any.
    #[must_use]
    pub fn optional(&self, id: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(bound, _)| bound == id)
            .map(|(_, value)| value)
    }

    typed_accessors! {
        /// The text bound to `id`.
        text, text_opt => Text(String);
        /// The amount bound to `id`.
        money, money_opt => Money(Amount);
        /// The date bound to `id`.
        date, date_opt => Date(NaiveDate);
        /// The period bound to `id`.
        period, period_opt => Period(Period);
        /// The account bound to `id`.
        account, account_opt => Account(AccountId);
        /// The category bound to `id`.
        category, category_opt => Category(CategoryId);
    }

    /// Iterate over `(id, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), value))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_rejects_duplicates() {
        let mut bindings = Bindings::new();
        bindings.add("name", Value::Text("a".into())).unwrap();
        assert_eq!(
            bindings.add("name", Value::Text("b".into())),
            Err(GrammarError::DuplicateBinding {
                id: "name".to_string()
            })
        );
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = Bindings::new();
        first.add("a", Value::Period(Period::Weekly)).unwrap();
        let mut second = Bindings::new();
        second.add("b", Value::Account(AccountId(2))).unwrap();
        second.add("c", Value::Category(CategoryId(3))).unwrap();
        first.merge(second).unwrap();

        let ids: Vec<&str> = first.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_merge_reports_overlap() {
        let mut first = Bindings::new();
        first.add("a", Value::Text("x".into())).unwrap();
        let mut second = Bindings::new();
        second.add("a", Value::Text("y".into())).unwrap();
        assert!(matches!(
            first.merge(second),
            Err(GrammarError::DuplicateBinding { .. })
        ));
    }

    #[test]
    fn test_typed_access() {
        let mut bindings = Bindings::new();
        bindings
            .add("value", Value::Money(Amount::new(dec!(50), "USD")))
            .unwrap();

        assert_eq!(bindings.money("value").unwrap().number, dec!(50));
        assert_eq!(bindings.date_opt("date"), Ok(None));
        assert_eq!(
            bindings.get("date"),
            Err(GrammarError::MissingBinding {
                id: "date".to_string()
            })
        );
        assert_eq!(
            bindings.text("value"),
            Err(GrammarError::BindingKind {
                id: "value".to_string(),
                expected: ArgKind::Text,
                found: ArgKind::Money,
            })
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Text("hi".into()).to_string(), "\"hi\"");
        assert_eq!(Value::Account(AccountId(3)).to_string(), "account #3");
        assert_eq!(Value::Period(Period::Monthly).to_string(), "monthly");
    }
}
