//! Typed argument slots.
//!
//! An [`Argument`] is a leaf of the command grammar. It recognises the piece
//! of text meant for it (by label, or by being the only slot of its command)
//! and converts that text into a typed [`Value`].

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use tally_core::{Amount, Period};

use crate::error::ArgumentError;
use crate::tokenize::{first_token, same_token, strip_token, unquote};
use crate::{Registry, Value};

/// The closed set of argument kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Free text, optionally quoted
    Text,
    /// A decimal amount with an optional currency
    Money,
    /// A calendar date
    Date,
    /// A budget period name
    Period,
    /// The name of an existing account
    Account,
    /// The name of an existing category
    Category,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Money => "money",
            Self::Date => "date",
            Self::Period => "period",
            Self::Account => "account",
            Self::Category => "category",
        })
    }
}

/// One typed argument slot of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    id: String,
    label: Option<String>,
    kind: ArgKind,
    required: bool,
    help: Option<String>,
}

impl Argument {
    /// An unlabeled slot. A command with an unlabeled slot may not declare any other.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind,
            required: false,
            help: None,
        }
    }

    /// A slot recognised by its leading label token.
    #[must_use]
    pub fn labeled(id: impl Into<String>, label: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(id, kind)
        }
    }

    /// Mark the slot as required by its own command.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Identifier under which the value is bound.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Label token, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Kind of value produced.
    #[must_use]
    pub const fn kind(&self) -> ArgKind {
        self.kind
    }

    /// Whether the slot itself is marked required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Help text.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether `segment` is meant for this slot.
    ///
    /// Unlabeled slots accept anything; labeled slots accept a segment whose
    /// leading token is the label, ignoring case.
    pub fn matches(&self, segment: &str) -> bool {
        self.label
            .as_deref()
            .map_or(true, |label| same_token(first_token(segment), label))
    }

    /// Convert `segment` into a value of this slot's kind.
    ///
    /// A trailing separator and, for labeled slots, the label are stripped
    /// first.
    pub fn parse(&self, segment: &str, registry: &dyn Registry) -> Result<Value, ArgumentError> {
        let mut text = segment.trim();
        if let Some(stripped) = text.strip_suffix(&[',', ';'][..]) {
            text = stripped.trim_end();
        }
        if self.label.is_some() {
            text = strip_token(text);
        }
        if text.is_empty() {
            return Err(ArgumentError::Empty {
                id: self.id.clone(),
                kind: self.kind,
            });
        }

        let bare = unquote(text);
        let invalid = || ArgumentError::Invalid {
            id: self.id.clone(),
            kind: self.kind,
            text: text.to_string(),
        };
        let not_found = || ArgumentError::NotFound {
            id: self.id.clone(),
            kind: self.kind,
            name: bare.to_string(),
        };

        match self.kind {
            ArgKind::Text if bare.is_empty() => Err(ArgumentError::Empty {
                id: self.id.clone(),
                kind: self.kind,
            }),
            ArgKind::Text => Ok(Value::Text(bare.to_string())),
            ArgKind::Money => parse_money(bare, registry.default_currency())
                .map(Value::Money)
                .ok_or_else(invalid),
            ArgKind::Date => parse_date(bare, registry.today())
                .map(Value::Date)
                .ok_or_else(invalid),
            ArgKind::Period => Period::from_str(bare)
                .map(Value::Period)
                .map_err(|_| invalid()),
            ArgKind::Account => registry
                .find_account(bare)
                .map(Value::Account)
                .ok_or_else(not_found),
            ArgKind::Category => registry
                .find_category(bare)
                .map(Value::Category)
                .ok_or_else(not_found),
        }
    }
}

const CURRENCY_SYMBOLS: [(char, &str); 4] = [('$', "USD"), ('€', "EUR"), ('£', "GBP"), ('¥', "JPY")];

/// Parse a money amount such as `50`, `-12.50`, `$1,200`, `30 EUR` or `EUR30`.
///
/// Amounts without a currency are in `default_currency`. Commas are only
/// accepted as thousands separators.
pub fn parse_money(text: &str, default_currency: &str) -> Option<Amount> {
    let mut rest = text.trim();
    let mut negative = false;
    let mut currency: Option<String> = None;

    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped.trim_start();
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped.trim_start();
    }

    if let Some((symbol, code)) = CURRENCY_SYMBOLS
        .iter()
        .find(|(symbol, _)| rest.starts_with(*symbol))
    {
        currency = Some((*code).to_string());
        rest = rest[symbol.len_utf8()..].trim_start();
        if !negative {
            if let Some(stripped) = rest.strip_prefix('-') {
                negative = true;
                rest = stripped.trim_start();
            }
        }
    }

    let leading: String = rest.chars().take_while(char::is_ascii_alphabetic).collect();
    let trailing: String = {
        let mut letters: Vec<char> = rest
            .chars()
            .rev()
            .take_while(char::is_ascii_alphabetic)
            .collect();
        letters.reverse();
        letters.into_iter().collect()
    };
    let code = if !leading.is_empty() {
        rest = rest[leading.len()..].trim_start();
        Some(leading)
    } else if !trailing.is_empty() {
        rest = rest[..rest.len() - trailing.len()].trim_end();
        Some(trailing)
    } else {
        None
    };
    if let Some(code) = code {
        if code.len() != 3 {
            return None;
        }
        let code = code.to_uppercase();
        if currency.as_ref().is_some_and(|symbol| *symbol != code) {
            return None;
        }
        currency = Some(code);
    }

    let digits = thousands_free(rest)?;
    let number = Decimal::from_str(&digits).ok()?;
    let number = if negative { -number } else { number };
    Some(Amount::new(
        number,
        currency.unwrap_or_else(|| default_currency.to_string()),
    ))
}

/// Remove thousands separators, rejecting anything that is not `d{1,3}(,ddd)*(.d+)?`.
fn thousands_free(text: &str) -> Option<String> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    let groups: Vec<&str> = whole.split(',').collect();
    let well_formed = groups.iter().all(|g| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit()))
        && (groups.len() == 1 || (groups[0].len() <= 3 && groups[1..].iter().all(|g| g.len() == 3)));
    if !well_formed {
        return None;
    }
    let mut digits = groups.concat();
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push('.');
        digits.push_str(fraction);
    }
    Some(digits)
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Parse a calendar date, or one of the words `today`, `yesterday`, `tomorrow`.
pub fn parse_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    match text.to_lowercase().as_str() {
        "today" => return Some(today),
        "yesterday" => return Some(today - Duration::days(1)),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::{AccountId, CategoryId};

    struct Names;

    impl Registry for Names {
        fn find_account(&self, name: &str) -> Option<AccountId> {
            name.eq_ignore_ascii_case("checking").then_some(AccountId(1))
        }
        fn find_category(&self, name: &str) -> Option<CategoryId> {
            name.eq_ignore_ascii_case("eating out").then_some(CategoryId(4))
        }
        fn account_names(&self) -> Vec<String> {
            vec!["Checking".to_string()]
        }
        fn category_names(&self) -> Vec<String> {
            vec!["Eating out".to_string()]
        }
        fn default_currency(&self) -> &str {
            "USD"
        }
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        }
    }

    fn usd(n: Decimal) -> Option<Amount> {
        Some(Amount::new(n, "USD"))
    }

    #[test]
    fn test_money_forms() {
        assert_eq!(parse_money("50", "USD"), usd(dec!(50)));
        assert_eq!(parse_money("-12.50", "USD"), usd(dec!(-12.50)));
        assert_eq!(parse_money("$1,200.5", "EUR"), usd(dec!(1200.5)));
        assert_eq!(parse_money("-$3", "EUR"), usd(dec!(-3)));
        assert_eq!(parse_money("$-3", "EUR"), usd(dec!(-3)));
        assert_eq!(
            parse_money("30 eur", "USD"),
            Some(Amount::new(dec!(30), "EUR"))
        );
        assert_eq!(
            parse_money("GBP 7.25", "USD"),
            Some(Amount::new(dec!(7.25), "GBP"))
        );
        assert_eq!(
            parse_money("€5", "USD"),
            Some(Amount::new(dec!(5), "EUR"))
        );
    }

    #[test]
    fn test_money_rejects() {
        assert_eq!(parse_money("", "USD"), None);
        assert_eq!(parse_money("abc", "USD"), None);
        assert_eq!(parse_money("1,5", "USD"), None);
        assert_eq!(parse_money("12.", "USD"), None);
        assert_eq!(parse_money("5 dollars", "USD"), None);
        assert_eq!(parse_money("$5 EUR", "USD"), None);
        assert_eq!(parse_money("1.2.3", "USD"), None);
    }

    #[test]
    fn test_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31);
        assert_eq!(parse_date("2024-01-31", today), expected);
        assert_eq!(parse_date("2024/01/31", today), expected);
        assert_eq!(parse_date("31.01.2024", today), expected);
        assert_eq!(parse_date("Today", today), Some(today));
        assert_eq!(
            parse_date("yesterday", today),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
        assert_eq!(parse_date("2024-02-30", today), None);
        assert_eq!(parse_date("soon", today), None);
    }

    #[test]
    fn test_matches_label_case_insensitively() {
        let slot = Argument::labeled("value", "value", ArgKind::Money);
        assert!(slot.matches("VALUE 50"));
        assert!(slot.matches("  value"));
        assert!(!slot.matches("values 50"));
        assert!(Argument::new("name", ArgKind::Text).matches("anything at all"));
    }

    #[test]
    fn test_parse_labeled_money() {
        let slot = Argument::labeled("value", "value", ArgKind::Money);
        assert_eq!(
            slot.parse(" value 50, ", &Names).unwrap(),
            Value::Money(Amount::new(dec!(50), "USD"))
        );
        assert_eq!(
            slot.parse("value", &Names),
            Err(ArgumentError::Empty {
                id: "value".to_string(),
                kind: ArgKind::Money
            })
        );
        assert_eq!(
            slot.parse("value fifty", &Names),
            Err(ArgumentError::Invalid {
                id: "value".to_string(),
                kind: ArgKind::Money,
                text: "fifty".to_string()
            })
        );
    }

    #[test]
    fn test_parse_text_strips_quotes() {
        let slot = Argument::labeled("note", "note", ArgKind::Text);
        assert_eq!(
            slot.parse(r#"note "Rent, March""#, &Names).unwrap(),
            Value::Text("Rent, March".to_string())
        );
        let whole = Argument::new("accountName", ArgKind::Text);
        assert_eq!(
            whole.parse("  Groceries  ", &Names).unwrap(),
            Value::Text("Groceries".to_string())
        );
    }

    #[test]
    fn test_parse_references() {
        let account = Argument::labeled("from", "from", ArgKind::Account);
        assert_eq!(
            account.parse("from CHECKING", &Names).unwrap(),
            Value::Account(AccountId(1))
        );
        assert_eq!(
            account.parse("from Savings", &Names),
            Err(ArgumentError::NotFound {
                id: "from".to_string(),
                kind: ArgKind::Account,
                name: "Savings".to_string()
            })
        );
        let category = Argument::new("category", ArgKind::Category);
        assert_eq!(
            category.parse(r#""Eating Out""#, &Names).unwrap(),
            Value::Category(CategoryId(4))
        );
    }

    #[test]
    fn test_parse_period_and_date_keywords() {
        let period = Argument::labeled("period", "period", ArgKind::Period);
        assert_eq!(
            period.parse("period Monthly", &Names).unwrap(),
            Value::Period(Period::Monthly)
        );
        let date = Argument::labeled("date", "date", ArgKind::Date);
        assert_eq!(
            date.parse("date today", &Names).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
        );
    }
}
