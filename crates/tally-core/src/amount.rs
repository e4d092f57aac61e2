//! Amount type representing a decimal number with a currency.
//!
//! An [`Amount`] is the unit of value in a book, combining a decimal number
//! with a currency code. Arithmetic is only meaningful between amounts of the
//! same currency; the [`Book`](crate::Book) refuses amounts in any currency
//! other than its own, so sums inside a book never mix currencies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// An amount is a quantity paired with a currency.
///
/// # Examples
///
/// ```
/// use tally_core::Amount;
/// use rust_decimal_macros::dec;
///
/// let amount = Amount::new(dec!(100.00), "USD");
/// assert_eq!(amount.number, dec!(100.00));
/// assert_eq!(amount.currency, "USD");
///
/// let other = Amount::new(dec!(50.5), "USD");
/// let sum = &amount + &other;
/// assert_eq!(sum.to_string(), "150.50 USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    /// The decimal quantity
    pub number: Decimal,
    /// The currency code (e.g., "USD", "EUR")
    pub currency: String,
}

impl Amount {
    /// Create a new amount.
    #[must_use]
    pub fn new(number: Decimal, currency: impl Into<String>) -> Self {
        Self {
            number,
            currency: currency.into(),
        }
    }

    /// Create a zero amount with the given currency.
    #[must_use]
    pub fn zero(currency: impl Into<String>) -> Self {
        Self {
            number: Decimal::ZERO,
            currency: currency.into(),
        }
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.number.is_zero()
    }

    /// Check if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.number.is_sign_positive() && !self.number.is_zero()
    }

    /// Check if the amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.number.is_sign_negative() && !self.number.is_zero()
    }

    /// Get the absolute value of this amount.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            number: self.number.abs(),
            currency: self.currency.clone(),
        }
    }

    /// Whether both amounts are expressed in the same currency.
    #[must_use]
    pub fn same_currency(&self, other: &Self) -> bool {
        self.currency.eq_ignore_ascii_case(&other.currency)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut number = self.number.round_dp(2);
        number.rescale(2);
        write!(f, "{} {}", number, self.currency)
    }
}

// Arithmetic operations on references

impl Add for &Amount {
    type Output = Amount;

    fn add(self, other: &Amount) -> Amount {
        debug_assert!(
            self.same_currency(other),
            "Cannot add amounts with different currencies"
        );
        Amount {
            number: self.number + other.number,
            currency: self.currency.clone(),
        }
    }
}

impl Sub for &Amount {
    type Output = Amount;

    fn sub(self, other: &Amount) -> Amount {
        debug_assert!(
            self.same_currency(other),
            "Cannot subtract amounts with different currencies"
        );
        Amount {
            number: self.number - other.number,
            currency: self.currency.clone(),
        }
    }
}

impl Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount {
            number: -self.number,
            currency: self.currency.clone(),
        }
    }
}

// Arithmetic operations on owned values

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

impl AddAssign<&Self> for Amount {
    fn add_assign(&mut self, other: &Self) {
        debug_assert!(
            self.same_currency(other),
            "Cannot add amounts with different currencies"
        );
        self.number += other.number;
    }
}

impl SubAssign<&Self> for Amount {
    fn sub_assign(&mut self, other: &Self) {
        debug_assert!(
            self.same_currency(other),
            "Cannot subtract amounts with different currencies"
        );
        self.number -= other.number;
    }
}

impl Amount {
    /// Sum `numbers` into an amount of `currency`, or `None` when the sum
    /// leaves the range of [`Decimal`].
    pub fn checked_sum_in<I>(currency: &str, numbers: I) -> Option<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        numbers
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .map(|number| Self::new(number, currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new() {
        let amount = Amount::new(dec!(100.00), "USD");
        assert_eq!(amount.number, dec!(100.00));
        assert_eq!(amount.currency, "USD");
    }

    #[test]
    fn test_zero() {
        let amount = Amount::zero("EUR");
        assert!(amount.is_zero());
        assert!(!amount.is_positive());
        assert!(!amount.is_negative());
    }

    #[test]
    fn test_sign() {
        assert!(Amount::new(dec!(3), "USD").is_positive());
        assert!(Amount::new(dec!(-3), "USD").is_negative());
        assert_eq!(Amount::new(dec!(-3), "USD").abs().number, dec!(3));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Amount::new(dec!(5), "USD").to_string(), "5.00 USD");
        assert_eq!(Amount::new(dec!(-12.5), "EUR").to_string(), "-12.50 EUR");
        assert_eq!(Amount::new(dec!(1.005), "USD").to_string(), "1.00 USD");
    }

    #[test]
    fn test_arithmetic() {
        let a = Amount::new(dec!(10), "USD");
        let b = Amount::new(dec!(4), "USD");
        assert_eq!((&a - &b).number, dec!(6));
        assert_eq!((a.clone() + b.clone()).number, dec!(14));
        assert_eq!((-a.clone()).number, dec!(-10));

        let mut c = a;
        c -= &b;
        c += &b;
        assert_eq!(c.number, dec!(10));
    }

    #[test]
    fn test_checked_sum_in() {
        let total = Amount::checked_sum_in("USD", vec![dec!(1.5), dec!(2.5), dec!(-1)]);
        assert_eq!(total, Some(Amount::new(dec!(3.0), "USD")));
        assert_eq!(
            Amount::checked_sum_in("USD", Vec::new()),
            Some(Amount::zero("USD"))
        );
        assert_eq!(Amount::checked_sum_in("USD", vec![Decimal::MAX, dec!(1)]), None);
    }

    #[test]
    fn test_same_currency_ignores_case() {
        assert!(Amount::zero("usd").same_currency(&Amount::zero("USD")));
        assert!(!Amount::zero("EUR").same_currency(&Amount::zero("USD")));
    }
}
