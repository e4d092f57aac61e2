//! Budget periods.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a budget resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// One calendar day
    Daily,
    /// Monday through Sunday
    Weekly,
    /// One calendar month
    Monthly,
    /// Jan-Mar, Apr-Jun, Jul-Sep, Oct-Dec
    Quarterly,
    /// One calendar year
    Yearly,
}

impl Period {
    /// All periods, shortest first.
    pub const ALL: [Self; 5] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
        Self::Yearly,
    ];

    /// Lower-case name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// The period containing `date`, as `(start, end)` with `end` exclusive.
    ///
    /// ```
    /// use tally_core::Period;
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
    /// let (start, end) = Period::Quarterly.bounds(day);
    /// assert_eq!(start, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    /// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    /// ```
    #[must_use]
    pub fn bounds(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Daily => (date, date + Duration::days(1)),
            Self::Weekly => {
                let start =
                    date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                (start, start + Duration::days(7))
            }
            Self::Monthly => {
                let start = first_of(date.year(), date.month());
                (start, next_month(start, 1))
            }
            Self::Quarterly => {
                let month = (date.month() - 1) / 3 * 3 + 1;
                let start = first_of(date.year(), month);
                (start, next_month(start, 3))
            }
            Self::Yearly => {
                let start = first_of(date.year(), 1);
                (start, first_of(date.year() + 1, 1))
            }
        }
    }
}

fn first_of(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("the first of a month is a valid date")
}

fn next_month(start: NaiveDate, months: u32) -> NaiveDate {
    let index = start.month0() + months;
    let year = start.year() + i32::try_from(index / 12).unwrap_or(0);
    first_of(year, index % 12 + 1)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for names that are not a [`Period`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown period \"{0}\" (expected daily, weekly, monthly, quarterly or yearly)")]
pub struct UnknownPeriod(pub String);

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            "yearly" | "year" | "annual" | "annually" => Ok(Self::Yearly),
            _ => Err(UnknownPeriod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert_eq!("WEEKLY".parse::<Period>().unwrap(), Period::Weekly);
        assert_eq!("annual".parse::<Period>().unwrap(), Period::Yearly);
        assert!("fortnightly".parse::<Period>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for period in Period::ALL {
            assert_eq!(period.to_string().parse::<Period>().unwrap(), period);
        }
    }

    #[test]
    fn test_weekly_starts_monday() {
        // 2024-05-16 is a Thursday
        let (start, end) = Period::Weekly.bounds(date(2024, 5, 16));
        assert_eq!(start, date(2024, 5, 13));
        assert_eq!(end, date(2024, 5, 20));
    }

    #[test]
    fn test_monthly_wraps_year() {
        let (start, end) = Period::Monthly.bounds(date(2023, 12, 31));
        assert_eq!(start, date(2023, 12, 1));
        assert_eq!(end, date(2024, 1, 1));
    }

    #[test]
    fn test_quarterly_last_quarter() {
        let (start, end) = Period::Quarterly.bounds(date(2023, 11, 2));
        assert_eq!(start, date(2023, 10, 1));
        assert_eq!(end, date(2024, 1, 1));
    }

    #[test]
    fn test_daily_and_yearly() {
        let day = date(2024, 2, 29);
        assert_eq!(Period::Daily.bounds(day), (day, date(2024, 3, 1)));
        assert_eq!(
            Period::Yearly.bounds(day),
            (date(2024, 1, 1), date(2025, 1, 1))
        );
    }
}
