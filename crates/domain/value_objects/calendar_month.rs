use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// A billing month. Backed by the first day of the month so ordering and
/// storage both go through `NaiveDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarMonth(NaiveDate);

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Calendar-month steps from `start` to `end`; negative when `end` comes first.
    pub fn months_between(start: Self, end: Self) -> i64 {
        let years = i64::from(end.year()) - i64::from(start.year());
        years * 12 + i64::from(end.month()) - i64::from(start.month())
    }

    /// Parses the `MM-YYYY` wire format.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate(raw.to_string());

        let (month, year) = raw.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(invalid());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}

impl From<NaiveDate> for CalendarMonth {
    fn from(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }
}

impl Display for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl FromStr for CalendarMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarMonth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarMonth> for String {
    fn from(value: CalendarMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(raw: &str) -> CalendarMonth {
        CalendarMonth::parse(raw).unwrap()
    }

    #[test]
    fn parses_wire_format() {
        let jan = month("01-2023");
        assert_eq!(jan.year(), 2023);
        assert_eq!(jan.month(), 1);
        assert_eq!(jan.first_day(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(month("12-1999").to_string(), "12-1999");
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in [
            "", "1-2023", "01-23", "13-2023", "00-2023", "2023-01", "01/2023", "0a-2023",
            "01-2023-", "+1-2023", "01--023",
        ] {
            assert!(
                matches!(CalendarMonth::parse(raw), Err(ValidationError::InvalidDate(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn orders_by_year_then_month() {
        assert!(month("12-2022") < month("01-2023"));
        assert!(month("02-2023") > month("01-2023"));
        assert_eq!(month("05-2024").max(month("04-2024")), month("05-2024"));
    }

    #[test]
    fn counts_months_between() {
        assert_eq!(CalendarMonth::months_between(month("01-2023"), month("01-2023")), 0);
        assert_eq!(CalendarMonth::months_between(month("01-2023"), month("06-2023")), 5);
        assert_eq!(CalendarMonth::months_between(month("11-2022"), month("02-2023")), 3);
        assert_eq!(CalendarMonth::months_between(month("03-2023"), month("01-2023")), -2);
    }

    #[test]
    fn truncates_dates_to_month() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(CalendarMonth::from(date), month("02-2024"));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&month("03-2023")).unwrap();
        assert_eq!(json, "\"03-2023\"");

        let parsed: CalendarMonth = serde_json::from_str("\"07-2021\"").unwrap();
        assert_eq!(parsed, month("07-2021"));
        assert!(serde_json::from_str::<CalendarMonth>("\"7-2021\"").is_err());
    }
}
