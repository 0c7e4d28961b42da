//! Calendar month + year, written as `MM-YYYY` at the API boundary and stored
//! as the first day of that month.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthYearParseError(String);

impl fmt::Display for MonthYearParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month-year '{}', expected MM-YYYY", self.0)
    }
}

impl std::error::Error for MonthYearParseError {}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        // year bounds keep the MM-YYYY rendering at exactly four digits
        if (1..=12).contains(&month) && (1..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl From<MonthYear> for NaiveDate {
    fn from(value: MonthYear) -> Self {
        value.first_day()
    }
}

impl FromStr for MonthYear {
    type Err = MonthYearParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthYearParseError(s.to_string());

        let (month, year) = s.split_once('-').ok_or_else(err)?;
        if month.len() != 2
            || year.len() != 4
            || !month.bytes().all(|b| b.is_ascii_digit())
            || !year.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let month: u32 = month.parse().map_err(|_| err())?;
        let year: i32 = year.parse().map_err(|_| err())?;
        Self::new(month, year).ok_or_else(err)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}
