//! A validated calendar month used to scope transaction and budget queries.

use serde::Deserialize;
use time::{Date, Month, OffsetDateTime};

use crate::Error;

/// A specific month of a specific year, e.g. January 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthYear {
    /// The calendar month.
    pub month: Month,
    /// The calendar year.
    pub year: i32,
}

impl MonthYear {
    /// Create a month from its 1-12 number and a year.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMonth] if `month` is outside 1-12.
    pub fn new(month: u8, year: i32) -> Result<Self, Error> {
        let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

        Ok(Self { month, year })
    }

    /// The current calendar month in UTC.
    pub fn current() -> Self {
        let today = OffsetDateTime::now_utc().date();

        Self {
            month: today.month(),
            year: today.year(),
        }
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    /// The 1-12 month number.
    pub fn number(&self) -> u8 {
        u8::from(self.month)
    }

    /// The first day of this month.
    pub fn first_day(&self) -> Date {
        // Day 1 exists in every month.
        Date::from_calendar_date(self.year, self.month, 1).unwrap()
    }

    /// The month immediately after this one.
    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self {
                month: Month::January,
                year: self.year + 1,
            },
            month => Self {
                month: month.next(),
                year: self.year,
            },
        }
    }
}

/// Optional month/year query parameters shared by the list and analytics
/// endpoints.
///
/// Missing parameters fall back to the current UTC month/year, matching the
/// behaviour of an unscoped read.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct MonthQuery {
    /// The 1-12 month number.
    pub month: Option<u8>,
    /// The calendar year.
    pub year: Option<i32>,
}

impl MonthQuery {
    /// Resolve the query into a concrete month, defaulting missing parts to
    /// the current UTC month.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMonth] if the month parameter is outside 1-12.
    pub fn resolve(self) -> Result<MonthYear, Error> {
        let current = MonthYear::current();

        MonthYear::new(
            self.month.unwrap_or_else(|| current.number()),
            self.year.unwrap_or(current.year),
        )
    }

    /// Whether the client supplied any scoping parameter at all.
    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.year.is_none()
    }
}
