//! Publish dates and the clock that supplies "today"
//!
//! Dates are persisted as fixed-width, zero-padded `YYYY-MM-DD` text.
//! Visibility compares dates against today, and that comparison is only
//! sound while string order and chronological order agree, so years are
//! restricted to four digits (0000-9999).

use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, NaiveDate};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// `chrono` format string for the persisted date form
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_LEN: usize = 10;
const MAX_YEAR: i32 = 9999;

/// Text that is not a fixed-width `YYYY-MM-DD` calendar date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a YYYY-MM-DD date")]
pub struct InvalidDate(pub String);

/// Calendar date an article becomes publicly visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublishDate(NaiveDate);

impl PublishDate {
    /// Parse the persisted `YYYY-MM-DD` form.
    ///
    /// Only the exact zero-padded form is accepted: `2024-5-1` or
    /// `+10000-01-01` would break the string ordering the rest of the
    /// system relies on.
    pub fn parse(value: &str) -> Result<Self, InvalidDate> {
        let invalid = || InvalidDate(value.to_owned());

        let bytes = value.as_bytes();
        if bytes.len() != DATE_LEN {
            return Err(invalid());
        }
        let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
        if !shape_ok {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Build a date from its parts; `None` for impossible dates or years
    /// outside 0000-9999.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(0..=MAX_YEAR).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for PublishDate {
    type Err = InvalidDate;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for PublishDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Source of "today", injected so request handling stays testable
pub trait Clock: Send + Sync {
    fn today(&self) -> PublishDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> PublishDate {
        // The wall clock always reports a four-digit year.
        PublishDate(Local::now().date_naive())
    }
}

/// Clock pinned to a single date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub PublishDate);

impl Clock for FixedClock {
    fn today(&self) -> PublishDate {
        self.0
    }
}
