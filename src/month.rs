//! The month filter shared by every query on the board.
//!
//! A month is sent to the transaction API as a two digit code, "01" for
//! January through "12" for December. [MonthFilter::All] is the absence of a
//! filter and is never sent.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Month;

use crate::Error;

/// The value used for "all months" in forms and links.
pub const ALL_MONTHS_VALUE: &str = "all";

/// Either a single calendar month or no month filter at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MonthFilter {
    /// No filter, transactions from every month are included.
    All,
    /// Only transactions sold in this month are included.
    Only(Month),
}

impl MonthFilter {
    /// Every selectable month in calendar order, not including [MonthFilter::All].
    pub const MONTHS: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// The month as a query parameter value, `None` for [MonthFilter::All].
    pub fn code(&self) -> Option<String> {
        match self {
            MonthFilter::All => None,
            MonthFilter::Only(month) => Some(month_code(*month)),
        }
    }

    /// The month selected by the filter, if any.
    pub fn month(&self) -> Option<Month> {
        match self {
            MonthFilter::All => None,
            MonthFilter::Only(month) => Some(*month),
        }
    }

    /// Whether this is the "all months" sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, MonthFilter::All)
    }

    /// The value to use for this filter in an HTML form.
    pub fn form_value(&self) -> String {
        self.code().unwrap_or_else(|| ALL_MONTHS_VALUE.to_owned())
    }

    /// A human readable label, e.g. "March" or "All Months".
    pub fn label(&self) -> String {
        match self {
            MonthFilter::All => "All Months".to_owned(),
            MonthFilter::Only(month) => month.to_string(),
        }
    }
}

/// Format `month` as its two digit code, e.g. "03" for March.
pub fn month_code(month: Month) -> String {
    format!("{:02}", month as u8)
}

impl FromStr for MonthFilter {
    type Err = Error;

    /// Parse a month code.
    ///
    /// "all" is the sentinel for no filter. "null" and the empty string are
    /// also read as no filter.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() || value == ALL_MONTHS_VALUE || value == "null" {
            return Ok(MonthFilter::All);
        }

        // Only the zero padded two digit codes are valid, so "3" and "003" are rejected.
        if value.len() != 2 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(Error::InvalidMonth(value.to_owned()));
        }

        value
            .parse::<u8>()
            .ok()
            .and_then(|number| Month::try_from(number).ok())
            .map(MonthFilter::Only)
            .ok_or_else(|| Error::InvalidMonth(value.to_owned()))
    }
}

impl TryFrom<String> for MonthFilter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthFilter> for String {
    fn from(value: MonthFilter) -> Self {
        value.form_value()
    }
}

impl Display for MonthFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
