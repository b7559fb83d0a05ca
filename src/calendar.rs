//! Query period presets

use crate::error::{FxError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A date range preset, resolved against "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// First of the current month through today
    ThisMonth,
    /// The whole previous calendar month
    LastMonth,
    /// An explicit inclusive range
    Custom { start: NaiveDate, end: NaiveDate },
}

impl Period {
    /// Resolve to an inclusive (start, end) pair.
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        match *self {
            Period::ThisMonth => Ok((first_of_month(today), today)),
            Period::LastMonth => {
                let last_month_end = first_of_month(today) - Duration::days(1);
                Ok((first_of_month(last_month_end), last_month_end))
            }
            Period::Custom { start, end } => {
                if start > end {
                    return Err(FxError::InvalidQuery(format!(
                        "start date {} must be on or before end date {}",
                        start, end
                    )));
                }
                Ok((start, end))
            }
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::LastMonth
    }
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| FxError::InvalidQuery(format!("invalid date {:?}: {}", s, e)))
}
