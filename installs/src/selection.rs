use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Longest range a single report may span, in days.
pub const MAX_RANGE_DAYS: i64 = 366;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years a selection may fall in.
const YEARS: std::ops::RangeInclusive<i32> = 1900..=2999;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("start date {from} is after end date {to}")]
    Inverted { from: NaiveDate, to: NaiveDate },
    #[error("range of {0} days exceeds the limit of {max}", max = MAX_RANGE_DAYS)]
    TooLong(i64),
    #[error("either a date or both from and to are required")]
    Missing,
}

/// Which calendar days a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Day(NaiveDate),
    /// Inclusive on both ends.
    Range { from: NaiveDate, to: NaiveDate },
}

impl DateSelection {
    pub fn range(from: NaiveDate, to: NaiveDate) -> Result<Self, SelectionError> {
        if from > to {
            return Err(SelectionError::Inverted { from, to });
        }
        let days = (to - from).num_days() + 1;
        if days > MAX_RANGE_DAYS {
            return Err(SelectionError::TooLong(days));
        }
        Ok(Self::Range { from, to })
    }

    /// Build a selection from loosely supplied parameters, e.g. query strings or CLI flags.
    /// A single `date` wins over `from`/`to`.
    pub fn parse(
        date: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Self, SelectionError> {
        match (date, from, to) {
            (Some(date), _, _) => Ok(Self::Day(parse_date(date)?)),
            (None, Some(from), Some(to)) => Self::range(parse_date(from)?, parse_date(to)?),
            _ => Err(SelectionError::Missing),
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Every day covered, in calendar order.
    pub fn days(&self) -> Vec<NaiveDate> {
        let (from, to) = match *self {
            Self::Day(day) => (day, day),
            Self::Range { from, to } => (from, to),
        };
        from.iter_days().take_while(|day| *day <= to).collect()
    }

    /// `2024-01-10` for a day, `2024-01-01_to_2024-01-07` for a range.
    pub fn label(&self) -> String {
        match self {
            Self::Day(day) => day.format(DATE_FORMAT).to_string(),
            Self::Range { from, to } => format!(
                "{}_to_{}",
                from.format(DATE_FORMAT),
                to.format(DATE_FORMAT)
            ),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, SelectionError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .filter(|date| YEARS.contains(&date.year()))
        .ok_or_else(|| SelectionError::InvalidDate(raw.to_string()))
}
