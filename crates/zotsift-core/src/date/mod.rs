use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZotsiftError};

mod compare;
mod parse;

#[cfg(test)]
mod tests;

pub use compare::matches;
pub use parse::parse_date_range;

/// A date known to year, year+month, or full day precision.
///
/// Components keep the literal value they were parsed from; a `0` month or day
/// is only treated as absent when compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
}

impl PartialDate {
    #[must_use]
    pub const fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    #[must_use]
    pub const fn year_month(year: i32, month: u8) -> Self {
        Self {
            year,
            month: Some(month),
            day: None,
        }
    }

    #[must_use]
    pub const fn ymd(year: i32, month: u8, day: u8) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
        }
    }

    /// Month with `0` folded into "unspecified".
    #[must_use]
    pub fn effective_month(&self) -> Option<u8> {
        self.month.filter(|value| *value != 0)
    }

    /// Day with `0` folded into "unspecified".
    #[must_use]
    pub fn effective_day(&self) -> Option<u8> {
        self.day.filter(|value| *value != 0)
    }
}

impl Display for PartialDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
            if let Some(day) = self.day {
                write!(f, "-{day:02}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for PartialDate {
    type Err = ZotsiftError;

    fn from_str(s: &str) -> Result<Self> {
        parse::parse_partial_date(s)
    }
}

/// Before/after bounds on a [`PartialDate`]. Both absent means the criterion is
/// inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<PartialDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<PartialDate>,
}

impl DateRange {
    #[must_use]
    pub const fn between(after: PartialDate, before: PartialDate) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    #[must_use]
    pub const fn exactly(date: PartialDate) -> Self {
        Self {
            before: Some(date),
            after: Some(date),
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.before.is_some() || self.after.is_some()
    }

    #[must_use]
    pub fn matches(&self, subject: &PartialDate) -> bool {
        compare::matches(self, subject)
    }
}
