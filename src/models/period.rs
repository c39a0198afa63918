//! Budget period representation
//!
//! A period is never stored; it is computed from an instant and the
//! configured start day. Its identifier is the calendar month in which it
//! starts, so identifiers sort in the same order as the periods themselves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RolloverError;

/// Canonical period key, rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodId {
    // Field order matters: derived Ord compares year first.
    year: i32,
    month: u32,
}

impl PeriodId {
    /// Create a period id. Months outside 1..=12 are clamped.
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The id of the following period
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// The id of the preceding period
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// Parse a strict `YYYY-MM` key
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;

        if year.len() != 4 || month.len() != 2 {
            return Err(PeriodParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }

        Ok(Self { year, month })
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodId {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PeriodId {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PeriodId> for String {
    fn from(id: PeriodId) -> Self {
        id.to_string()
    }
}

/// A budget period: `[start, end)` in local calendar dates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    /// First day of the period (inclusive)
    pub start: NaiveDate,
    /// First day of the following period (exclusive)
    pub end: NaiveDate,
}

impl Period {
    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Last calendar day belonging to the period
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.end)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}..{})",
            self.id,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Error type for period id parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}

impl From<PeriodParseError> for RolloverError {
    fn from(err: PeriodParseError) -> Self {
        RolloverError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_id_navigation() {
        let dec = PeriodId::new(2024, 12);
        assert_eq!(dec.next(), PeriodId::new(2025, 1));
        assert_eq!(PeriodId::new(2025, 1).prev(), dec);
        assert_eq!(PeriodId::new(2025, 6).prev(), PeriodId::new(2025, 5));
    }

    #[test]
    fn test_period_id_ordering() {
        assert!(PeriodId::new(2024, 12) < PeriodId::new(2025, 1));
        assert!(PeriodId::new(2024, 5) < PeriodId::new(2024, 6));
        assert!(PeriodId::new(2025, 1) > PeriodId::new(2024, 11));
    }

    #[test]
    fn test_parse_and_display() {
        let id = PeriodId::parse("2024-06").unwrap();
        assert_eq!(id, PeriodId::new(2024, 6));
        assert_eq!(id.to_string(), "2024-06");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            PeriodId::parse("2024-13"),
            Err(PeriodParseError::InvalidMonth(13))
        );
        assert!(PeriodId::parse("2024-6").is_err());
        assert!(PeriodId::parse("garbage").is_err());
        assert!(PeriodId::parse("2024-W03").is_err());
        assert!(PeriodId::parse("").is_err());
    }

    #[test]
    fn test_serialized_as_string() {
        let id = PeriodId::new(2024, 5);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"2024-05\"");
        let back: PeriodId = serde_json::from_str("\"2024-05\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<PeriodId>("\"nope\"").is_err());
    }

    #[test]
    fn test_contains_is_half_open() {
        let period = Period {
            id: PeriodId::new(2024, 5),
            start: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        };
        assert!(period.contains(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()));
        assert!(period.contains(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
        assert_eq!(
            period.last_day(),
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
        );
    }
}
