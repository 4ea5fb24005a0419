//! Period key codec.
//!
//! A period key is a string like `"2024-03"`, `"2024-W07"`, `"2024-BW04"` or
//! `"2024-Q2"`. The formats are constructed so plain lexicographic order on
//! the key matches chronological order within a period type, which is the
//! only ordering the ledger ever uses. Encoding and parsing are exact
//! inverses: a key that does not re-encode to itself (wrong padding, stray
//! whitespace) is rejected.

use chrono::{Datelike, NaiveDate};
use shared::PeriodType;

use crate::domain::errors::DomainError;

/// A decoded period key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// ISO week numbering: the week containing the year's first Thursday is
    /// week 1
    Weekly { year: i32, week: u32 },
    /// ceil(ISO week / 2)
    Biweekly { year: i32, biweek: u32 },
    Monthly { year: i32, month: u32 },
    Quarterly { year: i32, quarter: u32 },
}

impl Period {
    pub fn period_type(&self) -> PeriodType {
        match self {
            Period::Weekly { .. } => PeriodType::Weekly,
            Period::Biweekly { .. } => PeriodType::Biweekly,
            Period::Monthly { .. } => PeriodType::Monthly,
            Period::Quarterly { .. } => PeriodType::Quarterly,
        }
    }

    /// Number of ISO weeks in a year (52 or 53). December 28th always falls
    /// in the last ISO week of its year.
    pub fn iso_weeks_in_year(year: i32) -> u32 {
        NaiveDate::from_ymd_opt(year, 12, 28)
            .map(|d| d.iso_week().week())
            .unwrap_or(52)
    }

    /// Encode to the sortable key string.
    pub fn key(&self) -> String {
        match *self {
            Period::Weekly { year, week } => format!("{year}-W{week:02}"),
            Period::Biweekly { year, biweek } => format!("{year}-BW{biweek:02}"),
            Period::Monthly { year, month } => format!("{year}-{month:02}"),
            Period::Quarterly { year, quarter } => format!("{year}-Q{quarter}"),
        }
    }

    /// Parse a key string back to a period. Rejects malformed keys and
    /// out-of-range components.
    pub fn parse(key: &str) -> Result<Period, DomainError> {
        let bad_key = || DomainError::validation(format!("Invalid period key: {key}"));

        let period = if let Some((year, rest)) = key.split_once("-BW") {
            let year = parse_year(year).ok_or_else(bad_key)?;
            let biweek: u32 = rest.parse().map_err(|_| bad_key())?;
            let max_biweeks = Self::iso_weeks_in_year(year).div_ceil(2);
            if biweek < 1 || biweek > max_biweeks {
                return Err(DomainError::validation(format!(
                    "Bi-weekly period out of range for {year}: {biweek} (max {max_biweeks})"
                )));
            }
            Period::Biweekly { year, biweek }
        } else if let Some((year, rest)) = key.split_once("-W") {
            let year = parse_year(year).ok_or_else(bad_key)?;
            let week: u32 = rest.parse().map_err(|_| bad_key())?;
            let max_weeks = Self::iso_weeks_in_year(year);
            if week < 1 || week > max_weeks {
                return Err(DomainError::validation(format!(
                    "Week out of range for {year}: {week} (max {max_weeks})"
                )));
            }
            Period::Weekly { year, week }
        } else if let Some((year, rest)) = key.split_once("-Q") {
            let year = parse_year(year).ok_or_else(bad_key)?;
            let quarter: u32 = rest.parse().map_err(|_| bad_key())?;
            if !(1..=4).contains(&quarter) {
                return Err(DomainError::validation(format!(
                    "Quarter out of range: {quarter}"
                )));
            }
            Period::Quarterly { year, quarter }
        } else if let Some((year, rest)) = key.split_once('-') {
            let year = parse_year(year).ok_or_else(bad_key)?;
            let month: u32 = rest.parse().map_err(|_| bad_key())?;
            if !(1..=12).contains(&month) {
                return Err(DomainError::validation(format!(
                    "Month out of range: {month}"
                )));
            }
            Period::Monthly { year, month }
        } else {
            return Err(bad_key());
        };

        // Exact-inverse requirement: the decoded period must re-encode to the
        // original key, otherwise the key would sort differently from its
        // canonical form.
        if period.key() != key {
            return Err(bad_key());
        }
        Ok(period)
    }

    /// The period of the given type containing `date`. Weekly and bi-weekly
    /// periods use the ISO week-year so keys around New Year stay
    /// chronological.
    pub fn for_date(period_type: PeriodType, date: NaiveDate) -> Period {
        match period_type {
            PeriodType::Weekly => {
                let iso = date.iso_week();
                Period::Weekly {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            PeriodType::Biweekly => {
                let iso = date.iso_week();
                Period::Biweekly {
                    year: iso.year(),
                    biweek: iso.week().div_ceil(2),
                }
            }
            PeriodType::Monthly => Period::Monthly {
                year: date.year(),
                month: date.month(),
            },
            PeriodType::Quarterly => Period::Quarterly {
                year: date.year(),
                quarter: (date.month() - 1) / 3 + 1,
            },
        }
    }
}

/// Years must be exactly four digits so keys sort lexicographically.
fn parse_year(text: &str) -> Option<i32> {
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
