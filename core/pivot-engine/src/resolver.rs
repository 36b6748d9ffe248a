//! FILENAME: core/pivot-engine/src/resolver.rs
//! Field resolution - maps a field name to its effective value for a record.
//!
//! Field names ending in `_Year`, `_Quarter` or `_Month` are derived date
//! levels: the suffix is stripped and the base field is parsed as a
//! day-month-year date. Everything else is a direct lookup.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::record::Record;

/// Label used for missing values and unparseable dates.
pub const MISSING_LABEL: &str = "N/A";

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

// ============================================================================
// DATE LEVELS
// ============================================================================

/// Levels of the derived date hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateLevel {
    Year,
    Quarter,
    Month,
}

impl DateLevel {
    pub const ALL: [DateLevel; 3] = [DateLevel::Year, DateLevel::Quarter, DateLevel::Month];

    pub fn suffix(self) -> &'static str {
        match self {
            DateLevel::Year => "_Year",
            DateLevel::Quarter => "_Quarter",
            DateLevel::Month => "_Month",
        }
    }

    /// Splits a derived field name into its base field and level.
    /// Returns `None` for ordinary field names.
    pub fn split_field(field: &str) -> Option<(&str, DateLevel)> {
        DateLevel::ALL
            .into_iter()
            .find_map(|level| field.strip_suffix(level.suffix()).map(|base| (base, level)))
    }

    /// The derived field name for `base` at this level ("OrderDate_Year").
    pub fn field_name(self, base: &str) -> String {
        format!("{}{}", base, self.suffix())
    }

    pub fn label(self, date: &ParsedDate) -> String {
        match self {
            DateLevel::Year => date.year.to_string(),
            DateLevel::Quarter => format!("Q{}", date.quarter()),
            DateLevel::Month => date.month_name().to_string(),
        }
    }
}

// ============================================================================
// DATE PARSING
// ============================================================================

/// A calendar date recovered from a day-month-year string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    pub day: u32,
}

impl ParsedDate {
    /// Parses `dd-mm-yyyy` or `dd/mm/yyyy`.
    ///
    /// Components must be positive integers. Out-of-range days and months
    /// roll over into the following month/year ("31-02-2023" is 3 March),
    /// and two-digit years land in the 1900s.
    pub fn parse_dmy(text: &str) -> Option<ParsedDate> {
        let parts: SmallVec<[&str; 3]> = text.split(['-', '/']).collect();
        if parts.len() != 3 {
            return None;
        }

        let day: u32 = parts[0].trim().parse().ok()?;
        let month: u32 = parts[1].trim().parse().ok()?;
        let year: u32 = parts[2].trim().parse().ok()?;
        if day == 0 || month == 0 || year == 0 {
            return None;
        }

        let year = if year < 100 { year + 1900 } else { year };
        let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, 1, 1)?
            .checked_add_months(Months::new(month - 1))?
            .checked_add_days(Days::new(u64::from(day - 1)))?;

        Some(ParsedDate::from(date))
    }

    pub fn quarter(&self) -> u32 {
        (self.month - 1) / 3 + 1
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize - 1]
    }
}

impl From<NaiveDate> for ParsedDate {
    fn from(date: NaiveDate) -> Self {
        ParsedDate {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Resolves `field` against `record`.
///
/// Derived date fields read their base field and yield the year, quarter
/// label or month name. Missing values and malformed dates resolve to
/// `MISSING_LABEL`. Never fails.
pub fn resolve(record: &Record, field: &str) -> String {
    if let Some((base, level)) = DateLevel::split_field(field) {
        return record
            .get(base)
            .and_then(|value| value.as_text())
            .and_then(ParsedDate::parse_dmy)
            .map(|date| level.label(&date))
            .unwrap_or_else(|| MISSING_LABEL.to_string());
    }

    record
        .get(field)
        .and_then(|value| value.group_label())
        .unwrap_or_else(|| MISSING_LABEL.to_string())
}
