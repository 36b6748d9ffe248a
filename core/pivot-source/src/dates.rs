//! FILENAME: core/pivot-source/src/dates.rs
//! Date normalization for uploaded datasets.
//!
//! Columns that look like dates are rewritten to `dd/mm/yyyy` text so the
//! engine's day-month-year resolver can read them. Spreadsheet serials use
//! the 1900 date system (day 0 = 1899-12-30).

use chrono::{Days, NaiveDate, NaiveDateTime};
use pivot_engine::{FieldValue, Record};

const DATE_MARKERS: [&str; 3] = ["date", " on", "dob"];

/// True when the header names a date column ("Order Date", "Created on", "DOB").
pub fn is_date_column(header: &str) -> bool {
    let lower = header.to_lowercase();
    DATE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Converts a spreadsheet serial to a calendar date. The time of day is dropped.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Parses `yyyy-mm-dd`, optionally followed by a time.
pub fn parse_iso(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Rewrites a date-column value. Values that are neither serials nor ISO
/// dates are returned unchanged.
pub fn normalize_date_value(value: FieldValue) -> FieldValue {
    let date = match &value {
        FieldValue::Number(serial) => serial_to_date(*serial),
        FieldValue::Text(text) => parse_iso(text),
        _ => None,
    };
    match date {
        Some(date) => FieldValue::Text(format_dmy(date)),
        None => value,
    }
}

/// Normalizes every date column of `records` in place.
pub fn normalize_records(records: &mut [Record]) {
    let Some(first) = records.first() else {
        return;
    };
    let date_columns: Vec<String> = first
        .field_names()
        .filter(|name| is_date_column(name))
        .map(str::to_string)
        .collect();
    if date_columns.is_empty() {
        return;
    }

    log::debug!("normalizing date columns: {:?}", date_columns);
    for record in records.iter_mut() {
        for column in &date_columns {
            if let Some(value) = record.get_mut(column) {
                *value = normalize_date_value(std::mem::replace(value, FieldValue::Empty));
            }
        }
    }
}
