//! FILENAME: core/pivot-source/src/xlsx_reader.rs
//! Spreadsheet reader: first worksheet as a list of records.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use pivot_engine::{FieldValue, Record};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::SourceError;

/// Header used for a blank header cell.
const BLANK_HEADER: &str = "__EMPTY";

pub fn load_workbook(path: &Path) -> Result<Vec<Record>, SourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceError::InvalidFormat("Workbook contains no sheets".to_string()))??;

    Ok(records_from_range(&range))
}

/// Converts a worksheet range to records. The first row holds the headers;
/// cells missing from a data row default to empty text and fully blank rows
/// are skipped.
pub fn records_from_range(range: &Range<Data>) -> Vec<Record> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers = unique_headers(header_row);

    rows.filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(col, header)| {
                    let value = row.get(col).map_or_else(|| FieldValue::text(""), cell_value);
                    (header.clone(), value)
                })
                .collect()
        })
        .collect()
}

fn cell_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty => FieldValue::text(""),
        Data::String(s) => FieldValue::text(s.clone()),
        Data::Float(f) => FieldValue::Number(*f),
        Data::Int(i) => FieldValue::Number(*i as f64),
        Data::Bool(b) => FieldValue::Boolean(*b),
        Data::Error(e) => FieldValue::text(format!("{:?}", e)),
        Data::DateTime(dt) => FieldValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => FieldValue::text(s.clone()),
        Data::DurationIso(s) => FieldValue::text(s.clone()),
    }
}

/// Header texts with blanks named `__EMPTY` and repeats suffixed `_1`, `_2`...
/// A suffix already taken by a literal header is skipped.
fn unique_headers(row: &[Data]) -> Vec<String> {
    let mut used: FxHashSet<String> = FxHashSet::default();
    let mut repeats: FxHashMap<String, usize> = FxHashMap::default();
    row.iter()
        .map(|cell| {
            let base = match cell {
                Data::Empty => BLANK_HEADER.to_string(),
                other => other.to_string().trim().to_string(),
            };
            let mut name = base.clone();
            let suffix = repeats.entry(base.clone()).or_insert(0);
            while used.contains(&name) {
                *suffix += 1;
                name = format!("{}_{}", base, suffix);
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn test_header_row_becomes_field_names() {
        let range = range(vec![
            vec![s("Region"), s("Sales"), s("Active")],
            vec![s("East"), Data::Float(10.5), Data::Bool(true)],
            vec![s("West"), Data::Int(7), Data::Empty],
        ]);
        let records = records_from_range(&range);

        assert_eq!(records.len(), 2);
        let names: Vec<&str> = records[0].field_names().collect();
        assert_eq!(names, vec!["Region", "Sales", "Active"]);
        assert_eq!(records[0].get("Sales"), Some(&FieldValue::Number(10.5)));
        assert_eq!(records[0].get("Active"), Some(&FieldValue::Boolean(true)));
        assert_eq!(records[1].get("Sales"), Some(&FieldValue::Number(7.0)));
        assert_eq!(records[1].get("Active"), Some(&FieldValue::text("")));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let range = range(vec![
            vec![s("Region")],
            vec![Data::Empty],
            vec![s("North")],
        ]);
        let records = records_from_range(&range);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Region"), Some(&FieldValue::text("North")));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let headers = unique_headers(&[s("Sales"), Data::Empty, s("Sales"), s(" Sales ")]);
        assert_eq!(headers, vec!["Sales", "__EMPTY", "Sales_1", "Sales_2"]);
    }

    #[test]
    fn test_suffix_skips_literal_header() {
        let headers = unique_headers(&[s("Sales"), s("Sales_1"), s("Sales"), s("Sales_1")]);
        assert_eq!(headers, vec!["Sales", "Sales_1", "Sales_2", "Sales_1_1"]);
    }

    #[test]
    fn test_colliding_headers_keep_every_column() {
        let range = range(vec![
            vec![s("Sales"), s("Sales_1"), s("Sales")],
            vec![Data::Int(1), Data::Int(2), Data::Int(3)],
        ]);
        let records = records_from_range(&range);

        let names: Vec<&str> = records[0].field_names().collect();
        assert_eq!(names, vec!["Sales", "Sales_1", "Sales_2"]);
        assert_eq!(records[0].get("Sales_2"), Some(&FieldValue::Number(3.0)));
    }

    #[test]
    fn test_empty_range() {
        assert!(records_from_range(&Range::empty()).is_empty());
    }
}
