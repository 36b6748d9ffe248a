//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the pivot engine integration tests.

#![allow(dead_code)]

use pivot_engine::{FieldValue, Record};

/// Sample sales data: (region, product, order date, sales, units).
pub struct SalesFixture;

impl SalesFixture {
    pub fn rows() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("East", "Apples", "15-01-2023", 100.0, 10.0),
            ("East", "Apples", "20-02-2023", 50.5, 4.0),
            ("East", "Oranges", "03-05-2023", 75.0, 6.0),
            ("West", "Apples", "11-08-2023", 120.0, 12.0),
            ("West", "Pears", "30-11-2022", 42.25, 3.0),
            ("North", "Oranges", "01/04/2022", 60.0, 5.0),
            ("North", "Pears", "not-a-date", 10.0, 1.0),
        ]
    }

    pub fn records() -> Vec<Record> {
        Self::rows()
            .into_iter()
            .map(|(region, product, date, sales, units)| {
                Record::new()
                    .with("Region", region)
                    .with("Product", product)
                    .with("OrderDate", date)
                    .with("Sales", sales)
                    .with("Units", units)
            })
            .collect()
    }

    /// Same data with non-numeric noise in the value fields.
    pub fn polluted_records() -> Vec<Record> {
        let mut records = Self::records();
        records.push(
            Record::new()
                .with("Region", "East")
                .with("Product", "Apples")
                .with("OrderDate", "01-01-2023")
                .with("Sales", "twelve")
                .with("Units", FieldValue::Empty),
        );
        records
    }

    pub fn total_sales() -> f64 {
        Self::rows().iter().map(|r| r.3).sum()
    }
}

pub fn strings(keys: &[impl ToString]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}
