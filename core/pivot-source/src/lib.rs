//! FILENAME: core/pivot-source/src/lib.rs
//! Pivot Source Module
//!
//! Loads datasets (spreadsheets, JSON) into engine records and reads pivot
//! configurations. All I/O lives here so the engine stays pure.

mod dates;
mod error;
mod json_reader;
mod xlsx_reader;

pub use dates::{format_dmy, is_date_column, normalize_date_value, normalize_records, serial_to_date};
pub use error::SourceError;
pub use json_reader::load_json;
pub use xlsx_reader::{load_workbook, records_from_range};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use pivot_engine::{PivotConfig, Record};

// ============================================================================
// SOURCE FORMAT
// ============================================================================

/// Dataset formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// xlsx, xlsm, xls, ods
    Workbook,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            "json" => Ok(SourceFormat::Json),
            _ => Err(SourceError::UnsupportedExtension(extension)),
        }
    }
}

// ============================================================================
// LOADERS
// ============================================================================

/// Loads the dataset at `path` and normalizes its date columns.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>, SourceError> {
    let path = path.as_ref();
    let mut records = match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => load_workbook(path)?,
        SourceFormat::Json => load_json(path)?,
    };
    normalize_records(&mut records);

    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Reads a pivot configuration from JSON and validates it.
pub fn load_config(path: impl AsRef<Path>) -> Result<PivotConfig, SourceError> {
    let path = path.as_ref();
    let config: PivotConfig = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    config.validate()?;

    log::debug!(
        "config {}: rows={:?} columns={:?} values={:?}",
        path.display(),
        config.row_fields,
        config.column_fields,
        config.value_fields
    );
    Ok(config)
}
