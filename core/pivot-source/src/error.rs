//! FILENAME: core/pivot-source/src/error.rs

use pivot_engine::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet read error: {0}")]
    Xlsx(#[from] calamine::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Invalid pivot configuration: {0}")]
    Config(#[from] ConfigError),
}
