//! FILENAME: core/pivot-engine/src/error.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three areas a field can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Rows,
    Columns,
    Values,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => f.write_str("rows"),
            Axis::Columns => f.write_str("columns"),
            Axis::Values => f.write_str("values"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Field '{field}' is assigned to both {first} and {second}")]
    FieldOnMultipleAxes {
        field: String,
        first: Axis,
        second: Axis,
    },

    #[error("Empty field name in {0}")]
    EmptyFieldName(Axis),
}
