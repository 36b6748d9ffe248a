//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot table calculation engine.
//!
//! Takes flat records plus a field assignment (rows, columns, values,
//! aggregations) and produces a cross-tabulated result with totals and a
//! multi-row column header layout. Pure computation: no I/O, no state
//! shared between calls.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot table IS)
//! - `record`: Source rows as delivered by the data source
//! - `resolver` / `key`: Field resolution and composite grouping keys
//! - `engine`: Grouping and aggregation (HOW we calculate)
//! - `totals`: Row, column and grand totals
//! - `header`: Column header tree and span layout
//! - `view`: Renderable output for the frontend (WHAT we display)

pub mod definition;
pub mod engine;
pub mod error;
pub mod header;
pub mod key;
pub mod record;
pub mod resolver;
pub mod totals;
pub mod view;

pub use definition::*;
pub use engine::{
    aggregate, generate_pivot, round_if_fractional, round_to_cents,
    AggregateAccumulator, PivotCell, PivotMatrix,
};
pub use error::{Axis, ConfigError};
pub use header::{build_header_tree, measure_label, HeaderCell, HeaderLayout, HeaderNode, HeaderTree};
pub use key::{compose_key, split_key, CompositeKey, KEY_DELIMITER};
pub use record::{FieldValue, Record};
pub use resolver::{resolve, DateLevel, ParsedDate, MISSING_LABEL};
pub use totals::{column_total, compute_totals, PivotTotals};
pub use view::PivotResult;
