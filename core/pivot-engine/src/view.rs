//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Renderable output for the frontend.
//!
//! Bundles the matrix, its totals and the header layout. Serializes to the
//! renderer contract: keys as joined strings, cells and column totals as
//! `{ valueField: number }` objects.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::definition::AggregationType;
use crate::engine::{PivotCell, PivotMatrix};
use crate::header::{HeaderCell, HeaderLayout};
use crate::key::CompositeKey;
use crate::totals::PivotTotals;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotResult {
    pub row_keys: Vec<CompositeKey>,
    pub column_keys: Vec<CompositeKey>,
    pub value_fields: Vec<String>,
    pub aggregations: Vec<AggregationType>,
    pub matrix: Vec<Vec<PivotCell>>,
    pub row_totals: Vec<f64>,
    pub row_field_totals: Vec<PivotCell>,
    pub column_totals: Vec<PivotCell>,
    pub grand_totals: PivotCell,
    pub header: HeaderLayout,
}

impl PivotResult {
    pub fn new(matrix: PivotMatrix, totals: PivotTotals, header: HeaderLayout) -> Self {
        PivotResult {
            row_keys: matrix.row_keys,
            column_keys: matrix.column_keys,
            value_fields: matrix.value_fields,
            aggregations: matrix.aggregations,
            matrix: matrix.cells,
            row_totals: totals.row_totals,
            row_field_totals: totals.row_field_totals,
            column_totals: totals.column_totals,
            grand_totals: totals.grand_totals,
            header,
        }
    }

    /// True when the engine had nothing to cross-tabulate; the host should
    /// show the flat records instead.
    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty() && self.column_keys.is_empty()
    }

    pub fn header_rows(&self) -> &[Vec<HeaderCell>] {
        &self.header.rows
    }

    fn value_index(&self, field: &str) -> Option<usize> {
        self.value_fields.iter().position(|f| f == field)
    }

    /// Aggregated value of `field` at (`row`, `column`).
    pub fn cell(&self, row: usize, column: usize, field: &str) -> Option<f64> {
        let idx = self.value_index(field)?;
        self.matrix.get(row)?.get(column)?.get(idx)
    }

    pub fn column_total(&self, column: usize, field: &str) -> Option<f64> {
        let idx = self.value_index(field)?;
        self.column_totals.get(column)?.get(idx)
    }

    pub fn grand_total(&self, field: &str) -> Option<f64> {
        let idx = self.value_index(field)?;
        self.grand_totals.get(idx)
    }

    /// Caption for a row-total column: "Total Avg of Sales".
    pub fn total_label(&self, field: &str) -> Option<String> {
        let idx = self.value_index(field)?;
        Some(format!("Total {} of {}", self.aggregations[idx].caption(), field))
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

/// A cell paired with the value field names, serialized as a map.
struct MeasureMap<'a> {
    fields: &'a [String],
    cell: &'a PivotCell,
}

impl Serialize for MeasureMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (field, value) in self.fields.iter().zip(self.cell.values.iter()) {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

fn measure_maps<'a>(fields: &'a [String], cells: &'a [PivotCell]) -> Vec<MeasureMap<'a>> {
    cells.iter().map(|cell| MeasureMap { fields, cell }).collect()
}

impl Serialize for PivotResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.value_fields.as_slice();
        let matrix: Vec<Vec<MeasureMap<'_>>> =
            self.matrix.iter().map(|row| measure_maps(fields, row)).collect();

        let mut state = serializer.serialize_struct("PivotResult", 10)?;
        state.serialize_field("rowKeys", &self.row_keys)?;
        state.serialize_field("columnKeys", &self.column_keys)?;
        state.serialize_field("valueFields", &self.value_fields)?;
        state.serialize_field("matrix", &matrix)?;
        state.serialize_field("rowTotals", &self.row_totals)?;
        state.serialize_field("rowFieldTotals", &measure_maps(fields, &self.row_field_totals))?;
        state.serialize_field("columnTotals", &measure_maps(fields, &self.column_totals))?;
        state.serialize_field(
            "grandTotals",
            &MeasureMap {
                fields,
                cell: &self.grand_totals,
            },
        )?;
        state.serialize_field("headerRows", &self.header.rows)?;
        state.serialize_field("headerDepth", &self.header.depth)?;
        state.end()
    }
}
