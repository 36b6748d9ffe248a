//! FILENAME: core/pivot-engine/src/totals.rs
//! Totals derived from the aggregated matrix.
//!
//! Totals are not a second pass over the raw samples. Row totals are a
//! literal sum of whatever sits in the row's cells. Column totals re-apply
//! the value field's aggregation to the column's cell values:
//! - sum/count: literal sum
//! - avg: sum divided by the number of non-zero cells
//! - min: minimum over non-zero cells (0 when there are none)
//! - max: maximum over all cells
//!
//! A cell whose true minimum is 0 cannot be told apart from an empty cell,
//! so `min` ignores both.

use smallvec::SmallVec;

use crate::definition::AggregationType;
use crate::engine::{round_if_fractional, round_to_cents, PivotCell, PivotMatrix};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTotals {
    /// Per row: sum over every column and every value field.
    pub row_totals: Vec<f64>,
    /// Per row: sum of each value field across the columns.
    pub row_field_totals: Vec<PivotCell>,
    /// Per column: aggregation-aware total of each value field.
    pub column_totals: Vec<PivotCell>,
    /// Per value field: sum of its column totals.
    pub grand_totals: PivotCell,
}

/// Computes row, column and grand totals for `matrix`.
pub fn compute_totals(matrix: &PivotMatrix) -> PivotTotals {
    let width = matrix.value_fields.len();

    let row_totals: Vec<f64> = matrix
        .cells
        .iter()
        .map(|row| round_if_fractional(row.iter().flat_map(|cell| cell.values.iter()).sum()))
        .collect();

    let row_field_totals: Vec<PivotCell> = matrix
        .cells
        .iter()
        .map(|row| {
            (0..width)
                .map(|i| round_if_fractional(row.iter().map(|cell| cell.values[i]).sum()))
                .collect()
        })
        .collect();

    let column_totals: Vec<PivotCell> = (0..matrix.column_keys.len())
        .map(|column| {
            matrix
                .aggregations
                .iter()
                .enumerate()
                .map(|(i, agg)| {
                    let values: SmallVec<[f64; 16]> = matrix.column_values(column, i).collect();
                    column_total(&values, agg)
                })
                .collect()
        })
        .collect();

    let grand_totals: PivotCell = (0..width)
        .map(|i| round_to_cents(column_totals.iter().map(|totals| totals.values[i]).sum()))
        .collect();

    PivotTotals {
        row_totals,
        row_field_totals,
        column_totals,
        grand_totals,
    }
}

/// Total of one value field down one column.
pub fn column_total(values: &[f64], aggregation: &AggregationType) -> f64 {
    match aggregation {
        AggregationType::Sum => round_if_fractional(values.iter().sum()),
        AggregationType::Count => values.iter().sum(),
        AggregationType::Average => {
            let non_zero = values.iter().filter(|v| **v != 0.0).count();
            if non_zero == 0 {
                0.0
            } else {
                round_to_cents(values.iter().sum::<f64>() / non_zero as f64)
            }
        }
        AggregationType::Min => values
            .iter()
            .copied()
            .filter(|v| *v != 0.0)
            .reduce(f64::min)
            .unwrap_or(0.0),
        AggregationType::Max => values.iter().copied().reduce(f64::max).unwrap_or(0.0),
        AggregationType::Unsupported(_) => 0.0,
    }
}
