//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns records into a pivot.
//!
//! Algorithm:
//! 1. Compose a row key and a column key for every record
//! 2. Accumulate numeric samples per (row, column) bucket and value field
//! 3. Sort the distinct keys and reduce every bucket (including empty ones)
//!    to one scalar per value field
//! 4. Derive row/column/grand totals from the reduced matrix
//! 5. Build the column header tree and lay it out
//!
//! Every call builds its intermediate state from scratch; nothing is cached
//! between invocations.

use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::definition::{AggregationType, PivotConfig};
use crate::header::{build_header_tree, HeaderLayout};
use crate::key::CompositeKey;
use crate::record::Record;
use crate::totals::compute_totals;
use crate::view::PivotResult;

// ============================================================================
// NUMERIC HELPERS
// ============================================================================

/// Rounds to two decimal places, half away from zero, on the exact binary
/// value: 0.015 is stored just below 0.015 and becomes 0.01, 0.125 is exact
/// and becomes 0.13. Values outside the decimal range are returned as is.
pub fn round_to_cents(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_string().parse::<f64>().ok())
        .unwrap_or(value)
}

/// Rounds to two decimal places only when the value has a fraction.
pub fn round_if_fractional(value: f64) -> f64 {
    if value.fract() == 0.0 {
        value
    } else {
        round_to_cents(value)
    }
}

// ============================================================================
// AGGREGATE ACCUMULATOR
// ============================================================================

/// Running state for one value field in one bucket.
/// Folding samples in record order gives the same result as reducing the
/// collected sample list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Reduces the samples seen so far. Empty accumulators yield 0.
    pub fn compute(&self, aggregation: &AggregationType) -> f64 {
        match aggregation {
            AggregationType::Sum => round_if_fractional(self.sum),
            AggregationType::Average => {
                if self.count > 0 {
                    round_if_fractional(self.sum / self.count as f64)
                } else {
                    0.0
                }
            }
            AggregationType::Count => self.count as f64,
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
            AggregationType::Unsupported(_) => 0.0,
        }
    }
}

// ============================================================================
// MATRIX TYPES
// ============================================================================

/// One aggregated scalar per value field, in value-field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotCell {
    pub values: SmallVec<[f64; 4]>,
}

impl PivotCell {
    pub fn zeros(width: usize) -> Self {
        PivotCell {
            values: SmallVec::from_elem(0.0, width),
        }
    }

    pub fn get(&self, value_index: usize) -> Option<f64> {
        self.values.get(value_index).copied()
    }
}

impl FromIterator<f64> for PivotCell {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        PivotCell {
            values: iter.into_iter().collect(),
        }
    }
}

/// The dense cross-tabulation: `cells[row][column]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotMatrix {
    /// Distinct row keys, ascending.
    pub row_keys: Vec<CompositeKey>,
    /// Distinct column keys, ascending.
    pub column_keys: Vec<CompositeKey>,
    pub value_fields: Vec<String>,
    /// Effective aggregation per value field (same order as `value_fields`).
    pub aggregations: Vec<AggregationType>,
    pub cells: Vec<Vec<PivotCell>>,
}

impl PivotMatrix {
    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty() && self.column_keys.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&PivotCell> {
        self.cells.get(row).and_then(|r| r.get(column))
    }

    /// Values of one value field down a column, in row order.
    pub fn column_values(&self, column: usize, value_index: usize) -> impl Iterator<Item = f64> + '_ {
        self.cells
            .iter()
            .map(move |row| row[column].values[value_index])
    }
}

// ============================================================================
// GROUP INDEX
// ============================================================================

/// Interns composite keys in first-seen order.
#[derive(Default)]
struct GroupIndex {
    keys: Vec<CompositeKey>,
    lookup: FxHashMap<CompositeKey, usize>,
}

impl GroupIndex {
    fn intern(&mut self, key: CompositeKey) -> usize {
        if let Some(&idx) = self.lookup.get(&key) {
            return idx;
        }
        let idx = self.keys.len();
        self.lookup.insert(key.clone(), idx);
        self.keys.push(key);
        idx
    }

    /// Returns the keys in ascending order plus a map from interned index
    /// to sorted position.
    fn into_sorted(self) -> (Vec<CompositeKey>, Vec<usize>) {
        let mut indexed: Vec<(CompositeKey, usize)> = self
            .keys
            .into_iter()
            .enumerate()
            .map(|(idx, key)| (key, idx))
            .collect();
        indexed.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut position = vec![0; indexed.len()];
        for (sorted, (_, original)) in indexed.iter().enumerate() {
            position[*original] = sorted;
        }
        (indexed.into_iter().map(|(key, _)| key).collect(), position)
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Groups `records` by row and column keys and reduces every bucket.
///
/// Returns an empty matrix when there are no records or neither row nor
/// column fields are configured. Non-numeric values in a value field are
/// skipped; the record still creates its row and column groups.
pub fn aggregate(records: &[Record], config: &PivotConfig) -> PivotMatrix {
    let value_fields = config.value_fields.clone();
    let aggregations: Vec<AggregationType> = value_fields
        .iter()
        .map(|field| config.aggregation_for(field))
        .collect();

    if records.is_empty() || config.has_no_axes() {
        return PivotMatrix {
            value_fields,
            aggregations,
            ..PivotMatrix::default()
        };
    }

    let width = value_fields.len();
    let mut rows = GroupIndex::default();
    let mut columns = GroupIndex::default();
    let mut buckets: FxHashMap<(usize, usize), SmallVec<[AggregateAccumulator; 4]>> =
        FxHashMap::default();
    let mut skipped = 0usize;

    for record in records {
        let row = rows.intern(CompositeKey::compose(record, &config.row_fields));
        let column = columns.intern(CompositeKey::compose(record, &config.column_fields));

        let accumulators = buckets
            .entry((row, column))
            .or_insert_with(|| SmallVec::from_elem(AggregateAccumulator::new(), width));

        for (acc, field) in accumulators.iter_mut().zip(&value_fields) {
            match record.get(field).and_then(|v| v.as_number()) {
                Some(n) => acc.add_number(n),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        log::trace!("skipped {} non-numeric value samples", skipped);
    }

    let (row_keys, row_position) = rows.into_sorted();
    let (column_keys, column_position) = columns.into_sorted();

    // Every aggregation reduces an empty sample list to 0, so unpopulated
    // buckets keep their zero fill.
    let mut cells = vec![vec![PivotCell::zeros(width); column_keys.len()]; row_keys.len()];
    for ((row, column), accumulators) in &buckets {
        let cell = &mut cells[row_position[*row]][column_position[*column]];
        for (i, acc) in accumulators.iter().enumerate() {
            cell.values[i] = acc.compute(&aggregations[i]);
        }
    }

    PivotMatrix {
        row_keys,
        column_keys,
        value_fields,
        aggregations,
        cells,
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Runs the whole pipeline: aggregation, totals and header layout.
/// This is the main entry point for the calculation engine.
pub fn generate_pivot(records: &[Record], config: &PivotConfig) -> PivotResult {
    let matrix = aggregate(records, config);
    let totals = compute_totals(&matrix);

    let header = if matrix.is_empty() {
        HeaderLayout::default()
    } else {
        build_header_tree(&matrix.column_keys, &matrix.value_fields)
            .layout(&matrix.value_fields, config)
    };

    log::debug!(
        "pivot: records={} rows={} columns={} values={} header_rows={}",
        records.len(),
        matrix.row_keys.len(),
        matrix.column_keys.len(),
        matrix.value_fields.len(),
        header.rows.len()
    );

    PivotResult::new(matrix, totals, header)
}
