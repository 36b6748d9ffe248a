//! FILENAME: core/pivot-engine/src/header.rs
//! Column header tree - nesting and span layout for multi-row headers.
//!
//! Two passes:
//! 1. `build_header_tree` nests the sorted column keys, one level per column
//!    field, and hangs one measure leaf per value field under each full key.
//! 2. `HeaderTree::layout` walks the tree depth-first and emits, per header
//!    row, the cells with their column and row spans.

use serde::{Deserialize, Serialize};

use crate::definition::PivotConfig;
use crate::key::CompositeKey;

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderNode {
    /// One segment of a column key. Children keep insertion order, which is
    /// the sorted key order. A group without children is a bare leaf (only
    /// possible when there are no value fields).
    Group {
        label: String,
        children: Vec<HeaderNode>,
    },
    /// One value field under a fully specified column key.
    Measure { value_field: String },
}

impl HeaderNode {
    fn group(label: &str) -> Self {
        HeaderNode::Group {
            label: label.to_string(),
            children: Vec::new(),
        }
    }

    /// Number of header rows this node and its descendants occupy.
    pub fn depth(&self) -> usize {
        match self {
            HeaderNode::Measure { .. } => 1,
            HeaderNode::Group { children, .. } => {
                1 + children.iter().map(HeaderNode::depth).max().unwrap_or(0)
            }
        }
    }

    /// Number of leaf columns beneath this node (itself, for a leaf).
    pub fn leaf_count(&self) -> usize {
        match self {
            HeaderNode::Measure { .. } => 1,
            HeaderNode::Group { children, .. } if children.is_empty() => 1,
            HeaderNode::Group { children, .. } => children.iter().map(HeaderNode::leaf_count).sum(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderTree {
    pub roots: Vec<HeaderNode>,
}

/// Finds the child group labelled `label`, creating it at the end if absent.
fn child_group<'a>(nodes: &'a mut Vec<HeaderNode>, label: &str) -> &'a mut Vec<HeaderNode> {
    let existing = nodes
        .iter()
        .rposition(|node| matches!(node, HeaderNode::Group { label: l, .. } if l == label));

    let idx = match existing {
        Some(idx) => idx,
        None => {
            nodes.push(HeaderNode::group(label));
            nodes.len() - 1
        }
    };

    match &mut nodes[idx] {
        HeaderNode::Group { children, .. } => children,
        HeaderNode::Measure { .. } => unreachable!("child_group only selects groups"),
    }
}

/// Nests `column_keys` into a tree, attaching measure leaves for
/// `value_fields` under every full key.
pub fn build_header_tree(column_keys: &[CompositeKey], value_fields: &[String]) -> HeaderTree {
    let mut roots = Vec::new();

    for key in column_keys {
        let mut level = &mut roots;
        for part in key.parts() {
            level = child_group(level, part);
        }

        if level.is_empty() {
            level.extend(value_fields.iter().map(|field| HeaderNode::Measure {
                value_field: field.clone(),
            }));
        }
    }

    HeaderTree { roots }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// One rendered header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub label: String,
    pub col_span: usize,
    pub row_span: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLayout {
    /// Header rows, top to bottom.
    pub rows: Vec<Vec<HeaderCell>>,
    pub depth: usize,
}

impl HeaderLayout {
    /// Sum of column spans in header row `row`.
    pub fn row_width(&self, row: usize) -> usize {
        self.rows
            .get(row)
            .map_or(0, |cells| cells.iter().map(|c| c.col_span).sum())
    }
}

/// Label of a measure header cell: "Sales (avg)".
pub fn measure_label(value_field: &str, config: &PivotConfig) -> String {
    format!("{} ({})", value_field, config.aggregation_for(value_field))
}

impl HeaderTree {
    pub fn depth(&self) -> usize {
        self.roots.iter().map(HeaderNode::depth).max().unwrap_or(0)
    }

    /// Computes the header rows.
    ///
    /// Groups with children span their leaf columns and one row. Leaves
    /// stretch down to the last header row. Measure leaves span one column;
    /// bare leaves (no value fields) span none, since no body column sits
    /// under them.
    pub fn layout(&self, value_fields: &[String], config: &PivotConfig) -> HeaderLayout {
        let depth = self.depth();
        let mut rows = vec![Vec::new(); depth];
        let has_values = !value_fields.is_empty();
        layout_level(&self.roots, 0, depth, has_values, config, &mut rows);
        HeaderLayout { rows, depth }
    }
}

fn layout_level(
    nodes: &[HeaderNode],
    level: usize,
    depth: usize,
    has_values: bool,
    config: &PivotConfig,
    rows: &mut [Vec<HeaderCell>],
) {
    for node in nodes {
        match node {
            HeaderNode::Group { label, children } if !children.is_empty() => {
                rows[level].push(HeaderCell {
                    label: label.clone(),
                    col_span: node.leaf_count(),
                    row_span: 1,
                });
                layout_level(children, level + 1, depth, has_values, config, rows);
            }
            HeaderNode::Group { label, .. } => {
                rows[level].push(HeaderCell {
                    label: label.clone(),
                    col_span: if has_values { 1 } else { 0 },
                    row_span: depth - level,
                });
            }
            HeaderNode::Measure { value_field } => {
                rows[level].push(HeaderCell {
                    label: measure_label(value_field, config),
                    col_span: 1,
                    row_span: depth - level,
                });
            }
        }
    }
}
