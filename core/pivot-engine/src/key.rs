//! FILENAME: core/pivot-engine/src/key.rs
//! Composite grouping keys.
//!
//! A key carries the ordered resolved values of a field list. Keys compare
//! element-wise, so a value containing the display delimiter cannot collide
//! with a neighbouring part. The joined string form only exists at the
//! output boundary.

use std::fmt;

use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::record::Record;
use crate::resolver::resolve;

/// Delimiter between parts in the display form of a key.
pub const KEY_DELIMITER: &str = " | ";

/// The resolved values of one row or column group, outer field first.
///
/// Ordering is part by part, which differs from sorting the joined display
/// strings when one value extends another: `New | x` sorts before
/// `New York | y` here, although the joined string `"New York | y"` is the
/// smaller of the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    parts: SmallVec<[String; 4]>,
}

impl CompositeKey {
    /// Resolves each field of `fields` against `record`.
    /// An empty field list yields the empty key.
    pub fn compose(record: &Record, fields: &[String]) -> Self {
        CompositeKey {
            parts: fields.iter().map(|field| resolve(record, field)).collect(),
        }
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CompositeKey {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(KEY_DELIMITER)?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

/// Keys cross the output boundary in their joined display form.
impl Serialize for CompositeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Joins resolved values of `fields` with `KEY_DELIMITER`.
pub fn compose_key(record: &Record, fields: &[String]) -> String {
    CompositeKey::compose(record, fields).to_string()
}

/// Splits a joined key back into its parts.
pub fn split_key(key: &str) -> Vec<&str> {
    key.split(KEY_DELIMITER).collect()
}
