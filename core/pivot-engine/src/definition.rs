//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! This module contains the types that DESCRIBE a pivot table: which fields
//! group rows, which group columns, which are aggregated, and how.
//! These structures are designed to be:
//! - Serializable (sent by the field-assignment editor as JSON)
//! - Immutable snapshots of user intent for a single engine invocation

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Axis, ConfigError};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for value fields.
///
/// On the wire these are `sum`, `avg`, `count`, `min` and `max`. Any other
/// name becomes `Unsupported`, which aggregates to 0 instead of failing and
/// keeps the configured name for labels ("Sales (median)").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AggregationType {
    #[default]
    Sum,
    Average,
    Count,
    Min,
    Max,
    Unsupported(String),
}

impl AggregationType {
    /// The wire name, as used in measure header labels ("Sales (sum)").
    pub fn as_str(&self) -> &str {
        match self {
            AggregationType::Sum => "sum",
            AggregationType::Average => "avg",
            AggregationType::Count => "count",
            AggregationType::Min => "min",
            AggregationType::Max => "max",
            AggregationType::Unsupported(name) => name,
        }
    }

    /// Capitalized name used in total column captions ("Total Avg of Sales").
    pub fn caption(&self) -> &str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Average => "Avg",
            AggregationType::Count => "Count",
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
            AggregationType::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "sum" => AggregationType::Sum,
            "avg" => AggregationType::Average,
            "count" => AggregationType::Count,
            "min" => AggregationType::Min,
            "max" => AggregationType::Max,
            other => AggregationType::Unsupported(other.to_string()),
        })
    }
}

impl Serialize for AggregationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AggregationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or_default())
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The axis assignment produced by the configuration editor.
///
/// The three field lists are expected to be disjoint. The engine does not
/// enforce that; `validate` is available for callers that want to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotConfig {
    /// Fields placed in the Row area (ordered from outer to inner).
    #[serde(default)]
    pub row_fields: Vec<String>,

    /// Fields placed in the Column area (ordered from outer to inner).
    #[serde(default)]
    pub column_fields: Vec<String>,

    /// Fields placed in the Values area.
    #[serde(default)]
    pub value_fields: Vec<String>,

    /// Aggregation per value field. Missing entries mean `Sum`.
    #[serde(default)]
    pub aggregations: FxHashMap<String, AggregationType>,
}

impl PivotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.row_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn columns<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn values<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn aggregate(mut self, field: impl Into<String>, aggregation: AggregationType) -> Self {
        self.aggregations.insert(field.into(), aggregation);
        self
    }

    /// Returns the aggregation configured for `field`, falling back to `Sum`.
    pub fn aggregation_for(&self, field: &str) -> AggregationType {
        self.aggregations.get(field).cloned().unwrap_or_default()
    }

    /// True when no row or column grouping is configured.
    /// The engine has nothing to cross-tabulate in that case.
    pub fn has_no_axes(&self) -> bool {
        self.row_fields.is_empty() && self.column_fields.is_empty()
    }

    /// Checks that every field name is non-empty and appears on one axis only.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let axes = [
            (Axis::Rows, &self.row_fields),
            (Axis::Columns, &self.column_fields),
            (Axis::Values, &self.value_fields),
        ];

        let mut seen: FxHashMap<&str, Axis> = FxHashMap::default();
        for (axis, fields) in axes {
            for field in fields.iter() {
                if field.trim().is_empty() {
                    return Err(ConfigError::EmptyFieldName(axis));
                }
                if let Some(&first) = seen.get(field.as_str()) {
                    return Err(ConfigError::FieldOnMultipleAxes {
                        field: field.clone(),
                        first,
                        second: axis,
                    });
                }
                seen.insert(field.as_str(), axis);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_defaults_to_sum() {
        let config = PivotConfig::new()
            .values(["Sales", "Units"])
            .aggregate("Units", AggregationType::Average);

        assert_eq!(config.aggregation_for("Sales"), AggregationType::Sum);
        assert_eq!(config.aggregation_for("Units"), AggregationType::Average);
        assert_eq!(config.aggregation_for("Missing"), AggregationType::Sum);
    }

    #[test]
    fn test_aggregation_from_str() {
        assert_eq!("avg".parse::<AggregationType>().unwrap(), AggregationType::Average);
        assert_eq!("max".parse::<AggregationType>().unwrap(), AggregationType::Max);
        assert_eq!(
            "median".parse::<AggregationType>().unwrap(),
            AggregationType::Unsupported("median".to_string())
        );
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "rowFields": ["Region"],
            "valueFields": ["Sales", "Units"],
            "aggregations": { "Sales": "avg", "Units": "stddev" }
        }"#;
        let config: PivotConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.row_fields, vec!["Region".to_string()]);
        assert!(config.column_fields.is_empty());
        assert_eq!(config.aggregation_for("Sales"), AggregationType::Average);
        assert_eq!(
            config.aggregation_for("Units"),
            AggregationType::Unsupported("stddev".to_string())
        );
    }

    #[test]
    fn test_unsupported_keeps_configured_name() {
        let agg: AggregationType = "median".parse().unwrap();

        assert_eq!(agg.to_string(), "median");
        assert_eq!(agg.caption(), "median");
        assert_eq!(serde_json::to_string(&agg).unwrap(), "\"median\"");
    }

    #[test]
    fn test_validate_rejects_shared_field() {
        let config = PivotConfig::new().rows(["Region"]).columns(["Product"]).values(["Region"]);

        assert_eq!(
            config.validate(),
            Err(ConfigError::FieldOnMultipleAxes {
                field: "Region".to_string(),
                first: Axis::Rows,
                second: Axis::Values,
            })
        );
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let config = PivotConfig::new().rows(["Region"]).columns(["  "]);
        assert_eq!(config.validate(), Err(ConfigError::EmptyFieldName(Axis::Columns)));
    }

    #[test]
    fn test_validate_accepts_disjoint_axes() {
        let config = PivotConfig::new()
            .rows(["Region", "OrderDate_Year"])
            .columns(["Product"])
            .values(["Sales"]);
        assert!(config.validate().is_ok());
    }
}
