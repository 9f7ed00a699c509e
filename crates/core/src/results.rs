//! Snapshot of upstream analysis results consumed by the extractors.
//!
//! Slices are kept as untyped JSON and read leniently: a missing key or a
//! value of the wrong shape reads as `None`, and the extractor that owns the
//! slice skips the affected insight.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoryError;

/// One analysis run's worth of upstream results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResults {
    /// Number of rows in the analysed dataset (outlier rate denominator).
    pub dataset_size: u64,
    /// `feature_variance`, `species_analysis`.
    pub summary_stats: Value,
    /// `strong_correlations`, `correlation_matrix`, `distribution_shape`.
    pub pattern_analysis: Value,
    /// `{feature: {count}}` or `{group: {feature: {count}}}`.
    pub outlier_analysis: Value,
    /// `{feature: score}`.
    pub feature_importance: Value,
}

impl AnalysisResults {
    /// Parse a results document. The top level must be a JSON object.
    pub fn from_json_str(source: &str) -> Result<Self, StoryError> {
        let value: Value = serde_json::from_str(source)
            .map_err(|e| StoryError::malformed(format!("not valid JSON: {e}")))?;
        if !value.is_object() {
            return Err(StoryError::malformed("top level must be a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| StoryError::malformed(e.to_string()))
    }

    pub fn summary_slice(&self, key: &str) -> Option<&Value> {
        self.summary_stats.get(key)
    }

    pub fn pattern_slice(&self, key: &str) -> Option<&Value> {
        self.pattern_analysis.get(key)
    }
}

/// Read a value as a JSON object, `None` for any other shape.
pub fn as_object(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object().filter(|m| !m.is_empty())
}

/// Read a numeric value, accepting integers and floats.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}

/// Read a non-negative whole count, accepting `4` and `4.0`.
pub fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as u64)
}

/// Read a `{label: number}` mapping, dropping entries that are not numeric.
pub fn numeric_map(value: &Value) -> Vec<(String, f64)> {
    value
        .as_object()
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| as_number(v).map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
