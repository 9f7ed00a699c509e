//! Significance classification.
//!
//! Raw metrics are mapped onto four ordinal tiers using per-metric-class
//! threshold tables:
//! - Correlation strength (signed; classified by magnitude)
//! - Variance explained
//! - Outlier rate
//!
//! The extractors' two-tier rules (skew, balance, interconnectedness) are
//! threshold lookups too, driven by [`RuleConfig`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::{RuleConfig, StoryConfig, ThresholdConfig, ThresholdTable};
use crate::error::StoryError;

/// Ordinal importance tier of an insight: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Low,
    Medium,
    High,
    Critical,
}

impl Significance {
    pub const ALL: [Significance; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// High and critical insights are key findings; the rest are supporting.
    pub fn is_key(self) -> bool {
        self >= Self::High
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric classes with a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricClass {
    Correlation,
    VarianceExplained,
    OutlierRate,
}

impl MetricClass {
    pub const ALL: [MetricClass; 3] = [Self::Correlation, Self::VarianceExplained, Self::OutlierRate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correlation => "correlation",
            Self::VarianceExplained => "variance_explained",
            Self::OutlierRate => "outlier_rate",
        }
    }

    /// Signed metrics are classified by magnitude.
    fn is_signed(self) -> bool {
        matches!(self, Self::Correlation)
    }
}

impl fmt::Display for MetricClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricClass {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "correlation" => Ok(Self::Correlation),
            "variance_explained" => Ok(Self::VarianceExplained),
            "outlier_rate" | "outlier_percentage" => Ok(Self::OutlierRate),
            _ => Err(StoryError::UnknownMetricClass { name: s.to_string() }),
        }
    }
}

/// Maps raw metric values onto significance tiers.
///
/// Built from validated tables; lookups are pure and total over `f64`
/// (NaN falls below every threshold and classifies as `Low`).
#[derive(Debug, Clone)]
pub struct SignificanceClassifier {
    thresholds: ThresholdConfig,
    rules: RuleConfig,
}

impl SignificanceClassifier {
    pub fn new(thresholds: ThresholdConfig, rules: RuleConfig) -> Result<Self, StoryError> {
        for class in MetricClass::ALL {
            table_for(&thresholds, class).validate(class.as_str())?;
        }
        Ok(Self { thresholds, rules })
    }

    pub fn from_config(config: &StoryConfig) -> Result<Self, StoryError> {
        Self::new(config.thresholds.clone(), config.rules.clone())
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn table(&self, class: MetricClass) -> &ThresholdTable {
        table_for(&self.thresholds, class)
    }

    /// Highest tier whose threshold `value` meets or exceeds; `Low` below all.
    pub fn classify(&self, class: MetricClass, value: f64) -> Significance {
        let value = if class.is_signed() { value.abs() } else { value };
        let table = self.table(class);
        if value >= table.critical {
            Significance::Critical
        } else if value >= table.high {
            Significance::High
        } else if value >= table.medium {
            Significance::Medium
        } else {
            Significance::Low
        }
    }

    /// Classify a metric named by text, failing fast on unknown classes.
    pub fn classify_named(&self, class: &str, value: f64) -> Result<Significance, StoryError> {
        Ok(self.classify(class.parse()?, value))
    }

    /// Skew insights: `High` above the high-magnitude cut-off, else `Medium`.
    pub fn skewness(&self, skewness: f64) -> Significance {
        if skewness.abs() > self.rules.skew_high_magnitude {
            Significance::High
        } else {
            Significance::Medium
        }
    }

    /// Balance insights: `High` when the min/max ratio is below the cut-off.
    pub fn balance(&self, ratio: f64) -> Significance {
        if ratio < self.rules.balance_high_below {
            Significance::High
        } else {
            Significance::Medium
        }
    }

    /// Interconnectedness: `Medium` above the mean-correlation cut-off, else `Low`.
    pub fn interconnectedness(&self, mean_abs_correlation: f64) -> Significance {
        if mean_abs_correlation > self.rules.interconnected_medium_above {
            Significance::Medium
        } else {
            Significance::Low
        }
    }
}

impl Default for SignificanceClassifier {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            rules: RuleConfig::default(),
        }
    }
}

fn table_for(thresholds: &ThresholdConfig, class: MetricClass) -> &ThresholdTable {
    match class {
        MetricClass::Correlation => &thresholds.correlation,
        MetricClass::VarianceExplained => &thresholds.variance_explained,
        MetricClass::OutlierRate => &thresholds.outlier_rate,
    }
}

// ============================================================================
// Tests
// ============================================================================
