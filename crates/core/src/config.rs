//! Engine configuration: threshold tables, rule cut-offs and story prose.
//!
//! Every section has defaults matching the Iris species study, so an empty
//! TOML document (or `StoryConfig::default()`) yields a working engine.
//!
//! ```toml
//! [thresholds.correlation]
//! low = 0.3
//! medium = 0.5
//! high = 0.7
//! critical = 0.9
//!
//! [rules]
//! skew_high_magnitude = 2.5
//!
//! [story]
//! dataset_label = "Penguin dataset"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::StoryError;

/// A four-tier threshold table. Tiers must be strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl ThresholdTable {
    pub const fn new(low: f64, medium: f64, high: f64, critical: f64) -> Self {
        Self {
            low,
            medium,
            high,
            critical,
        }
    }

    /// Reject tables with non-finite entries or tiers that do not strictly increase.
    pub fn validate(&self, class: &str) -> Result<(), StoryError> {
        let tiers = [
            ("low", self.low),
            ("medium", self.medium),
            ("high", self.high),
            ("critical", self.critical),
        ];
        for (name, value) in tiers {
            if !value.is_finite() {
                return Err(StoryError::invalid_thresholds(
                    class,
                    format!("{name} threshold is not a finite number"),
                ));
            }
        }
        for pair in tiers.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if upper <= lower {
                return Err(StoryError::invalid_thresholds(
                    class,
                    format!("{upper_name} ({upper}) must exceed {lower_name} ({lower})"),
                ));
            }
        }
        Ok(())
    }
}

/// Threshold tables, one per metric class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub correlation: ThresholdTable,
    pub variance_explained: ThresholdTable,
    pub outlier_rate: ThresholdTable,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            correlation: ThresholdTable::new(0.3, 0.5, 0.7, 0.9),
            variance_explained: ThresholdTable::new(0.2, 0.5, 0.7, 0.9),
            outlier_rate: ThresholdTable::new(0.01, 0.05, 0.1, 0.2),
        }
    }
}

/// Cut-offs for the two-tier rules the extractors apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Skewness magnitude a feature must exceed to be reported at all.
    pub skew_min_magnitude: f64,
    /// Skewness magnitude above which the skew insight is `high`.
    pub skew_high_magnitude: f64,
    /// Group balance ratio below which the balance insight is `high`.
    pub balance_high_below: f64,
    /// Group balance ratio above which the dataset is described as well-balanced.
    pub balanced_above: f64,
    /// Mean absolute correlation above which interconnectedness is `medium`.
    pub interconnected_medium_above: f64,
    /// Importance score below which the weakest features count as redundant.
    pub redundancy_max_importance: f64,
    /// Outlier rate below which the outlier insight reads as good data quality.
    pub clean_outlier_rate_below: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            skew_min_magnitude: 1.0,
            skew_high_magnitude: 2.0,
            balance_high_below: 0.7,
            balanced_above: 0.8,
            interconnected_medium_above: 0.5,
            redundancy_max_importance: 0.1,
            clean_outlier_rate_below: 0.05,
        }
    }
}

/// Fixed prose that names the studied dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryText {
    pub title: String,
    pub dataset_label: String,
    pub group_label: String,
    pub general_title: String,
    pub general_closing: String,
}

impl Default for StoryText {
    fn default() -> Self {
        Self {
            title: "Iris Species Classification: A Data-Driven Analysis".into(),
            dataset_label: "Iris dataset".into(),
            group_label: "species".into(),
            general_title: "Understanding Iris Flower Classification Through Data".into(),
            general_closing: "The analysis shows that iris flowers can be reliably identified using their physical measurements. This research demonstrates how data science can help us understand natural patterns and make accurate predictions.".into(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub thresholds: ThresholdConfig,
    pub rules: RuleConfig,
    pub story: StoryText,
}

impl StoryConfig {
    /// Parse a TOML document. Missing sections and keys fall back to defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, StoryError> {
        let config: Self = toml::from_str(source).map_err(|e| StoryError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StoryError> {
        self.thresholds.correlation.validate("correlation")?;
        self.thresholds
            .variance_explained
            .validate("variance_explained")?;
        self.thresholds.outlier_rate.validate("outlier_rate")?;

        let rules = &self.rules;
        if rules.skew_high_magnitude < rules.skew_min_magnitude {
            return Err(StoryError::InvalidConfig {
                message: format!(
                    "rules.skew_high_magnitude ({}) is below rules.skew_min_magnitude ({})",
                    rules.skew_high_magnitude, rules.skew_min_magnitude
                ),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
