//! Insight extractors: rules that turn analysis-result slices into insights.
//!
//! Extractors are pure functions over `&AnalysisResults` (no I/O). Each
//! one reads the slices it owns, and emits nothing when a slice is
//! missing or a field has the wrong shape.

pub mod correlation;
pub mod distribution;
pub mod species;
pub mod outlier;
pub mod importance;

use std::collections::HashMap;
use std::fmt;

use crate::config::StoryText;
use crate::insights::generator::Insight;
use crate::insights::scoring::SignificanceClassifier;
use crate::results::AnalysisResults;

/// Shared inputs every extractor needs besides the results themselves.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    pub classifier: &'a SignificanceClassifier,
    pub text: &'a StoryText,
}

impl<'a> ExtractContext<'a> {
    pub fn new(classifier: &'a SignificanceClassifier, text: &'a StoryText) -> Self {
        Self { classifier, text }
    }

    /// Template variables naming the grouping (e.g. `species` / `Species`).
    fn group_vars(&self) -> [(&'static str, String); 2] {
        [
            ("group_label", self.text.group_label.clone()),
            ("group_title", capitalize(&self.text.group_label)),
        ]
    }
}

/// The five extractors, in the order their output is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Correlation,
    Distribution,
    Species,
    Outlier,
    FeatureImportance,
}

impl Extractor {
    pub const ORDER: [Extractor; 5] = [
        Self::Correlation,
        Self::Distribution,
        Self::Species,
        Self::Outlier,
        Self::FeatureImportance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Correlation => "correlation",
            Self::Distribution => "distribution",
            Self::Species => "species",
            Self::Outlier => "outlier",
            Self::FeatureImportance => "feature_importance",
        }
    }

    pub fn extract(&self, results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Vec<Insight> {
        match self {
            Self::Correlation => correlation::extract_correlation_insights(results, ctx),
            Self::Distribution => distribution::extract_distribution_insights(results, ctx),
            Self::Species => species::extract_species_insights(results, ctx),
            Self::Outlier => outlier::extract_outlier_insights(results, ctx),
            Self::FeatureImportance => importance::extract_importance_insights(results, ctx),
        }
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run every extractor in collection order and concatenate their output.
pub fn extract_all_insights(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Vec<Insight> {
    let mut insights = Vec::new();

    for extractor in Extractor::ORDER {
        let emitted = extractor.extract(results, ctx);
        tracing::debug!(
            extractor = extractor.name(),
            emitted = emitted.len(),
            "Extractor finished"
        );
        insights.extend(emitted);
    }

    insights
}

/// Helper: build a template variable map.
pub(crate) fn vars<const N: usize>(pairs: [(&str, String); N]) -> HashMap<String, String> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Helper: compute the mean of a slice, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
