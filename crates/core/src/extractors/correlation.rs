//! Correlation insights: the strongest pair and overall interconnectedness.

use serde_json::Value;

use crate::insights::generator::{generate_insight, Evidence, EvidenceValue, Insight, InsightKind};
use crate::insights::scoring::{MetricClass, Significance};
use crate::results::{as_number, as_object, AnalysisResults};

use super::{mean, vars, ExtractContext};

/// Calculate all correlation insights from the pattern-analysis slice.
pub fn extract_correlation_insights(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(i) = strongest_correlation(results, ctx) {
        insights.push(i);
    }
    if let Some(i) = interconnectedness(results, ctx) {
        insights.push(i);
    }

    insights
}

/// Parse a `[featureA, featureB, coefficient]` entry.
fn parse_pair(entry: &Value) -> Option<(String, String, f64)> {
    let items = entry.as_array()?;
    if items.len() != 3 {
        return None;
    }
    Some((
        items[0].as_str()?.to_string(),
        items[1].as_str()?.to_string(),
        as_number(&items[2])?,
    ))
}

fn business_impact(a: &str, b: &str, coefficient: f64) -> String {
    let r = coefficient.abs();
    if r > 0.8 {
        format!("Strong correlation between {a} and {b} suggests these measurements are highly related, potentially allowing for cost-effective single-feature measurement strategies.")
    } else if r > 0.5 {
        format!("Moderate correlation between {a} and {b} indicates some relationship that could be useful for predictive modeling.")
    } else {
        format!("Weak correlation between {a} and {b} suggests these features provide independent information for classification.")
    }
}

/// The pair with the largest absolute coefficient (first wins on ties).
fn strongest_correlation(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Option<Insight> {
    let Some(list) = results.pattern_slice("strong_correlations") else {
        tracing::debug!(extractor = "correlation", "No strong_correlations slice");
        return None;
    };
    let pairs: Vec<_> = list.as_array()?.iter().filter_map(parse_pair).collect();
    let (a, b, coefficient) = pairs
        .iter()
        .cloned()
        .reduce(|best, next| if next.2.abs() > best.2.abs() { next } else { best })?;

    let significance = ctx.classifier.classify(MetricClass::Correlation, coefficient);
    let direction = if coefficient > 0.0 { "positive" } else { "negative" };

    let vars = vars([
        ("feature_a", a.clone()),
        ("feature_b", b.clone()),
        ("direction", direction.to_string()),
        ("coefficient", coefficient.to_string()),
        ("impact", business_impact(&a, &b, coefficient)),
    ]);
    let evidence = Evidence::new()
        .with("correlation_coefficient", EvidenceValue::Metric(coefficient))
        .with("total_strong_correlations", EvidenceValue::Count(pairs.len() as u64))
        .with("feature_pair", EvidenceValue::FeaturePair { first: a, second: b });

    generate_insight(InsightKind::StrongCorrelation, &vars, significance, evidence)
}

/// Mean absolute off-diagonal coefficient over the upper triangle.
///
/// Features are taken in key order; a missing `[i][j]` cell falls back to
/// `[j][i]`, and pairs missing in both directions are skipped.
pub fn mean_abs_correlation(matrix: &serde_json::Map<String, Value>) -> Option<(f64, usize)> {
    let features: Vec<&String> = matrix.keys().collect();
    let mut values = Vec::new();

    for (i, fi) in features.iter().enumerate() {
        for fj in &features[i + 1..] {
            let cell = matrix[*fi]
                .get(fj.as_str())
                .and_then(as_number)
                .or_else(|| matrix[*fj].get(fi.as_str()).and_then(as_number));
            if let Some(r) = cell {
                values.push(r.abs());
            }
        }
    }

    mean(&values).map(|m| (m, values.len()))
}

fn interconnectedness(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Option<Insight> {
    let matrix = as_object(results.pattern_slice("correlation_matrix")?)?;
    let Some((average, pair_count)) = mean_abs_correlation(matrix) else {
        tracing::debug!(extractor = "correlation", "Correlation matrix has no usable pairs");
        return None;
    };
    if !average.is_finite() {
        tracing::debug!(extractor = "correlation", "Mean correlation is not finite");
        return None;
    }

    let significance = ctx.classifier.interconnectedness(average);
    let level = if significance >= Significance::Medium { "moderate" } else { "low" };

    let vars = vars([
        ("average", average.to_string()),
        ("level", level.to_string()),
        ("pair_count", pair_count.to_string()),
    ]);
    let evidence = Evidence::new()
        .with("average_correlation", EvidenceValue::Metric(average))
        .with("feature_count", EvidenceValue::Count(matrix.len() as u64))
        .with("pair_count", EvidenceValue::Count(pair_count as u64));

    generate_insight(InsightKind::Interconnectedness, &vars, significance, evidence)
}

// ============================================================================
// Tests
// ============================================================================
