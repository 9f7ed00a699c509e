//! Distribution insights: skewed features and variance spread.

use crate::insights::generator::{generate_insight, Evidence, EvidenceValue, Insight, InsightKind};
use crate::insights::scoring::Significance;
use crate::results::{as_number, as_object, AnalysisResults};

use super::{vars, ExtractContext};

pub fn extract_distribution_insights(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(i) = most_skewed_feature(results, ctx) {
        insights.push(i);
    }
    if let Some(i) = variability(results) {
        insights.push(i);
    }

    insights
}

/// Report the feature with the largest skew magnitude above the minimum.
fn most_skewed_feature(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Option<Insight> {
    let shapes = as_object(results.pattern_slice("distribution_shape")?)?;
    let min_magnitude = ctx.classifier.rules().skew_min_magnitude;

    let mut best: Option<(&str, f64)> = None;
    for (feature, shape) in shapes {
        let Some(skewness) = shape.get("skewness").and_then(as_number) else {
            continue;
        };
        if skewness.abs() <= min_magnitude {
            continue;
        }
        if best.map_or(true, |(_, s)| skewness.abs() > s.abs()) {
            best = Some((feature.as_str(), skewness));
        }
    }

    let Some((feature, skewness)) = best else {
        tracing::debug!(extractor = "distribution", min_magnitude, "No feature skewed past the minimum");
        return None;
    };
    let side = if skewness > 0.0 { "right" } else { "left" };

    let vars = vars([
        ("feature", feature.to_string()),
        ("side", side.to_string()),
        ("skewness", skewness.to_string()),
        ("min_magnitude", min_magnitude.to_string()),
    ]);
    let evidence = Evidence::new()
        .with("skewness", EvidenceValue::Metric(skewness))
        .with("feature", EvidenceValue::Feature(feature.to_string()));

    generate_insight(
        InsightKind::Skewness,
        &vars,
        ctx.classifier.skewness(skewness),
        evidence,
    )
}

fn variability(results: &AnalysisResults) -> Option<Insight> {
    let variance = results.summary_slice("feature_variance")?;
    let highest = variance.get("highest_variance")?.as_str().filter(|s| !s.is_empty())?;
    let lowest = variance.get("lowest_variance")?.as_str().filter(|s| !s.is_empty())?;

    let vars = vars([
        ("highest", highest.to_string()),
        ("lowest", lowest.to_string()),
    ]);
    let evidence = Evidence::new()
        .with("highest_variance", EvidenceValue::Feature(highest.to_string()))
        .with("lowest_variance", EvidenceValue::Feature(lowest.to_string()));

    generate_insight(InsightKind::Variability, &vars, Significance::Medium, evidence)
}

// ============================================================================
// Tests
// ============================================================================
