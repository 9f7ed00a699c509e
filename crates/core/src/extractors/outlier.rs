//! Outlier insights from per-feature outlier counts.
//!
//! Accepts either a flat `{feature: {count}}` mapping or one nested by
//! group, `{group: {feature: {count}}}`. Nested entries are reported as
//! `group/feature`.

use serde_json::{Map, Value};

use crate::insights::generator::{
    generate_insight, Evidence, EvidenceValue, Insight, InsightKind, RankedEntry,
};
use crate::insights::scoring::{MetricClass, Significance};
use crate::insights::templates::format_percent;
use crate::results::{as_count, AnalysisResults};

use super::{vars, ExtractContext};

/// Emits exactly one insight whenever the outlier slice is an object.
pub fn extract_outlier_insights(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Vec<Insight> {
    let Some(analysis) = results.outlier_analysis.as_object() else {
        tracing::debug!(extractor = "outlier", "No outlier analysis present");
        return Vec::new();
    };

    let affected = affected_features(analysis);
    let total = total_outliers(&affected);

    let insight = if total == 0 {
        clean_dataset()
    } else {
        outliers_found(results.dataset_size, total, affected, ctx)
    };

    insight.into_iter().collect()
}

/// Sum of the counts, saturating at `u64::MAX`.
pub fn total_outliers(affected: &[(String, u64)]) -> u64 {
    affected.iter().fold(0u64, |acc, (_, n)| acc.saturating_add(*n))
}

/// Features with a positive outlier count, largest count first.
pub fn affected_features(analysis: &Map<String, Value>) -> Vec<(String, u64)> {
    let mut affected = Vec::new();

    for (name, entry) in analysis {
        if let Some(count) = entry.get("count").and_then(as_count) {
            affected.push((name.clone(), count));
            continue;
        }
        let Some(features) = entry.as_object() else {
            continue;
        };
        for (feature, inner) in features {
            if let Some(count) = inner.get("count").and_then(as_count) {
                affected.push((format!("{name}/{feature}"), count));
            }
        }
    }

    affected.retain(|(_, n)| *n > 0);
    affected.sort_by(|a, b| b.1.cmp(&a.1));
    affected
}

fn outliers_found(
    dataset_size: u64,
    total: u64,
    affected: Vec<(String, u64)>,
    ctx: &ExtractContext<'_>,
) -> Option<Insight> {
    let rate = if dataset_size > 0 {
        total as f64 / dataset_size as f64
    } else {
        tracing::warn!(total, "Outliers reported for an empty dataset; rate taken as 0");
        0.0
    };

    let verdict = if rate < ctx.classifier.rules().clean_outlier_rate_below {
        "suggests good data quality"
    } else {
        "indicates potential data quality issues"
    };

    let vars = vars([
        ("total", total.to_string()),
        ("feature_count", affected.len().to_string()),
        ("rate_pct", format_percent(rate)),
        ("verdict", verdict.to_string()),
        ("rate", rate.to_string()),
    ]);
    let ranked = affected
        .into_iter()
        .map(|(name, count)| RankedEntry {
            name,
            value: count as f64,
        })
        .collect();
    let evidence = Evidence::new()
        .with("total_outliers", EvidenceValue::Count(total))
        .with("outlier_rate", EvidenceValue::Metric(rate))
        .with("affected_features", EvidenceValue::Ranked(ranked));

    let significance = ctx.classifier.classify(MetricClass::OutlierRate, rate);
    generate_insight(InsightKind::Outliers, &vars, significance, evidence)
}

fn clean_dataset() -> Option<Insight> {
    let evidence = Evidence::new()
        .with("total_outliers", EvidenceValue::Count(0))
        .with("outlier_rate", EvidenceValue::Metric(0.0));
    generate_insight(
        InsightKind::CleanDataset,
        &vars([]),
        Significance::Medium,
        evidence,
    )
}

// ============================================================================
// Tests
// ============================================================================
