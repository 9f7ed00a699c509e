//! Group insights: class balance and the most discriminating feature.
//!
//! Reads `summary_stats.species_analysis`:
//! - `distribution`: `{group: count}`
//! - `measurement_means`: `{feature: {group: mean}}`

use std::collections::BTreeMap;

use serde_json::Value;

use crate::insights::generator::{generate_insight, Evidence, EvidenceValue, Insight, InsightKind};
use crate::insights::scoring::Significance;
use crate::results::{as_object, numeric_map, AnalysisResults};

use super::{vars, ExtractContext};

pub fn extract_species_insights(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Vec<Insight> {
    let mut insights = Vec::new();

    let Some(analysis) = results.summary_slice("species_analysis") else {
        return insights;
    };

    if let Some(i) = group_balance(analysis, ctx) {
        insights.push(i);
    }
    if let Some(i) = discriminating_feature(analysis, ctx) {
        insights.push(i);
    }

    insights
}

/// Ratio of the smallest to the largest group count; 0 when the largest is 0.
pub fn balance_ratio(counts: &[f64]) -> Option<f64> {
    let min = counts.iter().copied().reduce(f64::min)?;
    let max = counts.iter().copied().reduce(f64::max)?;
    Some(if max > 0.0 { min / max } else { 0.0 })
}

fn group_balance(analysis: &Value, ctx: &ExtractContext<'_>) -> Option<Insight> {
    let distribution = numeric_map(analysis.get("distribution")?);
    let counts: Vec<f64> = distribution.iter().map(|(_, n)| *n).collect();
    let Some(ratio) = balance_ratio(&counts) else {
        tracing::debug!(extractor = "species", "Empty group distribution");
        return None;
    };
    let total: f64 = counts.iter().sum();
    if !(ratio.is_finite() && total.is_finite()) {
        tracing::debug!(extractor = "species", "Group counts out of range");
        return None;
    }
    let rules = ctx.classifier.rules();

    let verdict = if ratio > rules.balanced_above {
        "This indicates a well-balanced dataset".to_string()
    } else {
        format!("This suggests some imbalance between {}", ctx.text.group_label)
    };

    let mut vars = vars([
        ("group_count", distribution.len().to_string()),
        ("ratio", ratio.to_string()),
        ("verdict", verdict),
        ("cutoff", rules.balance_high_below.to_string()),
    ]);
    vars.extend(ctx.group_vars().map(|(k, v)| (k.to_string(), v)));

    let evidence = Evidence::new()
        .with("distribution", EvidenceValue::Distribution(distribution.into_iter().collect()))
        .with("balance_ratio", EvidenceValue::Metric(ratio))
        .with("total_samples", EvidenceValue::Metric(total));

    generate_insight(InsightKind::GroupBalance, &vars, ctx.classifier.balance(ratio), evidence)
}

/// The feature whose per-group means span the widest range.
///
/// Only features measured for more than one group are considered, and a
/// zero or non-finite spread never qualifies. Ties keep the first feature in
/// key order.
pub fn widest_spread(means: &serde_json::Map<String, Value>) -> Option<(&str, f64, BTreeMap<String, f64>)> {
    let mut best: Option<(&str, f64, BTreeMap<String, f64>)> = None;

    for (feature, per_group) in means {
        let group_means = numeric_map(per_group);
        if group_means.len() < 2 {
            continue;
        }
        let values: Vec<f64> = group_means.iter().map(|(_, m)| *m).collect();
        let (Some(lo), Some(hi)) = (
            values.iter().copied().reduce(f64::min),
            values.iter().copied().reduce(f64::max),
        ) else {
            continue;
        };
        let spread = hi - lo;
        if !spread.is_finite() {
            tracing::debug!(extractor = "species", feature = %feature, "Spread is not finite");
            continue;
        }
        if spread > best.as_ref().map_or(0.0, |(_, s, _)| *s) {
            best = Some((feature.as_str(), spread, group_means.into_iter().collect()));
        }
    }

    best
}

fn discriminating_feature(analysis: &Value, ctx: &ExtractContext<'_>) -> Option<Insight> {
    let means = as_object(analysis.get("measurement_means")?)?;
    let (feature, spread, group_means) = widest_spread(means)?;

    let mut vars = vars([("feature", feature.to_string()), ("spread", spread.to_string())]);
    vars.extend(ctx.group_vars().map(|(k, v)| (k.to_string(), v)));

    let evidence = Evidence::new()
        .with("discriminator", EvidenceValue::Feature(feature.to_string()))
        .with("variation", EvidenceValue::Metric(spread))
        .with("means", EvidenceValue::Distribution(group_means));

    generate_insight(InsightKind::Discriminator, &vars, Significance::High, evidence)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoryText;
    use crate::extractors::test_helpers::*;
    use serde_json::json;

    fn run_with(text: &StoryText, species_analysis: Value) -> Vec<Insight> {
        let c = classifier();
        let ctx = ExtractContext::new(&c, text);
        let results = results_with(
            json!({"species_analysis": species_analysis}),
            Value::Null,
            Value::Null,
            Value::Null,
        );
        extract_species_insights(&results, &ctx)
    }

    fn run(species_analysis: Value) -> Vec<Insight> {
        run_with(&text(), species_analysis)
    }

    #[test]
    fn test_balanced_iris() {
        let insights = run(json!({"distribution": {
            "Iris-setosa": 50, "Iris-versicolor": 50, "Iris-virginica": 50
        }}));
        assert_eq!(insights.len(), 1);
        let i = &insights[0];
        assert_eq!(i.kind, InsightKind::GroupBalance);
        assert_eq!(i.title, "Species Distribution Analysis");
        assert_eq!(i.significance, Significance::Medium);
        assert!(i.description.contains("3 species with a balance ratio of 1.000"));
        assert!(i.description.contains("well-balanced"));
        assert_eq!(i.evidence.get("total_samples"), Some(&EvidenceValue::Metric(150.0)));
    }

    #[test]
    fn test_imbalanced_groups_are_high() {
        let insights = run(json!({"distribution": {"a": 50, "b": 20}}));
        let i = &insights[0];
        assert_eq!(i.significance, Significance::High);
        assert!(i.description.contains("0.400"));
        assert!(i.description.contains("some imbalance between species"));
    }

    #[test]
    fn test_zero_counts_give_zero_ratio() {
        assert_eq!(balance_ratio(&[0.0, 0.0]), Some(0.0));
        assert_eq!(balance_ratio(&[]), None);
    }

    #[test]
    fn test_empty_distribution_emits_nothing() {
        assert!(run(json!({"distribution": {}})).is_empty());
    }

    #[test]
    fn test_discriminating_feature() {
        let insights = run(json!({"measurement_means": {
            "PetalLengthCm": {"Iris-setosa": 1.46, "Iris-versicolor": 4.26, "Iris-virginica": 5.55},
            "SepalWidthCm": {"Iris-setosa": 3.42, "Iris-versicolor": 2.77, "Iris-virginica": 2.97}
        }}));
        assert_eq!(insights.len(), 1);
        let i = &insights[0];
        assert_eq!(i.kind, InsightKind::Discriminator);
        assert_eq!(i.category, "Species Differentiation");
        assert_eq!(i.title, "Key Discriminating Feature: PetalLengthCm");
        assert!(i.description.contains("range: 4.090"));
        assert_eq!(i.significance, Significance::High);
    }

    #[test]
    fn test_single_group_features_ignored() {
        let insights = run(json!({"measurement_means": {
            "A": {"only": 9.0},
            "B": {"x": 1.0, "y": 1.0}
        }}));
        assert!(insights.is_empty());
    }

    #[test]
    fn test_group_label_flows_into_text() {
        let text = StoryText {
            group_label: "islands".into(),
            ..StoryText::default()
        };
        let insights = run_with(
            &text,
            json!({
                "distribution": {"Biscoe": 168, "Dream": 124, "Torgersen": 52},
                "measurement_means": {"flipper": {"Biscoe": 209.7, "Dream": 193.1}}
            }),
        );
        assert_eq!(insights[0].title, "Islands Distribution Analysis");
        assert!(insights[0].description.contains("imbalance between islands"));
        assert_eq!(insights[1].category, "Islands Differentiation");
    }

    #[test]
    fn test_unbounded_spread_is_skipped() {
        let insights = run(json!({"measurement_means": {
            "extreme": {"a": 1.7e308, "b": -1.7e308},
            "petal": {"a": 1.0, "b": 3.0}
        }}));
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Key Discriminating Feature: petal");
        assert_eq!(insights[0].evidence.get("variation"), Some(&EvidenceValue::Metric(2.0)));
    }

    #[test]
    fn test_unbounded_total_emits_no_balance() {
        assert!(run(json!({"distribution": {"a": 1.7e308, "b": 1.7e308}})).is_empty());
    }
}
