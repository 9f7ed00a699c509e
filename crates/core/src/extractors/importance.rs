//! Feature-importance insights: the primary feature and redundancy candidates.

use crate::insights::generator::{
    generate_insight, Evidence, EvidenceValue, Insight, InsightKind, RankedEntry,
};
use crate::insights::scoring::Significance;
use crate::insights::templates::format_percent;
use crate::results::{numeric_map, AnalysisResults};

use super::{vars, ExtractContext};

pub fn extract_importance_insights(results: &AnalysisResults, ctx: &ExtractContext<'_>) -> Vec<Insight> {
    let ranking = rank_features(numeric_map(&results.feature_importance));
    if ranking.is_empty() {
        tracing::debug!(extractor = "feature_importance", "No feature importance scores");
        return Vec::new();
    }

    let mut insights = Vec::new();
    if let Some(i) = primary_feature(&ranking) {
        insights.push(i);
    }
    if let Some(i) = redundancy(&ranking, ctx) {
        insights.push(i);
    }
    insights
}

/// Sort by score, highest first. Equal scores keep name order.
pub fn rank_features(mut scores: Vec<(String, f64)>) -> Vec<RankedEntry> {
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    scores
        .into_iter()
        .map(|(name, value)| RankedEntry { name, value })
        .collect()
}

fn primary_feature(ranking: &[RankedEntry]) -> Option<Insight> {
    let top = ranking.first()?;
    let top3: f64 = ranking.iter().take(3).map(|e| e.value).sum();
    if !top3.is_finite() {
        tracing::debug!(extractor = "feature_importance", "Top-3 concentration is not finite");
        return None;
    }

    let vars = vars([
        ("feature", top.name.clone()),
        ("score", top.value.to_string()),
        ("top3_pct", format_percent(top3)),
    ]);
    let evidence = Evidence::new()
        .with("feature_ranking", EvidenceValue::Ranked(ranking.to_vec()))
        .with("top_3_concentration", EvidenceValue::Metric(top3));

    generate_insight(InsightKind::PrimaryFeature, &vars, Significance::High, evidence)
}

/// Flag the three weakest features when more than three are ranked and the
/// weakest falls under the redundancy cut-off.
fn redundancy(ranking: &[RankedEntry], ctx: &ExtractContext<'_>) -> Option<Insight> {
    if ranking.len() <= 3 {
        return None;
    }
    let bottom = &ranking[ranking.len() - 3..];
    let min_importance = bottom.iter().map(|e| e.value).reduce(f64::min)?;
    let cutoff = ctx.classifier.rules().redundancy_max_importance;
    if min_importance >= cutoff {
        return None;
    }

    let names: Vec<String> = bottom.iter().map(|e| e.name.clone()).collect();
    let vars = vars([
        ("features", names.join(", ")),
        ("cutoff_pct", format!("{:.0}%", cutoff * 100.0)),
        ("cutoff", cutoff.to_string()),
        ("min_importance", min_importance.to_string()),
    ]);
    let evidence = Evidence::new()
        .with("low_importance_features", EvidenceValue::Features(names))
        .with("min_importance", EvidenceValue::Metric(min_importance));

    generate_insight(InsightKind::FeatureRedundancy, &vars, Significance::Medium, evidence)
}

// ============================================================================
// Tests
// ============================================================================
