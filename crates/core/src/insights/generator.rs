//! Insight records and the generator that renders them from templates.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::scoring::Significance;
use super::templates::{get_template, render_template};

/// Which extractor rule produced an insight.
///
/// Recommendations and audience rendering dispatch on this instead of
/// comparing category strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    StrongCorrelation,
    Interconnectedness,
    Skewness,
    Variability,
    GroupBalance,
    Discriminator,
    Outliers,
    CleanDataset,
    PrimaryFeature,
    FeatureRedundancy,
}

impl InsightKind {
    pub const ALL: [InsightKind; 10] = [
        Self::StrongCorrelation,
        Self::Interconnectedness,
        Self::Skewness,
        Self::Variability,
        Self::GroupBalance,
        Self::Discriminator,
        Self::Outliers,
        Self::CleanDataset,
        Self::PrimaryFeature,
        Self::FeatureRedundancy,
    ];

    pub fn is_outlier(self) -> bool {
        matches!(self, Self::Outliers | Self::CleanDataset)
    }

    pub fn is_feature_importance(self) -> bool {
        matches!(self, Self::PrimaryFeature | Self::FeatureRedundancy)
    }

    pub fn is_group(self) -> bool {
        matches!(self, Self::GroupBalance | Self::Discriminator)
    }
}

/// A single ranked feature score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
pub struct RankedEntry {
    pub name: String,
    pub value: f64,
}

/// The shapes of machine-readable evidence an insight can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EvidenceValue {
    /// A single scalar measurement.
    Metric(f64),
    /// An integer tally.
    Count(u64),
    /// A single feature name.
    Feature(String),
    /// Two related features.
    FeaturePair { first: String, second: String },
    /// Features with scores, in rank order.
    Ranked(Vec<RankedEntry>),
    /// Label to value mapping (group counts, per-group means).
    Distribution(BTreeMap<String, f64>),
    /// A set of feature names, in report order.
    Features(Vec<String>),
}

/// One named piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
pub struct EvidenceEntry {
    pub metric: String,
    pub value: EvidenceValue,
}

/// Ordered evidence backing an insight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
pub struct Evidence(pub Vec<EvidenceEntry>);

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: impl Into<String>, value: EvidenceValue) -> Self {
        self.0.push(EvidenceEntry {
            metric: metric.into(),
            value,
        });
        self
    }

    pub fn get(&self, metric: &str) -> Option<&EvidenceValue> {
        self.0.iter().find(|e| e.metric == metric).map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvidenceEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A ranked, evidenced claim derived from one metric or comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub category: String,
    pub title: String,
    /// Self-contained prose; safe to truncate at the first sentence.
    pub description: String,
    pub evidence: Evidence,
    pub significance: Significance,
    pub business_impact: String,
    pub technical_details: Option<String>,
}

/// Build an [`Insight`] from the template registered for `kind`.
///
/// Returns `None` if no template is registered for the kind.
pub fn generate_insight(
    kind: InsightKind,
    vars: &HashMap<String, String>,
    significance: Significance,
    evidence: Evidence,
) -> Option<Insight> {
    let template = get_template(kind)?;

    Some(Insight {
        kind,
        category: render_template(template.category, vars),
        title: render_template(template.title, vars),
        description: render_template(template.description, vars),
        evidence,
        significance,
        business_impact: render_template(template.business_impact, vars),
        technical_details: template.technical_details.map(|t| render_template(t, vars)),
    })
}

/// Count insights per significance tier, highest tier first.
pub fn count_by_significance<'a>(
    insights: impl IntoIterator<Item = &'a Insight>,
) -> Vec<(Significance, usize)> {
    let mut counts: Vec<(Significance, usize)> =
        Significance::ALL.iter().rev().map(|&s| (s, 0)).collect();
    for insight in insights {
        if let Some(slot) = counts.iter_mut().find(|(s, _)| *s == insight.significance) {
            slot.1 += 1;
        }
    }
    counts
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_generate_insight_basic() {
        let vars = vars(&[
            ("feature_a", "PetalLengthCm"),
            ("feature_b", "PetalWidthCm"),
            ("direction", "positive"),
            ("coefficient", "0.96"),
            ("impact", "Strong correlation."),
        ]);
        let insight = generate_insight(
            InsightKind::StrongCorrelation,
            &vars,
            Significance::Critical,
            Evidence::new().with("correlation_coefficient", EvidenceValue::Metric(0.96)),
        )
        .unwrap();

        assert_eq!(insight.category, "Correlation Analysis");
        assert!(insight.title.contains("PetalLengthCm"));
        assert!(insight.title.contains("PetalWidthCm"));
        assert!(insight.description.contains("0.960"));
        assert!(insight.technical_details.unwrap().contains("0.9600"));
        assert_eq!(insight.significance, Significance::Critical);
    }

    #[test]
    fn test_every_kind_has_template() {
        for kind in InsightKind::ALL {
            assert!(get_template(kind).is_some(), "missing template for {kind:?}");
        }
    }

    #[test]
    fn test_evidence_preserves_order() {
        let evidence = Evidence::new()
            .with("z_last", EvidenceValue::Count(1))
            .with("a_first", EvidenceValue::Count(2));
        let names: Vec<_> = evidence.iter().map(|e| e.metric.as_str()).collect();
        assert_eq!(names, vec!["z_last", "a_first"]);
        assert_eq!(evidence.get("a_first"), Some(&EvidenceValue::Count(2)));
        assert!(evidence.get("missing").is_none());
    }

    #[test]
    fn test_evidence_serializes_tagged() {
        let evidence = Evidence::new().with(
            "feature_pair",
            EvidenceValue::FeaturePair {
                first: "A".into(),
                second: "B".into(),
            },
        );
        let json = serde_json::to_value(&evidence).unwrap();
        assert_eq!(json[0]["metric"], "feature_pair");
        assert_eq!(json[0]["value"]["kind"], "feature_pair");
        assert_eq!(json[0]["value"]["value"]["first"], "A");
    }

    #[test]
    fn test_count_by_significance() {
        let make = |s| Insight {
            kind: InsightKind::Variability,
            category: String::new(),
            title: String::new(),
            description: String::new(),
            evidence: Evidence::new(),
            significance: s,
            business_impact: String::new(),
            technical_details: None,
        };
        let insights = vec![make(Significance::High), make(Significance::Low), make(Significance::High)];
        let counts = count_by_significance(&insights);
        assert_eq!(counts[0], (Significance::Critical, 0));
        assert_eq!(counts[1], (Significance::High, 2));
        assert_eq!(counts[3], (Significance::Low, 1));
    }
}
