//! Story assembly: partition, recommendations and executive summary.
//!
//! The assembler runs every extractor in collection order, splits the
//! output into key findings (high/critical) and supporting insights
//! (low/medium), and packages the result with fixed methodology and
//! limitations text. A [`Story`] is read-only once assembled.

use serde::{Deserialize, Serialize};

use crate::config::{StoryConfig, StoryText};
use crate::error::StoryError;
use crate::extractors::outlier::{affected_features, total_outliers};
use crate::extractors::{extract_all_insights, ExtractContext};
use crate::insights::generator::{Insight, InsightKind};
use crate::insights::scoring::SignificanceClassifier;
use crate::results::AnalysisResults;

pub const REC_REDUCE_REDUNDANCY: &str = "Consider feature selection techniques to reduce redundancy from highly correlated features, which could improve model efficiency and interpretability.";
pub const REC_TRANSFORM_SKEW: &str = "Apply appropriate data transformations (e.g., log transformation) to handle skewed distributions for improved model performance.";
pub const REC_INVESTIGATE_OUTLIERS: &str = "Investigate outliers to determine if they represent measurement errors or genuine biological variation. Consider robust modeling techniques.";
pub const REC_CLEAN_DATA: &str = "The clean dataset provides an excellent foundation for machine learning models without extensive preprocessing.";
pub const REC_FOCUS_FEATURES: &str = "Focus on the most important features for model development and consider removing low-importance features to simplify the model.";

/// Recommendation added when any group insight exists.
pub fn group_recommendation(group_label: &str) -> String {
    format!(
        "Leverage the identified discriminating features for efficient {group_label} classification and consider the dataset balance in model evaluation."
    )
}

/// Always appended after the rule-derived recommendations.
pub const CLOSING_RECOMMENDATIONS: [&str; 3] = [
    "Validate findings with cross-validation to ensure robustness across different data splits.",
    "Consider ensemble methods to combine multiple weak learners for improved classification accuracy.",
    "Document the analysis methodology and maintain data lineage for reproducibility.",
];

pub const METHODOLOGY: &str = "\
This analysis employed a comprehensive multi-stage approach:
1. Data Quality Assessment: Evaluated completeness, consistency, and biological plausibility
2. Statistical Analysis: Computed descriptive statistics, distributions, and correlations
3. Pattern Detection: Applied correlation analysis, variance assessment, and feature importance calculation
4. Outlier Detection: Used multiple methods (IQR, Z-score, Isolation Forest) for robust outlier identification
5. Species-specific Analysis: Examined inter-species differences and dataset balance
6. Insight Synthesis: Transformed technical findings into actionable business insights";

pub const LIMITATIONS: [&str; 5] = [
    "Analysis based on a single dataset; findings may not generalize to other iris populations",
    "Correlation does not imply causation; observed relationships may be influenced by unmeasured factors",
    "Outlier detection methods assume specific distributions; results may vary with different assumptions",
    "Feature importance calculations are relative to this specific dataset and may change with different samples",
    "Biological interpretation requires domain expertise beyond the scope of statistical analysis",
];

/// Where a collected insight landed after partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "list", content = "index", rename_all = "snake_case")]
pub enum Placement {
    Key(usize),
    Supporting(usize),
}

/// Figures about the run itself, shown on the executive dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunMetrics {
    pub dataset_size: u64,
    pub strong_correlations: usize,
    pub outliers_detected: u64,
}

impl RunMetrics {
    pub fn from_results(results: &AnalysisResults) -> Self {
        let strong_correlations = results
            .pattern_slice("strong_correlations")
            .and_then(|v| v.as_array())
            .map_or(0, |a| a.len());
        let outliers_detected = results
            .outlier_analysis
            .as_object()
            .map_or(0, |m| total_outliers(&affected_features(m)));
        Self {
            dataset_size: results.dataset_size,
            strong_correlations,
            outliers_detected,
        }
    }
}

/// The full assembled narrative package for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub executive_summary: String,
    pub key_findings: Vec<Insight>,
    pub supporting_insights: Vec<Insight>,
    pub recommendations: Vec<String>,
    pub methodology: String,
    pub limitations: Vec<String>,
    /// Title of the general-audience report.
    #[serde(default = "default_general_title")]
    pub general_title: String,
    #[serde(default = "default_general_closing")]
    pub general_closing: String,
    /// Collection order across both lists; empty means key findings first.
    #[serde(default)]
    pub collection_order: Vec<Placement>,
    #[serde(default)]
    pub metrics: RunMetrics,
}

fn default_general_title() -> String {
    StoryText::default().general_title
}

fn default_general_closing() -> String {
    StoryText::default().general_closing
}

impl Story {
    /// Every insight, in the order the extractors emitted them.
    pub fn insights(&self) -> Vec<&Insight> {
        if self.collection_order.is_empty() {
            return self
                .key_findings
                .iter()
                .chain(&self.supporting_insights)
                .collect();
        }
        self.collection_order
            .iter()
            .filter_map(|p| match *p {
                Placement::Key(i) => self.key_findings.get(i),
                Placement::Supporting(i) => self.supporting_insights.get(i),
            })
            .collect()
    }

    pub fn insight_count(&self) -> usize {
        self.key_findings.len() + self.supporting_insights.len()
    }
}

/// Builds stories from analysis results with one configured classifier.
#[derive(Debug, Clone)]
pub struct StoryAssembler {
    classifier: SignificanceClassifier,
    text: StoryText,
}

impl StoryAssembler {
    pub fn new(config: &StoryConfig) -> Result<Self, StoryError> {
        config.validate()?;
        Ok(Self {
            classifier: SignificanceClassifier::from_config(config)?,
            text: config.story.clone(),
        })
    }

    pub fn with_classifier(classifier: SignificanceClassifier, text: StoryText) -> Self {
        Self { classifier, text }
    }

    pub fn classifier(&self) -> &SignificanceClassifier {
        &self.classifier
    }

    pub fn assemble(&self, results: &AnalysisResults) -> Story {
        let ctx = ExtractContext::new(&self.classifier, &self.text);
        let insights = extract_all_insights(results, &ctx);

        let recommendations = derive_recommendations(&insights, &self.text);
        let (key_findings, supporting_insights, collection_order) = partition(insights);
        let executive_summary = executive_summary(&key_findings, &self.text);

        tracing::info!(
            key_findings = key_findings.len(),
            supporting = supporting_insights.len(),
            recommendations = recommendations.len(),
            "Assembled story"
        );

        Story {
            title: self.text.title.clone(),
            executive_summary,
            key_findings,
            supporting_insights,
            recommendations,
            methodology: METHODOLOGY.to_string(),
            limitations: LIMITATIONS.iter().map(|s| s.to_string()).collect(),
            general_title: self.text.general_title.clone(),
            general_closing: self.text.general_closing.clone(),
            collection_order,
            metrics: RunMetrics::from_results(results),
        }
    }
}

/// Assemble a story with a classifier built from `config`.
pub fn assemble_story(results: &AnalysisResults, config: &StoryConfig) -> Result<Story, StoryError> {
    Ok(StoryAssembler::new(config)?.assemble(results))
}

/// Split insights into key (high/critical) and supporting (low/medium),
/// preserving collection order within each list.
pub fn partition(insights: Vec<Insight>) -> (Vec<Insight>, Vec<Insight>, Vec<Placement>) {
    let mut key = Vec::new();
    let mut supporting = Vec::new();
    let mut order = Vec::with_capacity(insights.len());

    for insight in insights {
        if insight.significance.is_key() {
            order.push(Placement::Key(key.len()));
            key.push(insight);
        } else {
            order.push(Placement::Supporting(supporting.len()));
            supporting.push(insight);
        }
    }

    (key, supporting, order)
}

/// Rule-derived recommendations followed by the fixed closing three.
///
/// Each rule contributes at most once. Outlier investigation wins over the
/// clean-data remark whenever any outlier insight is high or critical.
pub fn derive_recommendations(insights: &[Insight], text: &StoryText) -> Vec<String> {
    let any = |pred: fn(&Insight) -> bool| insights.iter().any(pred);
    let mut recs: Vec<String> = Vec::new();

    if any(|i| i.kind == InsightKind::StrongCorrelation && i.significance.is_key()) {
        recs.push(REC_REDUCE_REDUNDANCY.to_string());
    }
    if any(|i| i.kind == InsightKind::Skewness && i.significance.is_key()) {
        recs.push(REC_TRANSFORM_SKEW.to_string());
    }
    if any(|i| i.kind.is_outlier() && i.significance.is_key()) {
        recs.push(REC_INVESTIGATE_OUTLIERS.to_string());
    } else if any(|i| i.kind.is_outlier()) {
        recs.push(REC_CLEAN_DATA.to_string());
    }
    if any(|i| i.kind.is_feature_importance()) {
        recs.push(REC_FOCUS_FEATURES.to_string());
    }
    if any(|i| i.kind.is_group()) {
        recs.push(group_recommendation(&text.group_label));
    }

    recs.extend(CLOSING_RECOMMENDATIONS.map(String::from));
    recs
}

/// Text up to the first period that ends a sentence.
///
/// A period only ends a sentence when followed by whitespace or the end of
/// the text, so decimals like `0.960` are kept whole. The period itself is
/// not included.
pub fn first_sentence(text: &str) -> &str {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'.' && bytes.get(i + 1).map_or(true, |c| c.is_ascii_whitespace()) {
            return &text[..i];
        }
    }
    text.trim_end()
}

pub fn executive_summary(key_findings: &[Insight], text: &StoryText) -> String {
    if key_findings.is_empty() {
        return format!(
            "Analysis of the {} reveals a clean, well-structured dataset suitable for classification modeling with no critical issues identified.",
            text.dataset_label
        );
    }

    let mut parts = vec![format!(
        "Analysis of the {} reveals several key insights:",
        text.dataset_label
    )];
    for finding in key_findings.iter().take(3) {
        parts.push(format!(
            "• {}: {}.",
            finding.title,
            first_sentence(&finding.description)
        ));
    }
    if key_findings.len() > 3 {
        parts.push(format!(
            "• Additional {} high-significance findings support these conclusions.",
            key_findings.len() - 3
        ));
    }
    parts.push(format!(
        "These findings provide a strong foundation for developing accurate {} classification models.",
        text.group_label
    ));

    parts.join(" ")
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod tests {
    use super::test_helpers::insight;
    use super::*;
    use crate::insights::scoring::Significance;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn iris_results() -> AnalysisResults {
        AnalysisResults {
            dataset_size: 150,
            summary_stats: json!({
                "feature_variance": {"highest_variance": "PetalLengthCm", "lowest_variance": "SepalWidthCm"},
                "species_analysis": {"distribution": {"setosa": 50, "versicolor": 50, "virginica": 50}}
            }),
            pattern_analysis: json!({
                "strong_correlations": [["PetalLengthCm", "PetalWidthCm", 0.96]]
            }),
            outlier_analysis: json!({"SepalWidthCm": {"count": 4}}),
            feature_importance: json!({"A": 0.5, "B": 0.3, "C": 0.15, "D": 0.05}),
        }
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("We found 0.960 here. Then more."), "We found 0.960 here");
        assert_eq!(first_sentence("Ends at end."), "Ends at end");
        assert_eq!(first_sentence("No period"), "No period");
        assert_eq!(first_sentence("Detected 4 outliers (2.7% of rows). Fine."), "Detected 4 outliers (2.7% of rows)");
    }

    #[test]
    fn test_partition_preserves_order() {
        let insights = vec![
            insight(InsightKind::StrongCorrelation, Significance::Critical, "a"),
            insight(InsightKind::Variability, Significance::Medium, "b"),
            insight(InsightKind::Discriminator, Significance::High, "c"),
            insight(InsightKind::Outliers, Significance::Low, "d"),
        ];
        let (key, supporting, order) = partition(insights);
        let titles = |v: &[Insight]| v.iter().map(|i| i.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&key), vec!["a", "c"]);
        assert_eq!(titles(&supporting), vec!["b", "d"]);
        assert_eq!(
            order,
            vec![
                Placement::Key(0),
                Placement::Supporting(0),
                Placement::Key(1),
                Placement::Supporting(1)
            ]
        );
    }

    #[test]
    fn test_recommendations_closing_only() {
        let recs = derive_recommendations(&[], &StoryText::default());
        assert_eq!(recs, CLOSING_RECOMMENDATIONS.map(String::from).to_vec());
    }

    #[test]
    fn test_recommendations_each_rule_once() {
        let insights = vec![
            insight(InsightKind::StrongCorrelation, Significance::Critical, "a"),
            insight(InsightKind::StrongCorrelation, Significance::High, "a2"),
            insight(InsightKind::Skewness, Significance::High, "b"),
            insight(InsightKind::Outliers, Significance::High, "c"),
            insight(InsightKind::PrimaryFeature, Significance::High, "d"),
            insight(InsightKind::FeatureRedundancy, Significance::Medium, "e"),
            insight(InsightKind::GroupBalance, Significance::Medium, "f"),
        ];
        let recs = derive_recommendations(&insights, &StoryText::default());
        let group = group_recommendation("species");
        assert_eq!(
            recs,
            vec![
                REC_REDUCE_REDUNDANCY,
                REC_TRANSFORM_SKEW,
                REC_INVESTIGATE_OUTLIERS,
                REC_FOCUS_FEATURES,
                group.as_str(),
                CLOSING_RECOMMENDATIONS[0],
                CLOSING_RECOMMENDATIONS[1],
                CLOSING_RECOMMENDATIONS[2],
            ]
        );
    }

    #[test]
    fn test_medium_correlation_and_skew_add_nothing() {
        let insights = vec![
            insight(InsightKind::StrongCorrelation, Significance::Medium, "a"),
            insight(InsightKind::Skewness, Significance::Medium, "b"),
        ];
        assert_eq!(derive_recommendations(&insights, &StoryText::default()).len(), 3);
    }

    #[test]
    fn test_low_outliers_give_clean_remark() {
        let insights = vec![insight(InsightKind::Outliers, Significance::Low, "o")];
        let recs = derive_recommendations(&insights, &StoryText::default());
        assert_eq!(recs[0], REC_CLEAN_DATA);
        assert!(!recs.iter().any(|r| r == REC_INVESTIGATE_OUTLIERS));
    }

    #[test]
    fn test_investigation_takes_precedence() {
        let insights = vec![
            insight(InsightKind::CleanDataset, Significance::Medium, "clean"),
            insight(InsightKind::Outliers, Significance::Critical, "o"),
        ];
        let recs = derive_recommendations(&insights, &StoryText::default());
        assert!(recs.iter().any(|r| r == REC_INVESTIGATE_OUTLIERS));
        assert!(!recs.iter().any(|r| r == REC_CLEAN_DATA));
    }

    #[test]
    fn test_executive_summary_without_key_findings() {
        let summary = executive_summary(&[], &StoryText::default());
        assert_eq!(
            summary,
            "Analysis of the Iris dataset reveals a clean, well-structured dataset suitable for classification modeling with no critical issues identified."
        );
    }

    #[test]
    fn test_executive_summary_lists_three_and_counts_rest() {
        let key: Vec<_> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|t| insight(InsightKind::Discriminator, Significance::High, t))
            .collect();
        let summary = executive_summary(&key, &StoryText::default());
        assert!(summary.starts_with("Analysis of the Iris dataset reveals several key insights: • a: a holds at 0.960."));
        assert!(summary.contains("• c: c holds at 0.960."));
        assert!(!summary.contains("• d:"));
        assert!(summary.contains("• Additional 2 high-significance findings support these conclusions."));
        assert!(summary.ends_with("accurate species classification models."));
    }

    #[test]
    fn test_assemble_iris_story() {
        let story = assemble_story(&iris_results(), &StoryConfig::default()).unwrap();

        let key: Vec<_> = story.key_findings.iter().map(|i| i.kind).collect();
        assert_eq!(key, vec![InsightKind::StrongCorrelation, InsightKind::PrimaryFeature]);
        let supporting: Vec<_> = story.supporting_insights.iter().map(|i| i.kind).collect();
        assert_eq!(
            supporting,
            vec![
                InsightKind::Variability,
                InsightKind::GroupBalance,
                InsightKind::Outliers,
                InsightKind::FeatureRedundancy
            ]
        );
        let group = group_recommendation("species");
        assert_eq!(
            story.recommendations,
            vec![
                REC_REDUCE_REDUNDANCY,
                REC_CLEAN_DATA,
                REC_FOCUS_FEATURES,
                group.as_str(),
                CLOSING_RECOMMENDATIONS[0],
                CLOSING_RECOMMENDATIONS[1],
                CLOSING_RECOMMENDATIONS[2],
            ]
        );
        assert_eq!(story.title, "Iris Species Classification: A Data-Driven Analysis");
        assert_eq!(story.limitations.len(), 5);
        assert!(story.methodology.contains("6. Insight Synthesis"));
        assert_eq!(
            story.metrics,
            RunMetrics {
                dataset_size: 150,
                strong_correlations: 1,
                outliers_detected: 4
            }
        );
    }

    #[test]
    fn test_insights_in_collection_order() {
        let story = assemble_story(&iris_results(), &StoryConfig::default()).unwrap();
        let kinds: Vec<_> = story.insights().iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightKind::StrongCorrelation,
                InsightKind::Variability,
                InsightKind::GroupBalance,
                InsightKind::Outliers,
                InsightKind::PrimaryFeature,
                InsightKind::FeatureRedundancy
            ]
        );
        assert_eq!(story.insight_count(), 6);
    }

    #[test]
    fn test_insights_without_order_fall_back_to_key_first() {
        let mut story = assemble_story(&iris_results(), &StoryConfig::default()).unwrap();
        story.collection_order.clear();
        let first = story.insights()[0].kind;
        let second = story.insights()[1].kind;
        assert_eq!((first, second), (InsightKind::StrongCorrelation, InsightKind::PrimaryFeature));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = StoryConfig::default();
        config.thresholds.correlation.high = 0.95;
        assert!(assemble_story(&AnalysisResults::default(), &config).is_err());
    }

    #[test]
    fn test_group_recommendation_uses_group_label() {
        let text = StoryText {
            group_label: "island".into(),
            ..StoryText::default()
        };
        let insights = vec![insight(InsightKind::GroupBalance, Significance::Medium, "g")];
        let recs = derive_recommendations(&insights, &text);
        assert_eq!(
            recs[0],
            "Leverage the identified discriminating features for efficient island classification and consider the dataset balance in model evaluation."
        );
    }

    #[test]
    fn test_story_carries_general_text() {
        let mut config = StoryConfig::default();
        config.story.general_title = "Penguins, Explained".into();
        config.story.general_closing = "Penguins differ.".into();
        let story = assemble_story(&iris_results(), &config).unwrap();
        assert_eq!(story.general_title, "Penguins, Explained");
        assert_eq!(story.general_closing, "Penguins differ.");
    }

    #[test]
    fn test_general_text_defaults_when_absent() {
        let story = assemble_story(&iris_results(), &StoryConfig::default()).unwrap();
        let mut value = serde_json::to_value(&story).unwrap();
        let object = value.as_object_mut().unwrap();
        object.remove("general_title");
        object.remove("general_closing");
        let restored: Story = serde_json::from_value(value).unwrap();
        assert_eq!(restored, story);
    }

    #[test]
    fn test_run_metrics_saturate_outlier_total() {
        let results = AnalysisResults {
            outlier_analysis: json!({
                "a": {"count": 18446744073709551615u64},
                "b": {"count": 1}
            }),
            ..AnalysisResults::default()
        };
        assert_eq!(RunMetrics::from_results(&results).outliers_detected, u64::MAX);
    }
}
