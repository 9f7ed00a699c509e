//! Template-based insight text generation.
//!
//! Each extractor rule has a category, title, description, business-impact
//! and optional technical-details template. Templates use `{variable}`
//! placeholders, or `{variable:.N}` to format a numeric value with `N`
//! decimals, substituted in a single pass at render time.

use std::collections::HashMap;

use super::generator::InsightKind;

/// A template for generating human-readable insight text.
pub struct InsightTemplate {
    pub kind: InsightKind,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub business_impact: &'static str,
    pub technical_details: Option<&'static str>,
}

/// All insight templates, one per rule.
pub static TEMPLATES: &[InsightTemplate] = &[
    // ============================
    // Correlation
    // ============================
    InsightTemplate {
        kind: InsightKind::StrongCorrelation,
        category: "Correlation Analysis",
        title: "Strong Relationship Between {feature_a} and {feature_b}",
        description: "We discovered a {direction} correlation of {coefficient:.3} between {feature_a} and {feature_b}. This indicates that these features move together in a predictable pattern.",
        business_impact: "{impact}",
        technical_details: Some("Pearson correlation coefficient: {coefficient:.4}. Statistical significance indicates this relationship is unlikely to be due to chance."),
    },
    InsightTemplate {
        kind: InsightKind::Interconnectedness,
        category: "Feature Relationships",
        title: "Overall Feature Interconnectedness",
        description: "The average correlation between features is {average:.3}, indicating {level} interconnectedness in the dataset.",
        business_impact: "High feature correlation suggests that some measurements might be redundant for classification purposes, potentially allowing for simpler models.",
        technical_details: Some("Mean absolute correlation: {average:.4} across {pair_count} feature pairs"),
    },
    // ============================
    // Distribution
    // ============================
    InsightTemplate {
        kind: InsightKind::Skewness,
        category: "Data Distribution",
        title: "Asymmetric Distribution in {feature}",
        description: "The {feature} feature shows significant {side} skewness ({skewness:.3}), indicating an asymmetric distribution with a longer tail on the {side} side.",
        business_impact: "Skewed distributions may require data transformation for optimal model performance and can indicate natural biological variation patterns.",
        technical_details: Some("Skewness coefficient: {skewness:.4}. Values > {min_magnitude} or < -{min_magnitude} indicate moderate to high skewness."),
    },
    InsightTemplate {
        kind: InsightKind::Variability,
        category: "Feature Variability",
        title: "Variability Patterns Across Features",
        description: "Feature variability analysis reveals {highest} has the highest variance while {lowest} shows the most consistent values across samples.",
        business_impact: "Understanding feature variability helps in feature selection and model interpretability.",
        technical_details: Some("Variance analysis helps identify which features contribute most to distinguishing between samples."),
    },
    // ============================
    // Groups
    // ============================
    InsightTemplate {
        kind: InsightKind::GroupBalance,
        category: "Dataset Balance",
        title: "{group_title} Distribution Analysis",
        description: "The dataset contains {group_count} {group_label} with a balance ratio of {ratio:.3}. {verdict}.",
        business_impact: "Dataset balance affects model performance and bias. Balanced datasets typically lead to more robust classification models.",
        technical_details: Some("Balance ratio: {ratio:.4}. Ratios < {cutoff} may require sampling strategies."),
    },
    InsightTemplate {
        kind: InsightKind::Discriminator,
        category: "{group_title} Differentiation",
        title: "Key Discriminating Feature: {feature}",
        description: "Analysis reveals that {feature} shows the largest variation between {group_label} (range: {spread:.3}), making it a key feature for {group_label} identification.",
        business_impact: "Identifying key discriminating features helps in developing efficient classification models and understanding biological differences.",
        technical_details: Some("Inter-{group_label} variation: {spread:.4} for {feature}"),
    },
    // ============================
    // Outliers
    // ============================
    InsightTemplate {
        kind: InsightKind::Outliers,
        category: "Data Quality",
        title: "Outlier Detection Results",
        description: "Detected {total} outliers across {feature_count} features ({rate_pct} of total data points). This {verdict}.",
        business_impact: "Outliers can indicate measurement errors, rare variants, or genuine biological extremes. Understanding their nature is crucial for model accuracy.",
        technical_details: Some("Outlier detection using multiple methods (IQR, Z-score, Isolation Forest). Rate: {rate:.4}"),
    },
    InsightTemplate {
        kind: InsightKind::CleanDataset,
        category: "Data Quality",
        title: "Clean Dataset with No Outliers",
        description: "No outliers were detected in any features, indicating high data quality and consistency in measurements.",
        business_impact: "Clean data suggests reliable measurement processes and reduces the need for extensive data preprocessing.",
        technical_details: Some("Multiple outlier detection methods applied: IQR, Z-score, and Isolation Forest"),
    },
    // ============================
    // Feature importance
    // ============================
    InsightTemplate {
        kind: InsightKind::PrimaryFeature,
        category: "Feature Importance",
        title: "Primary Predictive Feature: {feature}",
        description: "{feature} emerges as the most predictive feature with an importance score of {score:.4}. The top 3 features account for {top3_pct} of total predictive power.",
        business_impact: "Understanding feature importance guides model simplification and helps focus measurement efforts on the most informative characteristics.",
        technical_details: Some("Importance calculated using variance and correlation-based metrics. Top feature: {score:.4}"),
    },
    InsightTemplate {
        kind: InsightKind::FeatureRedundancy,
        category: "Feature Optimization",
        title: "Potential Feature Redundancy Identified",
        description: "Features {features} show low importance (< {cutoff_pct}), suggesting they may be redundant for classification purposes.",
        business_impact: "Removing low-importance features can simplify models, reduce measurement costs, and improve interpretability without sacrificing accuracy.",
        technical_details: Some("Minimum importance threshold: {cutoff}. Lowest observed: {min_importance:.4}"),
    },
];

/// Look up the template for a rule.
pub fn get_template(kind: InsightKind) -> Option<&'static InsightTemplate> {
    TEMPLATES.iter().find(|t| t.kind == kind)
}

/// Render a template string by substituting `{key}` and `{key:.N}` placeholders.
///
/// Substitution is a single left-to-right pass, so substituted values are
/// never rescanned. Unknown keys are left verbatim. A `.N` specifier on a
/// value that does not parse as a number inserts the value unchanged.
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            result.push_str(&rest[open..]);
            return result;
        };
        let placeholder = &after[..close];
        match substitute(placeholder, vars) {
            Some(value) => result.push_str(&value),
            None => {
                result.push('{');
                result.push_str(placeholder);
                result.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    result.push_str(rest);
    result
}

fn substitute(placeholder: &str, vars: &HashMap<String, String>) -> Option<String> {
    let (key, precision) = match placeholder.split_once(":.") {
        Some((key, digits)) => (key, Some(digits.parse::<usize>().ok()?)),
        None => (placeholder, None),
    };
    let value = vars.get(key)?;
    Some(match (precision, value.parse::<f64>()) {
        (Some(p), Ok(f)) => format!("{f:.p$}"),
        _ => value.clone(),
    })
}

/// Format a fraction as a percentage with one decimal, e.g. `0.0267` -> `2.7%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

// ============================================================================
// Tests
// ============================================================================
