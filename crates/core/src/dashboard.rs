//! Plain-text executive dashboard for terminal output.

use crate::insights::generator::count_by_significance;
use crate::story::Story;

const RULE_WIDTH: usize = 70;
const SECTION_RULE_WIDTH: usize = 20;

fn section(out: &mut String, heading: &str) {
    out.push_str(&format!("\n{heading}\n{}\n", "-".repeat(SECTION_RULE_WIDTH)));
}

/// Summary, findings, recommendations, limitations and run metrics.
pub fn render_dashboard(story: &Story) -> String {
    let mut out = String::new();

    out.push_str(&format!("EXECUTIVE DASHBOARD\n{}\n", "=".repeat(RULE_WIDTH)));

    section(&mut out, "EXECUTIVE SUMMARY");
    out.push_str(&format!("{}\n", story.executive_summary));

    section(&mut out, "KEY FINDINGS");
    for (i, finding) in story.key_findings.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n", i + 1, finding.title));
        out.push_str(&format!(
            "   Significance: {}\n",
            finding.significance.as_str().to_uppercase()
        ));
        out.push_str(&format!("   Category: {}\n", finding.category));
        out.push_str(&format!("   {}\n", finding.description));
        out.push_str(&format!("   Business Impact: {}\n", finding.business_impact));
    }

    section(&mut out, "STRATEGIC RECOMMENDATIONS");
    for (i, rec) in story.recommendations.iter().enumerate() {
        out.push_str(&format!("{}. {rec}\n", i + 1));
    }

    section(&mut out, "LIMITATIONS & CONSIDERATIONS");
    for (i, limitation) in story.limitations.iter().enumerate() {
        out.push_str(&format!("{}. {limitation}\n", i + 1));
    }

    section(&mut out, "ANALYSIS METRICS");
    let metrics = &story.metrics;
    out.push_str(&format!("• Dataset Size: {} samples\n", metrics.dataset_size));
    out.push_str(&format!("• Strong Correlations: {}\n", metrics.strong_correlations));
    out.push_str(&format!("• Outliers Detected: {}\n", metrics.outliers_detected));
    out.push_str(&format!("• Key Insights: {}\n", story.key_findings.len()));
    out.push_str(&format!("• Supporting Evidence: {}\n", story.supporting_insights.len()));

    let breakdown: Vec<String> = count_by_significance(story.insights())
        .into_iter()
        .map(|(s, n)| format!("{s} {n}"))
        .collect();
    out.push_str(&format!("• Significance: {}\n", breakdown.join(", ")));

    out
}

// ============================================================================
// Tests
// ============================================================================
