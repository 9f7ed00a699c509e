//! Business report for stakeholders.

use crate::story::Story;

use super::{bullet_list, Audience, NarrativeRenderer};

const MAX_RECOMMENDATIONS: usize = 5;
const MAX_LIMITATIONS: usize = 3;

/// Impact framing only: no methodology, no technical details.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessRenderer;

impl NarrativeRenderer for BusinessRenderer {
    fn audience(&self) -> Audience {
        Audience::Business
    }

    fn render(&self, story: &Story) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {}\n", business_title(&story.title)));
        out.push_str(&format!(
            "## Business Intelligence Summary\n\n{}\n\n",
            story.executive_summary
        ));
        out.push_str("## Key Business Insights\n");

        for (i, finding) in story.key_findings.iter().enumerate() {
            out.push_str(&format!("\n### {}. {}\n", i + 1, finding.title));
            out.push_str(&format!("{}\n\n", finding.description));
            out.push_str(&format!("**Business Impact:** {}\n", finding.business_impact));
        }

        let recommendations: Vec<String> = story
            .recommendations
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .enumerate()
            .map(|(i, rec)| format!("{}. {rec}", i + 1))
            .collect();
        out.push_str(&format!(
            "\n## Strategic Recommendations\n{}\n",
            recommendations.join("\n")
        ));

        let shown = story.limitations.len().min(MAX_LIMITATIONS);
        out.push_str(&format!(
            "\n## Considerations\n{}\n",
            bullet_list(&story.limitations[..shown])
        ));
        out
    }
}

/// Business titles use a dash in place of colons.
fn business_title(title: &str) -> String {
    title.replace(':', " -")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::test_helpers::iris_story;

    #[test]
    fn test_title_rewritten() {
        let report = BusinessRenderer.render(&iris_story());
        assert!(report.starts_with("# Iris Species Classification - A Data-Driven Analysis\n"));
    }

    #[test]
    fn test_omits_technical_content() {
        let report = BusinessRenderer.render(&iris_story());
        assert!(!report.contains("## Methodology"));
        assert!(!report.contains("**Technical Details:**"));
        assert!(!report.contains("**Evidence:**"));
        assert!(!report.contains("**Significance:**"));
    }

    #[test]
    fn test_business_impact_per_finding() {
        let story = iris_story();
        let report = BusinessRenderer.render(&story);
        for finding in &story.key_findings {
            assert!(report.contains(&format!("**Business Impact:** {}", finding.business_impact)));
        }
    }

    #[test]
    fn test_limits_recommendations_and_limitations() {
        let story = iris_story();
        assert!(story.recommendations.len() > MAX_RECOMMENDATIONS);
        let report = BusinessRenderer.render(&story);

        assert!(report.contains(&format!("5. {}", story.recommendations[4])));
        assert!(!report.contains(&story.recommendations[5]));
        assert!(report.contains(&format!("• {}", story.limitations[2])));
        assert!(!report.contains(&story.limitations[3]));
    }

    #[test]
    fn test_short_lists_render_whole() {
        let mut story = iris_story();
        story.recommendations.truncate(2);
        story.limitations.truncate(1);
        let report = BusinessRenderer.render(&story);
        assert!(report.contains("2. "));
        assert!(!report.contains("\n3. "));
        assert!(report.contains(&format!("## Considerations\n• {}\n", story.limitations[0])));
    }
}
