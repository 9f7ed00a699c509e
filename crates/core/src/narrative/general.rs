//! General-audience report: plain language, no labels.

use crate::story::Story;

use super::vocabulary::simplify;
use super::{bullet_list, Audience, NarrativeRenderer};

const MAX_NEXT_STEPS: usize = 3;

/// Title and closing paragraph come from the story's configured text.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralRenderer;

impl NarrativeRenderer for GeneralRenderer {
    fn audience(&self) -> Audience {
        Audience::General
    }

    fn render(&self, story: &Story) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", story.general_title));
        out.push_str(&format!("## What We Discovered\n{}\n\n", story.executive_summary));
        out.push_str("## Main Findings\n");

        for (i, finding) in story.key_findings.iter().enumerate() {
            out.push_str(&format!("\n### {}. {}\n", i + 1, finding.title));
            out.push_str(&format!("{}\n\n", simplify(&finding.description)));
            out.push_str(&format!(
                "**Why This Matters:** {}\n",
                simplify(&finding.business_impact)
            ));
        }

        out.push_str(&format!("\n## What This Means\n{}\n", story.general_closing));

        let shown = story.recommendations.len().min(MAX_NEXT_STEPS);
        out.push_str(&format!(
            "\n## Next Steps\n{}\n",
            bullet_list(&story.recommendations[..shown])
        ));
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
