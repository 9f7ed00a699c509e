//! Audience-specific narrative rendering of an assembled [`Story`].
//!
//! Each audience has one renderer behind [`NarrativeRenderer`]. Rendering is
//! pure: the same story and audience always produce byte-identical text.

pub mod business;
pub mod general;
pub mod technical;
pub mod vocabulary;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoryError;
use crate::story::Story;

pub use business::BusinessRenderer;
pub use general::GeneralRenderer;
pub use technical::TechnicalRenderer;

/// Who a report is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Technical,
    Business,
    General,
}

impl Audience {
    pub const ALL: [Audience; 3] = [Self::Technical, Self::Business, Self::General];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Business => "business",
            Self::General => "general",
        }
    }

    pub fn renderer(&self) -> Box<dyn NarrativeRenderer> {
        match self {
            Self::Technical => Box::new(TechnicalRenderer),
            Self::Business => Box::new(BusinessRenderer),
            Self::General => Box::new(GeneralRenderer),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(Self::Technical),
            "business" => Ok(Self::Business),
            "general" => Ok(Self::General),
            _ => Err(StoryError::UnknownAudience { name: s.to_string() }),
        }
    }
}

/// Renders a story as Markdown for one audience.
pub trait NarrativeRenderer {
    fn audience(&self) -> Audience;

    fn render(&self, story: &Story) -> String;
}

pub fn render(story: &Story, audience: Audience) -> String {
    audience.renderer().render(story)
}

/// `• item` lines joined by newlines.
pub(crate) fn bullet_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| format!("• {}", s.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod tests {
    use super::test_helpers::{iris_results, iris_story};
    use super::*;
    use crate::config::StoryConfig;
    use crate::story::assemble_story;

    #[test]
    fn test_audience_parse_case_insensitive() {
        assert_eq!("Technical".parse::<Audience>().unwrap(), Audience::Technical);
        assert_eq!(" BUSINESS ".parse::<Audience>().unwrap(), Audience::Business);
        assert_eq!("general".parse::<Audience>().unwrap(), Audience::General);
    }

    #[test]
    fn test_unknown_audience() {
        let err = "executive".parse::<Audience>().unwrap_err();
        assert!(matches!(err, StoryError::UnknownAudience { ref name } if name == "executive"));
    }

    #[test]
    fn test_renderer_matches_audience() {
        for audience in Audience::ALL {
            assert_eq!(audience.renderer().audience(), audience);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let story = iris_story();
        for audience in Audience::ALL {
            assert_eq!(render(&story, audience), render(&story, audience));
        }
    }

    #[test]
    fn test_every_audience_has_title_summary_and_findings() {
        let story = iris_story();
        for audience in Audience::ALL {
            let report = render(&story, audience);
            assert!(report.contains(&story.executive_summary), "{audience} lacks summary");
            for finding in &story.key_findings {
                assert!(report.contains(&finding.title), "{audience} lacks {}", finding.title);
            }
        }
    }

    #[test]
    fn test_general_report_uses_assembled_text() {
        let mut config = StoryConfig::default();
        config.story.general_title = "Penguins, Explained".into();
        config.story.general_closing = "Penguins differ by island.".into();
        let story = assemble_story(&iris_results(), &config).unwrap();

        let report = render(&story, Audience::General);
        assert!(report.starts_with("# Penguins, Explained\n"));
        assert!(report.contains("## What This Means\nPenguins differ by island.\n"));
        assert!(!report.contains("Iris Flower"));
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(bullet_list(&["a", "b"]), "• a\n• b");
        assert_eq!(bullet_list::<&str>(&[]), "");
    }
}
