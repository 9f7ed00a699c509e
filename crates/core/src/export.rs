//! Structured insight export and sink writes.
//!
//! Exported records are flat and omit `technical_details`. They keep the
//! order in which the extractors emitted the insights.

use std::io::Write;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::StoryError;
use crate::insights::generator::{Evidence, Insight};
use crate::insights::scoring::Significance;
use crate::story::Story;

/// One insight as it appears in the export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../bindings/"))]
pub struct ExportedInsight {
    pub category: String,
    pub title: String,
    pub description: String,
    pub significance: Significance,
    pub business_impact: String,
    pub evidence: Evidence,
}

impl From<&Insight> for ExportedInsight {
    fn from(insight: &Insight) -> Self {
        Self {
            category: insight.category.clone(),
            title: insight.title.clone(),
            description: insight.description.clone(),
            significance: insight.significance,
            business_impact: insight.business_impact.clone(),
            evidence: insight.evidence.clone(),
        }
    }
}

/// Every insight in the story, in collection order.
pub fn export_insights(story: &Story) -> Vec<ExportedInsight> {
    story.insights().into_iter().map(ExportedInsight::from).collect()
}

pub fn to_json_document(insights: &[ExportedInsight]) -> Result<String, StoryError> {
    Ok(serde_json::to_string_pretty(insights)?)
}

pub fn from_json_document(source: &str) -> Result<Vec<ExportedInsight>, StoryError> {
    Ok(serde_json::from_str(source)?)
}

/// Hand a fully materialised document to a sink in one write.
///
/// Failures are returned unmodified as [`StoryError::Sink`]; nothing is retried.
pub fn write_document<W: Write>(sink: &mut W, document: &str) -> Result<(), StoryError> {
    sink.write_all(document.as_bytes()).map_err(StoryError::sink)?;
    sink.flush().map_err(StoryError::sink)?;
    tracing::debug!(bytes = document.len(), "Document written");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
