//! Technical report for data scientists and analysts.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};

use crate::insights::generator::{Evidence, EvidenceValue};
use crate::story::Story;

use super::{bullet_list, Audience, NarrativeRenderer};

/// Full methodology, every key finding with its evidence, every supporting
/// insight, all recommendations and limitations.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalRenderer;

impl NarrativeRenderer for TechnicalRenderer {
    fn audience(&self) -> Audience {
        Audience::Technical
    }

    fn render(&self, story: &Story) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", story.title));
        out.push_str(&format!("## Executive Summary\n{}\n\n", story.executive_summary));
        out.push_str(&format!("## Methodology\n{}\n\n", story.methodology.trim()));
        out.push_str("## Key Findings\n");

        for (i, finding) in story.key_findings.iter().enumerate() {
            out.push_str(&format!("\n### {}. {}\n", i + 1, finding.title));
            out.push_str(&format!("**Category:** {}  \n", finding.category));
            out.push_str(&format!("**Significance:** {}\n\n", finding.significance));
            out.push_str(&format!("{}\n\n", finding.description));
            if let Some(details) = &finding.technical_details {
                out.push_str(&format!("**Technical Details:** {details}\n\n"));
            }
            out.push_str(&format!(
                "**Evidence:**\n```json\n{}\n```\n",
                evidence_block(&finding.evidence)
            ));
        }

        if !story.supporting_insights.is_empty() {
            out.push_str("\n## Supporting Insights\n");
            for insight in &story.supporting_insights {
                out.push_str(&format!("- **{}**: {}\n", insight.title, insight.description));
            }
        }

        out.push_str(&format!("\n## Recommendations\n{}\n", bullet_list(&story.recommendations)));
        out.push_str(&format!("\n## Limitations\n{}\n", bullet_list(&story.limitations)));
        out
    }
}

/// Evidence as a plain JSON object keyed by metric name, entries in the
/// order the insight recorded them.
pub struct EvidenceObject<'a>(pub &'a Evidence);

impl Serialize for EvidenceObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0.iter() {
            map.serialize_entry(&entry.metric, &plain_value(&entry.value))?;
        }
        map.end()
    }
}

fn number(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

fn plain_value(value: &EvidenceValue) -> Value {
    match value {
        EvidenceValue::Metric(f) => number(*f),
        EvidenceValue::Count(n) => Value::from(*n),
        EvidenceValue::Feature(name) => Value::from(name.as_str()),
        EvidenceValue::FeaturePair { first, second } => {
            Value::Array(vec![Value::from(first.as_str()), Value::from(second.as_str())])
        }
        EvidenceValue::Ranked(entries) => Value::Array(
            entries
                .iter()
                .map(|e| Value::Array(vec![Value::from(e.name.as_str()), number(e.value)]))
                .collect(),
        ),
        EvidenceValue::Distribution(map) => {
            Value::Object(map.iter().map(|(k, v)| (k.clone(), number(*v))).collect())
        }
        EvidenceValue::Features(names) => {
            Value::Array(names.iter().map(|n| Value::from(n.as_str())).collect())
        }
    }
}

fn evidence_block(evidence: &Evidence) -> String {
    serde_json::to_string_pretty(&EvidenceObject(evidence)).unwrap_or_else(|_| "{}".to_string())
}

// ============================================================================
// Tests
// ============================================================================
