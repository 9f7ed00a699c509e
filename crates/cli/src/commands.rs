//! Subcommand handlers. Each loads its inputs, runs the engine and hands the
//! finished document to a file or stdout.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use datastory_core::{
    assemble_story, export_insights, render_dashboard, to_json_document, write_document,
    AnalysisResults, Audience, SignificanceClassifier, Story, StoryConfig,
};

/// Load the configuration file, or defaults when none was given.
pub fn load_config(path: Option<&Path>) -> Result<StoryConfig> {
    let Some(path) = path else {
        return Ok(StoryConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = StoryConfig::from_toml_str(&source)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

fn load_story(input: &Path, config: &StoryConfig) -> Result<Story> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read analysis results {}", input.display()))?;
    let results = AnalysisResults::from_json_str(&source)
        .with_context(|| format!("invalid analysis results {}", input.display()))?;
    Ok(assemble_story(&results, config)?)
}

fn write_file(path: &Path, document: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_document(&mut file, document)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = document.len(), "Wrote file");
    Ok(())
}

fn write_stdout(document: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_document(&mut lock, document).context("failed to write to stdout")?;
    if !document.ends_with('\n') {
        lock.write_all(b"\n").context("failed to write to stdout")?;
    }
    Ok(())
}

/// File names of the report bundle, in write order.
pub fn bundle_paths(out_dir: &Path, base_name: &str) -> [(Option<Audience>, PathBuf); 4] {
    [
        (
            Some(Audience::Technical),
            out_dir.join(format!("{base_name}_technical_report.md")),
        ),
        (
            Some(Audience::Business),
            out_dir.join(format!("{base_name}_business_report.md")),
        ),
        (
            Some(Audience::General),
            out_dir.join(format!("{base_name}_general_report.md")),
        ),
        (None, out_dir.join(format!("{base_name}_insights.json"))),
    ]
}

pub fn report(input: &Path, out_dir: &Path, base_name: &str, config: &StoryConfig) -> Result<()> {
    let story = load_story(input, config)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    // Materialise every document before touching the file system.
    let mut documents = Vec::with_capacity(4);
    for (audience, path) in bundle_paths(out_dir, base_name) {
        let document = match audience {
            Some(audience) => datastory_core::render(&story, audience),
            None => to_json_document(&export_insights(&story))?,
        };
        documents.push((path, document));
    }
    for (path, document) in &documents {
        write_file(path, document)?;
    }

    tracing::info!(
        key_findings = story.key_findings.len(),
        out_dir = %out_dir.display(),
        "Report bundle written"
    );
    Ok(())
}

pub fn render(input: &Path, audience: &str, config: &StoryConfig) -> Result<()> {
    let audience: Audience = audience.parse()?;
    let story = load_story(input, config)?;
    write_stdout(&datastory_core::render(&story, audience))
}

pub fn export(input: &Path, output: Option<&Path>, config: &StoryConfig) -> Result<()> {
    let story = load_story(input, config)?;
    let document = to_json_document(&export_insights(&story))?;
    match output {
        Some(path) => write_file(path, &document),
        None => write_stdout(&document),
    }
}

pub fn summary(input: &Path, config: &StoryConfig) -> Result<()> {
    let story = load_story(input, config)?;
    write_stdout(&render_dashboard(&story))
}

pub fn classify(metric: &str, value: f64, config: &StoryConfig) -> Result<()> {
    let classifier = SignificanceClassifier::from_config(config)?;
    let significance = classifier.classify_named(metric, value)?;
    write_stdout(significance.as_str())
}

// ============================================================================
// Tests
// ============================================================================
