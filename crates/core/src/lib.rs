// crates/core/src/lib.rs
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod extractors;
pub mod insights;
pub mod narrative;
pub mod results;
pub mod story;

pub use config::*;
pub use dashboard::render_dashboard;
pub use error::*;
pub use export::*;
pub use extractors::{extract_all_insights, ExtractContext, Extractor};
pub use insights::*;
pub use narrative::{render, Audience, NarrativeRenderer};
pub use results::AnalysisResults;
pub use story::*;
