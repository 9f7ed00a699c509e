//! Insight records: significance scoring, templates, and text generation.

pub mod scoring;
pub mod templates;
pub mod generator;

pub use scoring::*;
pub use templates::*;
pub use generator::*;
