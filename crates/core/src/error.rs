// crates/core/src/error.rs
use thiserror::Error;

/// Errors surfaced by the storytelling engine.
///
/// Missing or malformed analysis slices are not errors: extractors skip the
/// affected insight and keep going. Everything here is either a programming
/// error (unknown metric class, bad threshold table) or a sink failure.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Unknown metric class: {name} (expected correlation, variance_explained or outlier_rate)")]
    UnknownMetricClass { name: String },

    #[error("Unknown audience: {name} (expected technical, business or general)")]
    UnknownAudience { name: String },

    #[error("Invalid threshold table for {class}: {reason}")]
    InvalidThresholds { class: String, reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Malformed analysis results: {message}")]
    MalformedResults { message: String },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write document to sink: {source}")]
    Sink {
        #[source]
        source: std::io::Error,
    },
}

impl StoryError {
    pub fn sink(source: std::io::Error) -> Self {
        Self::Sink { source }
    }

    pub fn invalid_thresholds(class: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidThresholds {
            class: class.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResults {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_metric_display() {
        let err = StoryError::UnknownMetricClass {
            name: "entropy".to_string(),
        };
        assert!(err.to_string().contains("entropy"));
        assert!(err.to_string().contains("outlier_rate"));
    }

    #[test]
    fn test_sink_error_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = StoryError::sink(io_err);
        match err {
            StoryError::Sink { source } => assert_eq!(source.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("expected sink error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_thresholds_display() {
        let err = StoryError::invalid_thresholds("correlation", "high must exceed medium");
        let msg = err.to_string();
        assert!(msg.contains("correlation"));
        assert!(msg.contains("high must exceed medium"));
    }
}
