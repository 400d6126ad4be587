//! Outcome and error types for the report pipeline.

use crate::extraction::ExtractionError;
use crate::summarization::SummarizationClientError;
use thiserror::Error;

/// Errors emitted by the report pipeline after the upload has been accepted.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The upload could not be staged on disk.
    #[error("Failed to stage upload: {0}")]
    Storage(#[source] std::io::Error),
    /// The staged file could not be read as a PDF.
    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),
    /// The hosted model did not produce a summary.
    #[error("{0}")]
    Summarization(#[from] SummarizationClientError),
    /// The blocking worker running staging and extraction panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ReportError {
    /// Stable machine-readable name for the failure, surfaced as `error_kind` over HTTP.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Storage(_) => "storage",
            Self::Extraction(_) => "extraction",
            Self::Summarization(inner) => inner.kind(),
            Self::Task(_) => "internal",
        }
    }
}

/// Result of a report that made it through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Summary text returned by the model.
    pub summary: String,
    /// Number of PDF pages extracted.
    pub page_count: usize,
    /// Character count of the extracted text sent to the model.
    pub text_chars: usize,
}

/// Model parameters applied to every summarization request.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Chat-completion model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarization_errors_keep_their_kind() {
        let error = ReportError::from(SummarizationClientError::Authentication("401".into()));
        assert_eq!(error.kind(), "authentication");
        assert!(error.to_string().contains("rejected credentials"));
    }

    #[test]
    fn storage_errors_are_tagged() {
        let error = ReportError::Storage(std::io::Error::other("disk full"));
        assert_eq!(error.kind(), "storage");
    }
}
