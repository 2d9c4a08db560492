use thiserror::Error;

use crate::llm_client::LlmError;

/// Coarse classification of a failure. The orchestrator matches on this to
/// decide whether a section falls back or the whole run aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The model endpoint did not answer inside the call's time budget.
    Timeout,
    /// The model answered, but not with the shape we asked for.
    ParseError,
    /// Authentication, rate limiting, transport or any other provider failure.
    UpstreamError,
    /// The input document is not a PDF or Word file.
    UnsupportedFormat,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::ParseError => "parse_error",
            ErrorKind::UpstreamError => "upstream_error",
            ErrorKind::UnsupportedFormat => "unsupported_format",
        }
    }
}

/// Application-level error type for a single resume run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document: {0}")]
    Document(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Unexpected model output: {0}")]
    Parse(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            AppError::Llm(e) => e.kind(),
            AppError::Parse(_) | AppError::Document(_) => ErrorKind::ParseError,
            AppError::Io(_) => ErrorKind::UpstreamError,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_timeout_maps_to_timeout_kind() {
        let err = AppError::from(LlmError::Timeout {
            timeout: std::time::Duration::from_secs(8),
        });
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.is_timeout());
    }

    #[test]
    fn test_api_error_is_upstream() {
        let err = AppError::from(LlmError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::UpstreamError);
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = AppError::UnsupportedFormat(".txt".to_string());
        assert_eq!(err.to_string(), "Unsupported file type .txt");
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_serde_error_becomes_parse_error() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = AppError::from(bad);
        assert_eq!(err.kind(), ErrorKind::ParseError);
    }
}
