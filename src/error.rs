//! Error types for the search pipeline

use serde::Serialize;
use std::fmt;

/// Errors that abort a search call
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The request was rejected before (or by) the API as malformed
    #[error("invalid request: {0}")]
    Validation(String),

    /// Bad or missing credential
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// API quota exhausted; `reset_at` is the unix time the quota refills, if known
    #[error("GitHub API rate limit exceeded")]
    RateLimited { reset_at: Option<u64> },

    /// Request did not complete in time
    #[error("request timed out")]
    Timeout,

    /// Network-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Any other non-success status from the API
    #[error("GitHub API returned HTTP {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// Payload could not be parsed
    #[error("invalid response from GitHub API: {0}")]
    InvalidResponse(String),
}

/// Outward-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Authentication,
    RateLimited,
    Transport,
    Upstream,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::RateLimited => "rate_limited",
            ErrorCategory::Transport => "transport",
            ErrorCategory::Upstream => "upstream",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SearchError {
    pub fn validation(message: impl Into<String>) -> Self {
        SearchError::Validation(message.into())
    }

    /// Category used by the web layer and the CLI to pick a status or exit code
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::Validation(_) => ErrorCategory::Validation,
            SearchError::Authentication(_) => ErrorCategory::Authentication,
            SearchError::RateLimited { .. } => ErrorCategory::RateLimited,
            SearchError::Timeout | SearchError::Transport(_) => ErrorCategory::Transport,
            SearchError::UpstreamStatus { .. } | SearchError::InvalidResponse(_) => {
                ErrorCategory::Upstream
            }
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else if err.is_decode() {
            SearchError::InvalidResponse(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::InvalidResponse(err.to_string())
    }
}

/// Convenience alias for pipeline results
pub type Result<T> = std::result::Result<T, SearchError>;
