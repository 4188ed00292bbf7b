//! Error types shared across chemdrill crates.
//!
//! `ProviderError` lives here rather than in the providers crate so the
//! session can classify load failures without string matching.

use thiserror::Error;

/// Errors that can occur when fetching a question or posting an attempt.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key or token).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The backend returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, ProviderError::AuthenticationFailed(_))
    }
}

/// Errors returned by a [`QuizSession`](crate::session::QuizSession) step.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// An answer was submitted while no question was on screen.
    #[error("no question is loaded; load or retry before submitting")]
    NoActiveQuestion,
}
