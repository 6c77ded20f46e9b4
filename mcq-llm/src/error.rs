//! LLM error types.

use mcq_core::QuizError;
use thiserror::Error;

/// Failure of a single completion attempt.
///
/// Rate limiting is its own variant because it is the only failure the
/// client retries.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Provider answered HTTP 429.
    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    /// Provider answered with another non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// The completion envelope could not be decoded.
    #[error("undecodable completion: {0}")]
    Decode(String),
}

impl TransportError {
    /// Classify a `reqwest` failure for a request with the given timeout.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.status().is_some_and(|s| s.as_u16() == 429) {
            Self::RateLimited(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Whether this failure is worth another attempt.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

/// Errors surfaced by question generation.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Every attempt was rate limited.
    #[error("LLM provider still rate limited after {attempts} attempts: {last_error}")]
    RateLimited {
        /// How many attempts were made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        last_error: TransportError,
    },

    /// A non-rate-limit failure; never retried.
    #[error("LLM request failed: {0}")]
    Request(#[source] TransportError),

    /// Provider output did not match the required question schema.
    #[error("LLM output schema validation failed: {0}")]
    MalformedResponse(String),

    /// Configuration error.
    #[error("LLM configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Whether the caller may reasonably try again later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<QuizError> for LlmError {
    fn from(err: QuizError) -> Self {
        LlmError::MalformedResponse(err.to_string())
    }
}
