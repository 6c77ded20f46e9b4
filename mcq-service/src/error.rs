//! Service-level errors.

use mcq_core::QuizError;
use mcq_llm::LlmError;

/// Errors surfaced by [`crate::QuizService`] and settings loading.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Quiz lookup, validation or answer error.
    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// Question generation failed.
    #[error("question generation failed: {0}")]
    Generation(#[from] LlmError),

    /// The document produced no usable text.
    #[error("document contains no extractable text")]
    EmptyDocument,

    /// Settings could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    /// Whether the caller sent a bad request, as opposed to an upstream failure.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyDocument
                | Self::Quiz(
                    QuizError::QuizNotFound(_)
                        | QuizError::QuestionNotFound { .. }
                        | QuizError::InvalidOption { .. }
                )
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
