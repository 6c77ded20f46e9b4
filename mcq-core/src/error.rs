//! Error types for the MCQ core library.

use thiserror::Error;

use crate::types::{QuestionId, QuizId};

/// Top-level error type for quiz model, store and answer operations.
#[derive(Error, Debug)]
pub enum QuizError {
    /// No quiz with the given ID is held by the store.
    #[error("Quiz not found: {0}")]
    QuizNotFound(QuizId),

    /// The quiz exists but has no question with the given ID.
    #[error("Question not found: {question_id} (quiz {quiz_id})")]
    QuestionNotFound {
        /// Quiz that was searched.
        quiz_id: QuizId,
        /// Question that was requested.
        question_id: QuestionId,
    },

    /// The selected option index does not address one of the question's options.
    #[error("Invalid option index {index}: question has {option_count} options")]
    InvalidOption {
        /// Index the caller submitted.
        index: i64,
        /// Number of options on the question.
        option_count: usize,
    },

    /// A question failed model validation.
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    /// A quiz must contain at least one question.
    #[error("A quiz needs at least one question")]
    EmptyQuiz,

    /// Two questions in one quiz share an ID.
    #[error("Duplicate question id in quiz: {0}")]
    DuplicateQuestionId(QuestionId),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, QuizError>;
