//! In-memory quiz store.
//!
//! Quizzes live for the lifetime of the process. The map is sharded
//! ([`DashMap`]) so writers to different quizzes do not contend, while every
//! mutation of one quiz runs under that quiz's entry lock.
//!
//! ```
//! # use mcq_core::{Question, QuestionId, Quiz, QuizStore};
//! let store = QuizStore::new();
//! let q = Question::new(
//!     QuestionId::new("q1"),
//!     "Which planet is largest?",
//!     ["Mars", "Jupiter", "Venus", "Earth"].map(String::from),
//!     1,
//!     "It is a gas giant.",
//!     "Jupiter is the largest planet.",
//! )?;
//! let quiz = Quiz::new("planets.pdf", vec![q])?;
//! let id = quiz.quiz_id();
//! store.save(quiz);
//! assert_eq!(store.get(&id)?.source_name(), "planets.pdf");
//! # Ok::<(), mcq_core::QuizError>(())
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{QuizError, Result};
use crate::types::{Quiz, QuizId};

/// Thread-safe quiz store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct QuizStore {
    quizzes: Arc<DashMap<QuizId, Quiz>>,
}

impl QuizStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a quiz under its own id.
    pub fn save(&self, quiz: Quiz) {
        let id = quiz.quiz_id();
        let replaced = self.quizzes.insert(id, quiz).is_some();
        debug!(quiz_id = %id, replaced, "quiz saved");
    }

    /// Fetch a copy of a quiz.
    ///
    /// # Errors
    /// Returns [`QuizError::QuizNotFound`] if no quiz has this id.
    pub fn get(&self, quiz_id: &QuizId) -> Result<Quiz> {
        self.quizzes
            .get(quiz_id)
            .map(|entry| entry.value().clone())
            .ok_or(QuizError::QuizNotFound(*quiz_id))
    }

    /// Run `f` against the stored quiz while holding its write lock.
    ///
    /// The closure sees the live value, so whatever it leaves behind is what
    /// the store holds afterwards. Closures must not call back into the store
    /// for the same quiz.
    ///
    /// # Errors
    /// Returns [`QuizError::QuizNotFound`] if no quiz has this id, or whatever
    /// `f` returns.
    pub fn update<R>(&self, quiz_id: &QuizId, f: impl FnOnce(&mut Quiz) -> Result<R>) -> Result<R> {
        let mut entry = self
            .quizzes
            .get_mut(quiz_id)
            .ok_or(QuizError::QuizNotFound(*quiz_id))?;
        f(entry.value_mut())
    }

    /// Number of quizzes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}
