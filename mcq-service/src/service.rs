//! The quiz service facade.
//!
//! Owns the store and the generator and exposes the inbound operations.
//! Generation never runs under a store lock; answers run entirely under the
//! quiz's entry lock.

use mcq_core::config::{McqConfig, QuizLimits};
use mcq_core::types::{Question, QuestionId, Quiz, QuizId, QuizView};
use mcq_core::{AnswerOutcome, QuizStore};
use mcq_llm::{ChatTransport, GenerationClient, HttpTransport};
use serde::Serialize;
use tracing::{info, instrument};

use crate::document::assemble_pages;
use crate::error::{Result, ServiceError};

/// Result of turning a document into a stored quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    /// Id of the new quiz.
    pub quiz_id: QuizId,
    /// Number of questions generated.
    pub num_questions: usize,
}

/// Inbound operations over one store and one generator.
#[derive(Debug, Clone)]
pub struct QuizService<T = HttpTransport> {
    store: QuizStore,
    generator: GenerationClient<T>,
    limits: QuizLimits,
}

impl QuizService<HttpTransport> {
    /// Build an HTTP-backed service with a fresh store.
    ///
    /// # Errors
    /// Returns [`ServiceError::Generation`] if the prompt file cannot be loaded.
    pub fn from_config(config: &McqConfig) -> Result<Self> {
        let generator = GenerationClient::from_config(&config.llm)?;
        Ok(Self::new(QuizStore::new(), generator, config.quiz))
    }
}

impl<T: ChatTransport> QuizService<T> {
    /// Assemble a service from its parts.
    #[must_use]
    pub fn new(store: QuizStore, generator: GenerationClient<T>, limits: QuizLimits) -> Self {
        Self {
            store,
            generator,
            limits,
        }
    }

    /// Configured upper bounds.
    #[must_use]
    pub fn limits(&self) -> QuizLimits {
        self.limits
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &QuizStore {
        &self.store
    }

    /// The question generator.
    #[must_use]
    pub fn generator(&self) -> &GenerationClient<T> {
        &self.generator
    }

    /// Generate questions without storing a quiz.
    ///
    /// # Errors
    /// Returns [`ServiceError::Generation`] with the generator's classification.
    pub async fn generate(&self, text: &str, max_questions: usize) -> Result<Vec<Question>> {
        Ok(self.generator.generate(text, max_questions).await?)
    }

    /// Create and store a quiz from already generated questions.
    ///
    /// # Errors
    /// Returns [`ServiceError::Quiz`] if the list is empty or ids repeat.
    pub fn create_quiz(&self, source_name: &str, questions: Vec<Question>) -> Result<Quiz> {
        let quiz = Quiz::new(source_name, questions)?;
        self.store.save(quiz.clone());
        info!(
            quiz_id = %quiz.quiz_id(),
            source = source_name,
            questions = quiz.questions().len(),
            "quiz created"
        );
        Ok(quiz)
    }

    /// Generate a quiz from document text and store it.
    ///
    /// The question count is `requested` (or the configured maximum) clamped
    /// into `1..=max_questions`.
    ///
    /// # Errors
    /// - [`ServiceError::EmptyDocument`] if `text` is blank.
    /// - [`ServiceError::Generation`] if generation fails.
    #[instrument(skip(self, text), fields(text_chars = text.len()))]
    pub async fn create_quiz_from_text(
        &self,
        source_name: &str,
        text: &str,
        requested: Option<usize>,
    ) -> Result<UploadSummary> {
        if text.trim().is_empty() {
            return Err(ServiceError::EmptyDocument);
        }
        let target = self.limits.target_questions(requested);
        let questions = self.generate(text, target).await?;
        let quiz = self.create_quiz(source_name, questions)?;
        Ok(UploadSummary {
            quiz_id: quiz.quiz_id(),
            num_questions: quiz.questions().len(),
        })
    }

    /// Like [`Self::create_quiz_from_text`], from per-page text. Only the
    /// first `max_pages` pages are used.
    ///
    /// # Errors
    /// See [`Self::create_quiz_from_text`].
    pub async fn create_quiz_from_pages<S: AsRef<str>>(
        &self,
        source_name: &str,
        pages: &[S],
        requested: Option<usize>,
    ) -> Result<UploadSummary> {
        let text = assemble_pages(pages, self.limits.max_pages);
        self.create_quiz_from_text(source_name, &text, requested).await
    }

    /// Learner-facing view of a stored quiz.
    ///
    /// # Errors
    /// Returns [`ServiceError::Quiz`] with `QuizNotFound` for unknown ids.
    pub fn get_quiz(&self, quiz_id: &QuizId) -> Result<QuizView> {
        Ok(self.store.get(quiz_id)?.view())
    }

    /// Grade one answer.
    ///
    /// # Errors
    /// Returns [`ServiceError::Quiz`] with `QuizNotFound`, `QuestionNotFound`
    /// or `InvalidOption`; state is unchanged in each case.
    pub fn submit_answer(
        &self,
        quiz_id: &QuizId,
        question_id: &QuestionId,
        selected_index: i64,
    ) -> Result<AnswerOutcome> {
        Ok(mcq_core::submit_answer(
            &self.store,
            quiz_id,
            question_id,
            selected_index,
        )?)
    }
}
