//! Core type definitions for quizzes.
//!
//! A [`Quiz`] owns an ordered, fixed list of [`Question`]s. The only mutable
//! state is each question's `is_correct` flag and the quiz-level `completed`
//! cache derived from them; both change exclusively through
//! [`crate::answer`].

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::error::{QuizError, Result};

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for a quiz in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuizId(pub Uuid);

impl QuizId {
    /// Create a new random quiz ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuizId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Identifier of a question, unique within its quiz.
///
/// Providers usually hand out `q1`, `q2`, ...; the value is otherwise opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Wrap an identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Positional identifier, `q{position}` (1-based).
    #[must_use]
    pub fn positional(position: usize) -> Self {
        Self(format!("q{position}"))
    }

    /// Short random identifier, `q` followed by 8 hex characters.
    #[must_use]
    pub fn random() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("q{}", &hex[..8]))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// A single multiple-choice question.
///
/// Invariants enforced by [`Question::new`]: non-empty text, hint and
/// explanation; four distinct options; `correct_option_index < 4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    #[serde(rename = "question")]
    text: String,
    options: [String; OPTION_COUNT],
    correct_option_index: usize,
    hint: String,
    explanation: String,
    is_correct: bool,
}

impl Question {
    /// Build a validated, unanswered question.
    ///
    /// # Errors
    /// Returns [`QuizError::InvalidQuestion`] when an invariant does not hold.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_option_index: usize,
        hint: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self> {
        let question = Self {
            id,
            text: text.into(),
            options,
            correct_option_index,
            hint: hint.into(),
            explanation: explanation.into(),
            is_correct: false,
        };
        question.validate()?;
        Ok(question)
    }

    fn validate(&self) -> Result<()> {
        let blank = |field: &str, value: &str| {
            if value.trim().is_empty() {
                Err(QuizError::InvalidQuestion(format!(
                    "question {}: {field} must not be empty",
                    self.id
                )))
            } else {
                Ok(())
            }
        };
        blank("question", &self.text)?;
        blank("hint", &self.hint)?;
        blank("explanation", &self.explanation)?;

        if self.correct_option_index >= OPTION_COUNT {
            return Err(QuizError::InvalidQuestion(format!(
                "question {}: correct_option_index {} out of range 0-{}",
                self.id,
                self.correct_option_index,
                OPTION_COUNT - 1
            )));
        }

        let distinct: HashSet<&str> = self.options.iter().map(|o| o.trim()).collect();
        if distinct.len() != OPTION_COUNT || distinct.contains("") {
            return Err(QuizError::InvalidQuestion(format!(
                "question {}: options must be {OPTION_COUNT} distinct, non-empty strings",
                self.id
            )));
        }
        Ok(())
    }

    /// Question identifier.
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Question prompt.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The four answer options, in display order.
    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Index into [`Question::options`] of the correct answer.
    #[must_use]
    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    /// Hint shown after a wrong answer.
    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Explanation shown after a correct answer.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether this question has been answered correctly at least once.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    pub(crate) fn set_id(&mut self, id: QuestionId) {
        self.id = id;
    }

    pub(crate) fn mark_correct(&mut self) {
        self.is_correct = true;
    }
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// A quiz generated from one source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    quiz_id: QuizId,
    source_name: String,
    questions: Vec<Question>,
    completed: bool,
}

impl Quiz {
    /// Create a quiz with a fresh [`QuizId`] and its full question list.
    ///
    /// # Errors
    /// - [`QuizError::EmptyQuiz`] if `questions` is empty.
    /// - [`QuizError::DuplicateQuestionId`] if two questions share an id.
    pub fn new(source_name: impl Into<String>, questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id()) {
                return Err(QuizError::DuplicateQuestionId(q.id().clone()));
            }
        }

        let mut quiz = Self {
            quiz_id: QuizId::new(),
            source_name: source_name.into(),
            questions,
            completed: false,
        };
        quiz.refresh_completed();
        Ok(quiz)
    }

    /// Quiz identifier.
    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    /// Label of the document the quiz was generated from.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Questions in presentation order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// True iff every question has been answered correctly.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Number of questions answered correctly so far.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }

    /// Questions not yet answered correctly, in order.
    pub fn remaining(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| !q.is_correct())
    }

    pub(crate) fn question_mut(&mut self, id: &QuestionId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id() == id)
    }

    /// Recompute the `completed` cache from the questions' flags.
    pub(crate) fn refresh_completed(&mut self) {
        self.completed = all_correct(&self.questions);
    }

    /// Public view that hides answers, hints and explanations.
    #[must_use]
    pub fn view(&self) -> QuizView {
        QuizView {
            quiz_id: self.quiz_id,
            source_name: self.source_name.clone(),
            completed: self.completed,
            questions: self
                .questions
                .iter()
                .map(|q| QuestionView {
                    id: q.id.clone(),
                    question: q.text.clone(),
                    options: q.options.clone(),
                    is_correct: q.is_correct,
                })
                .collect(),
        }
    }
}

/// True iff every question in `questions` is answered correctly.
#[must_use]
pub fn all_correct<'a>(questions: impl IntoIterator<Item = &'a Question>) -> bool {
    questions.into_iter().all(Question::is_correct)
}

/// Make question ids unique and non-empty.
///
/// Blank ids and repeats of an earlier id are replaced with
/// [`QuestionId::random`] values.
pub fn ensure_unique_ids(questions: &mut [Question]) {
    let mut seen: HashSet<QuestionId> = HashSet::with_capacity(questions.len());
    for q in questions.iter_mut() {
        if q.id().is_blank() || seen.contains(q.id()) {
            let mut fresh = QuestionId::random();
            while seen.contains(&fresh) {
                fresh = QuestionId::random();
            }
            tracing::debug!(old = %q.id(), new = %fresh, "reassigned question id");
            q.set_id(fresh);
        }
        seen.insert(q.id().clone());
    }
}

// ---------------------------------------------------------------------------
// Public views
// ---------------------------------------------------------------------------

/// Learner-facing view of a question: no correct index, hint or explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    /// Question identifier.
    pub id: QuestionId,
    /// Question prompt.
    pub question: String,
    /// The four options.
    pub options: [String; OPTION_COUNT],
    /// Whether it has been answered correctly.
    pub is_correct: bool,
}

/// Learner-facing view of a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    /// Quiz identifier.
    pub quiz_id: QuizId,
    /// Source document label.
    pub source_name: String,
    /// Whether every question has been answered correctly.
    pub completed: bool,
    /// Questions in order.
    pub questions: Vec<QuestionView>,
}
