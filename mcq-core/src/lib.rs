//! # MCQ Core Library
//!
//! Data model and state for multiple-choice quizzes generated from a
//! document's text.
//!
//! - [`Question`] / [`Quiz`] — the quiz aggregate and its invariants
//!   (exactly four options, a valid correct index, unique question ids).
//! - [`QuizStore`] — process-lifetime, in-memory store keyed by [`QuizId`]
//!   with per-quiz write locking.
//! - [`answer`] — the answer state machine: `Unanswered → Correct` per
//!   question, `completed` derived over the whole quiz.
//!
//! Question *generation* lives in `mcq-llm`; wiring both together lives in
//! `mcq-service`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod answer;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use answer::{AnswerOutcome, submit_answer};
pub use config::McqConfig;
pub use error::QuizError;
pub use store::QuizStore;
pub use types::*;
