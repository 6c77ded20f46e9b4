//! Validation and repair of provider output into [`Question`]s.
//!
//! The only repair performed is id assignment: a missing or empty `id` becomes
//! `q{position}`, and afterwards any blank or repeated id is replaced with a
//! fresh random one. Every other field is required; a missing or ill-typed
//! field rejects the whole response.

use mcq_core::types::{OPTION_COUNT, Question, QuestionId, ensure_unique_ids};
use tracing::warn;

use crate::error::LlmError;
use crate::types::{RawQuestion, RawQuestionSet};

/// Parse a provider's raw text into at most `max_questions` validated questions.
///
/// # Errors
/// Returns [`LlmError::MalformedResponse`] if the text is not the expected JSON
/// object, a required field is missing, a question breaks a model invariant,
/// or no questions are present.
pub fn parse_questions(raw: &str, max_questions: usize) -> Result<Vec<Question>, LlmError> {
    let payload: RawQuestionSet = serde_json::from_str(raw.trim()).map_err(|e| {
        LlmError::MalformedResponse(format!("JSON parse error: {e}; raw text: '{}'", excerpt(raw)))
    })?;

    if payload.questions.is_empty() {
        return Err(LlmError::MalformedResponse(
            "response contained no questions".into(),
        ));
    }

    let mut questions = payload
        .questions
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| convert(idx + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;

    if questions.len() > max_questions {
        warn!(
            returned = questions.len(),
            requested = max_questions,
            "provider returned more questions than requested; truncating"
        );
        questions.truncate(max_questions.max(1));
    }

    ensure_unique_ids(&mut questions);
    Ok(questions)
}

fn convert(position: usize, raw: RawQuestion) -> Result<Question, LlmError> {
    let id = resolve_id(raw.id.as_ref()).unwrap_or_else(|| QuestionId::positional(position));

    let count = raw.options.len();
    let options: [String; OPTION_COUNT] = raw.options.try_into().map_err(|_| {
        LlmError::MalformedResponse(format!(
            "question {position}: expected {OPTION_COUNT} options, got {count}"
        ))
    })?;

    let correct = usize::try_from(raw.correct_option_index).map_err(|_| {
        LlmError::MalformedResponse(format!(
            "question {position}: correct_option_index {} is negative",
            raw.correct_option_index
        ))
    })?;

    Ok(Question::new(
        id,
        raw.question,
        options,
        correct,
        raw.hint,
        raw.explanation,
    )?)
}

/// Accept string or numeric ids; anything else counts as absent.
fn resolve_id(value: Option<&serde_json::Value>) -> Option<QuestionId> {
    match value? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(QuestionId::new(s.trim())),
        serde_json::Value::Number(n) => Some(QuestionId::new(n.to_string())),
        _ => None,
    }
}

fn excerpt(raw: &str) -> String {
    const MAX: usize = 200;
    match raw.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}…", &raw[..cut]),
        None => raw.to_string(),
    }
}
