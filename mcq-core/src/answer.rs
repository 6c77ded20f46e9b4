//! Answer state machine.
//!
//! Per question the states are `Unanswered` and `Correct`; the only
//! transition is `Unanswered → Correct` on a matching index, and `Correct` is
//! terminal. A quiz's `completed` flag is recomputed after every transition.
//!
//! Disclosure is asymmetric: the explanation is only returned for a correct
//! answer and the hint only for an incorrect one.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{QuizError, Result};
use crate::store::QuizStore;
use crate::types::{QuestionId, Quiz, QuizId};

/// Result of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    /// Whether the selected option was the correct one.
    pub correct: bool,
    /// Explanation, present only when `correct`.
    pub explanation: Option<String>,
    /// Hint, present only when not `correct`.
    pub hint: Option<String>,
    /// Equal to `correct`.
    pub question_completed: bool,
    /// The quiz's `completed` value after this submission.
    pub quiz_completed: bool,
}

/// Grade `selected_index` for one question of `quiz`, updating it in place.
///
/// Every check runs before any mutation, so an error leaves `quiz` as it was.
///
/// # Errors
/// - [`QuizError::QuestionNotFound`] if the quiz has no such question.
/// - [`QuizError::InvalidOption`] if `selected_index` is outside the options.
pub fn apply_answer(
    quiz: &mut Quiz,
    question_id: &QuestionId,
    selected_index: i64,
) -> Result<AnswerOutcome> {
    let quiz_id = quiz.quiz_id();
    let question = quiz
        .question_mut(question_id)
        .ok_or_else(|| QuizError::QuestionNotFound {
            quiz_id,
            question_id: question_id.clone(),
        })?;

    let option_count = question.options().len();
    let selected = usize::try_from(selected_index)
        .ok()
        .filter(|&i| i < option_count)
        .ok_or(QuizError::InvalidOption {
            index: selected_index,
            option_count,
        })?;

    if selected != question.correct_option_index() {
        debug!(%quiz_id, %question_id, selected, "incorrect answer");
        let hint = question.hint().to_owned();
        return Ok(AnswerOutcome {
            correct: false,
            explanation: None,
            hint: Some(hint),
            question_completed: false,
            quiz_completed: quiz.completed(),
        });
    }

    let first_time = !question.is_correct();
    question.mark_correct();
    let explanation = question.explanation().to_owned();
    quiz.refresh_completed();

    if first_time {
        info!(
            %quiz_id,
            %question_id,
            answered = quiz.correct_count(),
            total = quiz.questions().len(),
            completed = quiz.completed(),
            "question answered correctly"
        );
    }

    Ok(AnswerOutcome {
        correct: true,
        explanation: Some(explanation),
        hint: None,
        question_completed: true,
        quiz_completed: quiz.completed(),
    })
}

/// Grade a submission against the quiz held in `store`.
///
/// The lookup, the flag flip and the `completed` recompute all happen under
/// the quiz's entry lock, so concurrent submissions cannot lose an update.
///
/// # Errors
/// - [`QuizError::QuizNotFound`] if the store has no such quiz.
/// - Any error from [`apply_answer`].
pub fn submit_answer(
    store: &QuizStore,
    quiz_id: &QuizId,
    question_id: &QuestionId,
    selected_index: i64,
) -> Result<AnswerOutcome> {
    store.update(quiz_id, |quiz| apply_answer(quiz, question_id, selected_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::question;

    fn stored(correct: &[usize]) -> (QuizStore, QuizId) {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, &c)| question(&format!("q{}", i + 1), c))
            .collect();
        let quiz = Quiz::new("doc.pdf", questions).expect("quiz");
        let id = quiz.quiz_id();
        let store = QuizStore::new();
        store.save(quiz);
        (store, id)
    }

    #[test]
    fn unknown_quiz() {
        let (store, _) = stored(&[0]);
        let err = submit_answer(&store, &QuizId::new(), &"q1".into(), 0).expect_err("missing");
        assert!(matches!(err, QuizError::QuizNotFound(_)));
    }

    #[test]
    fn unknown_question() {
        let (store, id) = stored(&[0]);
        let err = submit_answer(&store, &id, &"q9".into(), 0).expect_err("missing");
        assert!(matches!(err, QuizError::QuestionNotFound { question_id, .. } if question_id.as_str() == "q9"));
    }

    #[test]
    fn out_of_range_index_is_rejected_without_mutation() {
        let (store, id) = stored(&[1]);
        let before = store.get(&id).expect("quiz");
        for bad in [4, 5, -1, i64::MAX, i64::MIN] {
            let err = submit_answer(&store, &id, &"q1".into(), bad).expect_err("invalid");
            assert!(matches!(err, QuizError::InvalidOption { index, option_count: 4 } if index == bad));
        }
        assert_eq!(store.get(&id).expect("quiz"), before);
    }

    #[test]
    fn invalid_option_checked_even_after_correct() {
        let (store, id) = stored(&[1, 2]);
        submit_answer(&store, &id, &"q1".into(), 1).expect("correct");
        let err = submit_answer(&store, &id, &"q1".into(), 7).expect_err("invalid");
        assert!(matches!(err, QuizError::InvalidOption { .. }));
    }

    #[test]
    fn incorrect_answer_reveals_hint_only() {
        let (store, id) = stored(&[2]);
        let outcome = submit_answer(&store, &id, &"q1".into(), 0).expect("graded");
        assert!(!outcome.correct);
        assert!(!outcome.question_completed);
        assert!(!outcome.quiz_completed);
        assert!(outcome.explanation.is_none());
        assert_eq!(outcome.hint.as_deref(), Some("Think about the first paragraph."));
        assert_eq!(store.get(&id).expect("quiz").correct_count(), 0);
    }

    #[test]
    fn correct_answer_reveals_explanation_only() {
        let (store, id) = stored(&[2, 0]);
        let outcome = submit_answer(&store, &id, &"q1".into(), 2).expect("graded");
        assert!(outcome.correct);
        assert!(outcome.question_completed);
        assert!(!outcome.quiz_completed);
        assert!(outcome.hint.is_none());
        assert_eq!(
            outcome.explanation.as_deref(),
            Some("It is stated in the first paragraph.")
        );
    }

    #[test]
    fn last_question_completes_quiz() {
        let (store, id) = stored(&[0, 1, 2]);
        submit_answer(&store, &id, &"q1".into(), 0).expect("graded");
        submit_answer(&store, &id, &"q2".into(), 1).expect("graded");
        let outcome = submit_answer(&store, &id, &"q3".into(), 2).expect("graded");
        assert!(outcome.question_completed);
        assert!(outcome.quiz_completed);
        assert!(outcome.explanation.is_some());
        assert!(outcome.hint.is_none());
        assert!(store.get(&id).expect("quiz").completed());
    }

    #[test]
    fn re_answering_correctly_is_idempotent() {
        let (store, id) = stored(&[3, 0]);
        submit_answer(&store, &id, &"q1".into(), 3).expect("graded");
        let before = store.get(&id).expect("quiz");
        let outcome = submit_answer(&store, &id, &"q1".into(), 3).expect("graded");
        assert!(outcome.correct);
        assert!(!outcome.quiz_completed);
        assert_eq!(store.get(&id).expect("quiz"), before);
    }

    #[test]
    fn wrong_answer_never_unsets_correct() {
        let (store, id) = stored(&[3]);
        submit_answer(&store, &id, &"q1".into(), 3).expect("graded");
        let outcome = submit_answer(&store, &id, &"q1".into(), 0).expect("graded");
        assert!(!outcome.correct);
        assert!(outcome.quiz_completed, "completed stays true");
        let quiz = store.get(&id).expect("quiz");
        assert!(quiz.questions()[0].is_correct());
        assert!(quiz.completed());
    }

    #[test]
    fn concurrent_submissions_complete_quiz() {
        let n = 16;
        let (store, id) = stored(&vec![1; n]);
        std::thread::scope(|s| {
            for i in 0..n {
                let store = &store;
                let id = &id;
                s.spawn(move || {
                    let qid = QuestionId::positional(i + 1);
                    for _ in 0..4 {
                        submit_answer(store, id, &qid, 1).expect("graded");
                    }
                });
            }
        });
        let quiz = store.get(&id).expect("quiz");
        assert_eq!(quiz.correct_count(), n);
        assert!(quiz.completed());
    }
}
