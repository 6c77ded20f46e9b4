//! Integration tests — end-to-end quiz flows through the public API.

use mcq_core::answer::submit_answer;
use mcq_core::types::{Question, QuestionId, Quiz, QuizId};
use mcq_core::{QuizError, QuizStore};

fn question(id: &str, correct: usize) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Which option matches {id}?"),
        ["red", "green", "blue", "yellow"].map(String::from),
        correct,
        format!("Hint for {id}"),
        format!("Explanation for {id}"),
    )
    .expect("valid question")
}

fn store_with(questions: Vec<Question>) -> (QuizStore, QuizId) {
    let quiz = Quiz::new("lecture-notes.pdf", questions).expect("quiz");
    let id = quiz.quiz_id();
    let store = QuizStore::new();
    store.save(quiz);
    (store, id)
}

// ---------------------------------------------------------------------------
// `completed` iff all questions correct, for 1, 2 and N questions
// ---------------------------------------------------------------------------

#[test]
fn single_question_quiz() {
    let (store, id) = store_with(vec![question("q1", 2)]);

    let wrong = submit_answer(&store, &id, &"q1".into(), 1).expect("graded");
    assert!(!wrong.quiz_completed);
    assert_eq!(wrong.hint.as_deref(), Some("Hint for q1"));

    let right = submit_answer(&store, &id, &"q1".into(), 2).expect("graded");
    assert!(right.quiz_completed);
    assert_eq!(right.explanation.as_deref(), Some("Explanation for q1"));
}

#[test]
fn two_question_quiz_partial_then_full() {
    let (store, id) = store_with(vec![question("q1", 0), question("q2", 3)]);

    let first = submit_answer(&store, &id, &"q2".into(), 3).expect("graded");
    assert!(first.question_completed);
    assert!(!first.quiz_completed);
    assert!(!store.get(&id).expect("quiz").completed());

    let second = submit_answer(&store, &id, &"q1".into(), 0).expect("graded");
    assert!(second.quiz_completed);
    assert!(store.get(&id).expect("quiz").completed());
}

#[test]
fn n_question_quiz_completes_only_at_the_end() {
    let n = 7;
    let questions = (1..=n).map(|i| question(&format!("q{i}"), i % 4)).collect();
    let (store, id) = store_with(questions);

    for i in 1..=n {
        let outcome =
            submit_answer(&store, &id, &QuestionId::positional(i), (i % 4) as i64).expect("graded");
        assert_eq!(outcome.quiz_completed, i == n, "after answering q{i}");
        let quiz = store.get(&id).expect("quiz");
        assert_eq!(quiz.correct_count(), i);
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn option_five_is_invalid_and_changes_nothing() {
    let (store, id) = store_with(vec![question("q1", 0), question("q2", 1)]);
    let before = store.get(&id).expect("quiz");

    let err = submit_answer(&store, &id, &"q1".into(), 5).expect_err("invalid option");
    assert!(matches!(err, QuizError::InvalidOption { index: 5, option_count: 4 }));
    assert_eq!(store.get(&id).expect("quiz"), before);
}

#[test]
fn last_of_three_reports_completion() {
    let (store, id) = store_with(vec![question("q1", 1), question("q2", 2), question("q3", 3)]);
    submit_answer(&store, &id, &"q1".into(), 1).expect("graded");
    submit_answer(&store, &id, &"q2".into(), 2).expect("graded");

    let outcome = submit_answer(&store, &id, &"q3".into(), 3).expect("graded");
    assert!(outcome.correct);
    assert!(outcome.question_completed);
    assert!(outcome.quiz_completed);
    assert!(outcome.explanation.is_some());
    assert!(outcome.hint.is_none());
}

#[test]
fn public_view_tracks_progress() {
    let (store, id) = store_with(vec![question("q1", 1), question("q2", 2)]);
    submit_answer(&store, &id, &"q1".into(), 1).expect("graded");

    let view = store.get(&id).expect("quiz").view();
    assert_eq!(view.quiz_id, id);
    assert!(!view.completed);
    assert!(view.questions[0].is_correct);
    assert!(!view.questions[1].is_correct);
    assert_eq!(view.questions[1].options[2], "blue");
}

#[test]
fn outcome_serializes_with_nulls() {
    let (store, id) = store_with(vec![question("q1", 1)]);
    let outcome = submit_answer(&store, &id, &"q1".into(), 0).expect("graded");
    let json = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(json["correct"], false);
    assert!(json["explanation"].is_null());
    assert_eq!(json["hint"], "Hint for q1");
    assert_eq!(json["question_completed"], false);
    assert_eq!(json["quiz_completed"], false);
}
