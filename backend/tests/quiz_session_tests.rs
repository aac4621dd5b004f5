// tests/quiz_session_tests.rs

use std::sync::{Arc, Mutex};

use eduspace::models::question::Question;
use eduspace::models::quiz_session::{Advance, QuizPhase, QuizScore, QuizSession};

fn sample_quiz(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question::new(format!("Question {}", i), ["A", "B", "C", "D"], i % 4))
        .collect()
}

/// Answers every question correctly and advances through the whole quiz.
fn answer_all_correctly(session: &mut QuizSession, quiz: &[Question]) -> Advance {
    let mut last = Advance::AlreadyCompleted;
    for q in quiz {
        session.select_answer(q.correct_answer_index);
        last = session.advance();
    }
    last
}

#[test]
fn single_question_scenario() {
    let quiz = vec![Question::new("2+2?", ["3", "4", "5", "6"], 1)];
    let mut session = QuizSession::new(quiz);

    session.select_answer(1);
    let outcome = session.advance();

    assert_eq!(outcome, Advance::Completed(QuizScore { score: 1, total: 1 }));
    assert_eq!(session.phase(), QuizPhase::Completed);

    let results = session.results_view().expect("completed quiz has results");
    assert_eq!(results.len(), 1);
    assert!(results[0].correct);
    assert_eq!(results[0].correct_option, "4");
    assert_eq!(results[0].chosen_option.as_deref(), Some("4"));
}

#[test]
fn all_correct_scores_full_marks() {
    for n in 0..6 {
        let quiz = sample_quiz(n);
        let mut session = QuizSession::new(quiz.clone());

        if n == 0 {
            session.advance();
        } else {
            answer_all_correctly(&mut session, &quiz);
        }

        assert_eq!(session.phase(), QuizPhase::Completed, "n = {}", n);
        assert_eq!(session.score(), Some(QuizScore { score: n, total: n }));
    }
}

#[test]
fn one_unanswered_question_costs_one_point() {
    let quiz = sample_quiz(5);
    for skipped in 0..quiz.len() {
        let mut session = QuizSession::new(quiz.clone());
        for (i, q) in quiz.iter().enumerate() {
            if i != skipped {
                session.select_answer(q.correct_answer_index);
            }
            session.advance();
        }

        assert_eq!(session.score(), Some(QuizScore { score: 4, total: 5 }));
        let results = session.results_view().unwrap();
        assert!(!results[skipped].correct);
        assert_eq!(results[skipped].chosen_index, None);
        assert_eq!(results[skipped].chosen_option, None);
    }
}

#[test]
fn advance_moves_forward_without_an_answer() {
    let mut session = QuizSession::new(sample_quiz(3));

    assert_eq!(session.advance(), Advance::Moved { current_index: 1 });
    assert_eq!(session.advance(), Advance::Moved { current_index: 2 });
    assert_eq!(session.phase(), QuizPhase::InProgress);
    assert_eq!(session.answered_count(), 0);
}

#[test]
fn select_answer_overwrites_and_stays_on_question() {
    let mut session = QuizSession::new(sample_quiz(2));

    session.select_answer(2);
    session.select_answer(3);

    assert_eq!(session.current_index(), 0);
    assert_eq!(session.answers(), &[Some(3), None]);
}

#[test]
fn out_of_range_answer_is_ignored() {
    let mut session = QuizSession::new(sample_quiz(1));

    session.select_answer(0);
    session.select_answer(4);

    assert_eq!(session.answers(), &[Some(0)]);
}

#[test]
fn completion_is_reported_once_per_pass() {
    let seen: Arc<Mutex<Vec<QuizScore>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let quiz = sample_quiz(2);
    let mut session = QuizSession::with_listener(quiz.clone(), move |score| {
        sink.lock().unwrap().push(score);
    });

    answer_all_correctly(&mut session, &quiz);
    assert_eq!(session.advance(), Advance::AlreadyCompleted);
    assert_eq!(session.advance(), Advance::AlreadyCompleted);
    assert_eq!(seen.lock().unwrap().len(), 1);

    // A retake is a new pass and reports again
    assert!(session.reset());
    session.advance();
    session.advance();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![QuizScore { score: 2, total: 2 }, QuizScore { score: 0, total: 2 }]
    );
}

#[test]
fn answers_after_completion_are_ignored() {
    let quiz = vec![Question::new("Capital of France?", ["Rome", "Paris", "Oslo", "Bern"], 1)];
    let mut session = QuizSession::new(quiz);

    session.select_answer(0);
    session.advance();
    session.select_answer(1);

    assert_eq!(session.score(), Some(QuizScore { score: 0, total: 1 }));
    assert_eq!(session.answers(), &[Some(0)]);
}

#[test]
fn reset_restores_a_fresh_pass() {
    let quiz = sample_quiz(3);
    let mut session = QuizSession::new(quiz.clone());
    answer_all_correctly(&mut session, &quiz);

    assert!(session.reset());

    assert_eq!(session.phase(), QuizPhase::InProgress);
    assert_eq!(session.current_index(), 0);
    assert!(session.answers().iter().all(Option::is_none));
    assert_eq!(session.score(), None);
    assert!(session.results_view().is_none());
    assert_eq!(session.current_question(), Some(&quiz[0]));
}

#[test]
fn reset_is_idempotent_and_ignored_mid_quiz() {
    let mut session = QuizSession::new(sample_quiz(3));
    session.select_answer(1);
    session.advance();

    assert!(!session.reset());
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.answers()[0], Some(1));

    session.advance();
    session.advance();
    assert!(session.reset());
    assert!(!session.reset());
    assert_eq!(session.current_index(), 0);
}

#[test]
fn results_are_unavailable_while_in_progress() {
    let session = QuizSession::new(sample_quiz(2));
    assert!(session.results_view().is_none());
    assert!(session.score().is_none());
}

#[test]
fn empty_quiz_completes_with_zero_of_zero() {
    let mut session = QuizSession::new(Vec::new());

    assert_eq!(session.current_question(), None);
    session.select_answer(0);

    let outcome = session.advance();
    assert_eq!(outcome, Advance::Completed(QuizScore { score: 0, total: 0 }));
    assert_eq!(session.results_view(), Some(Vec::new()));
    assert_eq!(session.score().unwrap().percentage(), 0.0);
}

#[test]
fn percentage_is_relative_to_total() {
    assert_eq!(QuizScore { score: 3, total: 4 }.percentage(), 75.0);
    assert_eq!(QuizScore { score: 0, total: 7 }.percentage(), 0.0);
}
