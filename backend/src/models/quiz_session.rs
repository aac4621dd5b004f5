// src/models/quiz_session.rs

use std::fmt;

use serde::Serialize;

use crate::models::question::Question;

/// Lifecycle phase of a quiz pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizPhase {
    InProgress,
    Completed,
}

/// Final tally of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizScore {
    pub score: usize,
    pub total: usize,
}

impl QuizScore {
    /// Score as a percentage in `[0, 100]`. An empty quiz scores 0.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 * 100.0 / self.total as f64
    }
}

/// Outcome of [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Advance {
    /// Moved on to the question at `current_index`.
    Moved { current_index: usize },
    /// The last question was passed; the pass is now scored.
    Completed(QuizScore),
    /// The pass had already been completed; nothing happened.
    AlreadyCompleted,
}

/// One row of the post-quiz review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub question: String,
    /// `None` when the question was skipped.
    pub chosen_index: Option<usize>,
    pub chosen_option: Option<String>,
    pub correct: bool,
    pub correct_answer_index: usize,
    pub correct_option: String,
}

/// Receives the `(score, total)` of a finished pass.
pub type CompletionListener = Box<dyn FnMut(QuizScore) + Send>;

/// Drives one student through an ordered list of questions.
///
/// The session only moves forward. `select_answer` records an answer for the
/// current question, `advance` moves on (skipping is allowed) and completes the
/// pass after the last question. `reset` starts a new pass from a completed one.
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<Option<usize>>,
    phase: QuizPhase,
    score: Option<QuizScore>,
    listener: Option<CompletionListener>,
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("total", &self.questions.len())
            .field("current_index", &self.current_index)
            .field("answers", &self.answers)
            .field("phase", &self.phase)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            questions,
            current_index: 0,
            answers,
            phase: QuizPhase::InProgress,
            score: None,
            listener: None,
        }
    }

    /// Creates a session whose completions are reported to `listener`.
    pub fn with_listener<F>(questions: Vec<Question>, listener: F) -> Self
    where
        F: FnMut(QuizScore) + Send + 'static,
    {
        let mut session = Self::new(questions);
        session.listener = Some(Box::new(listener));
        session
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// The question being shown, while the pass is running.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::InProgress => self.questions.get(self.current_index),
            QuizPhase::Completed => None,
        }
    }

    /// Score of the completed pass.
    pub fn score(&self) -> Option<QuizScore> {
        self.score
    }

    /// Records (or overwrites) the answer to the current question.
    ///
    /// `option_index` must be a valid option index. Out-of-range indices and
    /// calls on a completed pass are ignored.
    pub fn select_answer(&mut self, option_index: usize) {
        if self.phase != QuizPhase::InProgress {
            tracing::debug!("select_answer ignored: quiz already completed");
            return;
        }
        let Some(question) = self.questions.get(self.current_index) else {
            tracing::debug!("select_answer ignored: quiz has no questions");
            return;
        };
        if option_index >= question.options.len() {
            tracing::debug!(
                option_index,
                options = question.options.len(),
                "select_answer ignored: option index out of range"
            );
            return;
        }
        self.answers[self.current_index] = Some(option_index);
    }

    /// Moves to the next question, or completes the pass from the last one.
    ///
    /// Completion scores the pass and notifies the listener exactly once.
    pub fn advance(&mut self) -> Advance {
        if self.phase == QuizPhase::Completed {
            return Advance::AlreadyCompleted;
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            return Advance::Moved {
                current_index: self.current_index,
            };
        }

        let score = self.tally();
        self.phase = QuizPhase::Completed;
        self.score = Some(score);
        tracing::debug!(score = score.score, total = score.total, "quiz completed");

        if let Some(listener) = self.listener.as_mut() {
            listener(score);
        }

        Advance::Completed(score)
    }

    /// Starts a fresh pass (retake). Only acts on a completed pass; returns
    /// whether anything changed.
    pub fn reset(&mut self) -> bool {
        if self.phase != QuizPhase::Completed {
            return false;
        }
        self.answers.iter_mut().for_each(|a| *a = None);
        self.current_index = 0;
        self.phase = QuizPhase::InProgress;
        self.score = None;
        true
    }

    /// Per-question review of a completed pass. `None` while still in progress.
    pub fn results_view(&self) -> Option<Vec<ResultItem>> {
        if self.phase != QuizPhase::Completed {
            return None;
        }

        let items = self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(q, answer)| ResultItem {
                question: q.question.clone(),
                chosen_index: *answer,
                chosen_option: answer.and_then(|i| q.options.get(i).cloned()),
                correct: *answer == Some(q.correct_answer_index),
                correct_answer_index: q.correct_answer_index,
                correct_option: q.correct_option().unwrap_or_default().to_string(),
            })
            .collect();

        Some(items)
    }

    fn tally(&self) -> QuizScore {
        let score = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, answer)| **answer == Some(q.correct_answer_index))
            .count();

        QuizScore {
            score,
            total: self.questions.len(),
        }
    }
}
