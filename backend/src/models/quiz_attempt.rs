// src/models/quiz_attempt.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    question::{PublicQuestion, QuestionInput},
    quiz_session::{QuizPhase, QuizScore, QuizSession},
};

/// A finished pass, as kept in a student's attempt history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub session_id: Uuid,
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl QuizAttempt {
    pub fn record(session_id: Uuid, result: QuizScore) -> Self {
        Self {
            session_id,
            score: result.score,
            total: result.total,
            percentage: result.percentage(),
            completed_at: chrono::Utc::now(),
        }
    }
}

/// DTO for starting a quiz session.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(max = 200, message = "A quiz can hold at most 200 questions"), nested)]
    pub questions: Vec<QuestionInput>,
}

/// DTO for answering the current question.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub option_index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub total: usize,
}

/// Snapshot of a session for the hosting page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub session_id: Uuid,
    pub phase: QuizPhase,
    pub current_index: usize,
    /// Present while the pass is running; the answer key is never included.
    pub current_question: Option<PublicQuestion>,
    /// Option picked for the current question, if any.
    pub selected_option: Option<usize>,
    pub answered_count: usize,
    pub total: usize,
    pub score: Option<QuizScore>,
}

impl SessionProgress {
    pub fn of(session_id: Uuid, session: &QuizSession) -> Self {
        let selected_option = match session.phase() {
            QuizPhase::InProgress => session
                .answers()
                .get(session.current_index())
                .copied()
                .flatten(),
            QuizPhase::Completed => None,
        };

        Self {
            session_id,
            phase: session.phase(),
            current_index: session.current_index(),
            current_question: session.current_question().map(PublicQuestion::from),
            selected_option,
            answered_count: session.answered_count(),
            total: session.total(),
            score: session.score(),
        }
    }
}
