// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        question::Question,
        quiz_attempt::{AnswerRequest, CreateSessionRequest, SessionCreatedResponse, SessionProgress},
    },
    state::QuizRegistry,
    utils::{
        extract::{ApiPath, ValidatedJson},
        jwt::Claims,
    },
};

/// Starts a quiz session for the caller.
///
/// The questions come from the hosting page (hand-authored or generated
/// upstream) and are validated here; the session itself trusts them.
pub async fn start_session(
    State(quizzes): State<Arc<QuizRegistry>>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<Question> = payload.questions.into_iter().map(Question::from).collect();
    let (session_id, total) = quizzes.start(&claims.sub, questions).await;

    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse { session_id, total }),
    ))
}

/// Current progress of a session.
pub async fn get_session(
    State(quizzes): State<Arc<QuizRegistry>>,
    Extension(claims): Extension<Claims>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let progress = quizzes
        .with_session(&claims.sub, session_id, |s| SessionProgress::of(session_id, s))
        .await?;

    Ok(Json(progress))
}

/// Records the answer to the current question without moving on.
pub async fn select_answer(
    State(quizzes): State<Arc<QuizRegistry>>,
    Extension(claims): Extension<Claims>,
    ApiPath(session_id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let progress = quizzes
        .with_session(&claims.sub, session_id, |s| {
            s.select_answer(req.option_index);
            SessionProgress::of(session_id, s)
        })
        .await?;

    Ok(Json(progress))
}

/// Moves to the next question, completing the quiz after the last one.
pub async fn advance(
    State(quizzes): State<Arc<QuizRegistry>>,
    Extension(claims): Extension<Claims>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = quizzes
        .with_session(&claims.sub, session_id, |s| s.advance())
        .await?;

    Ok(Json(outcome))
}

/// Starts a retake of a completed quiz.
pub async fn reset(
    State(quizzes): State<Arc<QuizRegistry>>,
    Extension(claims): Extension<Claims>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let progress = quizzes
        .with_session(&claims.sub, session_id, |s| {
            s.reset();
            SessionProgress::of(session_id, s)
        })
        .await?;

    Ok(Json(progress))
}

/// Per-question review. Only available once the quiz is completed.
pub async fn results(
    State(quizzes): State<Arc<QuizRegistry>>,
    Extension(claims): Extension<Claims>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (items, score) = quizzes
        .with_session(&claims.sub, session_id, |s| (s.results_view(), s.score()))
        .await?;

    let items = items.ok_or(AppError::Conflict("Quiz is not completed yet".to_string()))?;

    Ok(Json(serde_json::json!({
        "score": score,
        "percentage": score.map(|s| s.percentage()).unwrap_or(0.0),
        "results": items,
    })))
}

/// Discards a session.
pub async fn discard_session(
    State(quizzes): State<Arc<QuizRegistry>>,
    Extension(claims): Extension<Claims>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    quizzes.discard(&claims.sub, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The caller's completed attempts, most recent first.
pub async fn list_attempts(
    State(quizzes): State<Arc<QuizRegistry>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = quizzes.attempts(&claims.sub)?;
    Ok(Json(attempts))
}
