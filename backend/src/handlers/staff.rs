// src/handlers/staff.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::AppError,
    handlers::notifications::sanitize,
    models::notification::CreateNotificationRequest,
    state::NotificationHub,
    utils::{
        extract::{ApiPath, ValidatedJson},
        jwt::Claims,
    },
};

const MAX_USER_ID_LEN: usize = 128;

/// Pushes a notification (e.g. a course announcement) into another user's log.
/// Admins and teachers only.
pub async fn notify_user(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
    ApiPath(user_id): ApiPath<String>,
    ValidatedJson(payload): ValidatedJson<CreateNotificationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if user_id.trim().is_empty() || user_id.len() > MAX_USER_ID_LEN {
        return Err(AppError::BadRequest(format!(
            "User id must be between 1 and {} chars",
            MAX_USER_ID_LEN
        )));
    }

    let new = sanitize(payload);
    let created = hub.with_store(&user_id, move |store| store.add(new)).await?;

    tracing::info!(
        "User {} ({}) sent notification {} to user {}",
        claims.sub,
        claims.role,
        created.id,
        user_id
    );

    Ok((StatusCode::CREATED, Json(created)))
}
