// src/handlers/notifications.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::AppError,
    models::notification::{CreateNotificationRequest, NewNotification},
    state::NotificationHub,
    utils::{
        extract::{ApiPath, ValidatedJson},
        html::clean_html,
        jwt::Claims,
    },
};

/// Turns a validated request into store input, sanitizing the free text.
pub(crate) fn sanitize(payload: CreateNotificationRequest) -> NewNotification {
    NewNotification {
        title: clean_html(&payload.title),
        description: clean_html(&payload.description),
        category: payload.category,
        link: payload.link,
    }
}

/// List the caller's notifications (most recent first).
pub async fn list_notifications(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let notifications = hub.with_store(&claims.sub, |store| store.list()).await?;
    Ok(Json(notifications))
}

/// Add a notification to the caller's log.
pub async fn create_notification(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CreateNotificationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = sanitize(payload);
    let created = hub.with_store(&claims.sub, move |store| store.add(new)).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn unread_count(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let unread = hub.with_store(&claims.sub, |store| store.unread_count()).await?;
    Ok(Json(serde_json::json!({ "unread": unread })))
}

/// Delete a notification. It can be brought back with `undo_delete`.
/// Unknown ids are accepted silently.
pub async fn delete_notification(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    hub.with_store(&claims.sub, move |store| store.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Restore the most recently deleted notification.
pub async fn undo_delete(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let restored = hub
        .with_store(&claims.sub, |store| store.undo_last_deletion())
        .await?
        .ok_or(AppError::NotFound("Nothing to undo".to_string()))?;

    Ok(Json(restored))
}

pub async fn mark_read(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    hub.with_store(&claims.sub, move |store| store.mark_read(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_unread(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    hub.with_store(&claims.sub, move |store| store.mark_unread(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    hub.with_store(&claims.sub, |store| store.mark_all_read()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_unread(
    State(hub): State<Arc<NotificationHub>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    hub.with_store(&claims.sub, |store| store.mark_all_unread()).await?;
    Ok(StatusCode::NO_CONTENT)
}
