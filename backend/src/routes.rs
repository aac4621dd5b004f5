// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{notifications, quiz, staff},
    state::AppState,
    utils::jwt::{auth_middleware, staff_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quiz, notifications, staff).
/// * Every route requires a valid bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/sessions", post(quiz::start_session))
        .route(
            "/sessions/{id}",
            get(quiz::get_session).delete(quiz::discard_session),
        )
        .route("/sessions/{id}/answer", post(quiz::select_answer))
        .route("/sessions/{id}/advance", post(quiz::advance))
        .route("/sessions/{id}/reset", post(quiz::reset))
        .route("/sessions/{id}/results", get(quiz::results))
        .route("/attempts", get(quiz::list_attempts));

    let notification_routes = Router::new()
        .route(
            "/",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route("/unread-count", get(notifications::unread_count))
        .route("/undo", post(notifications::undo_delete))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/unread-all", post(notifications::mark_all_unread))
        .route(
            "/{id}",
            axum::routing::delete(notifications::delete_notification),
        )
        .route(
            "/{id}/read",
            post(notifications::mark_read).delete(notifications::mark_unread),
        );

    // Staff check runs after authentication (layers apply outside in)
    let staff_routes = Router::new()
        .route("/notifications/{user_id}", post(staff::notify_user))
        .layer(middleware::from_fn(staff_middleware));

    let api = Router::new()
        .nest("/quiz", quiz_routes)
        .nest("/notifications", notification_routes)
        .nest("/staff", staff_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
