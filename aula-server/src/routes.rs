use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::{controllers, health_with_pool, ws, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|Extension(state): Extension<Arc<AppState>>| async move {
            health_with_pool(&state.pool).await
        }))
        .route("/api/register", post(controllers::register))
        .route("/api/login", post(controllers::login))
        .route("/api/messages/users", get(controllers::sidebar_users))
        .route("/api/messages/send/:id", post(controllers::send_message))
        .route("/api/messages/read/:id", put(controllers::mark_read))
        .route("/api/messages/edit/:id", put(controllers::edit_message))
        .route("/api/messages/delete/:id", delete(controllers::delete_message))
        .route("/api/messages/:id", get(controllers::conversation))
        .route(
            "/api/assignments",
            post(controllers::create_assignment).get(controllers::list_assignments),
        )
        .route("/api/assignments/:id", get(controllers::get_assignment))
        .route("/api/assignments/:id/submit", post(controllers::submit_assignment))
        .route(
            "/api/assignments/:id/submissions/:submission_id/grade",
            post(controllers::grade_submission),
        )
        .route("/ws", get(ws::ws_handler))
        .layer(Extension(state))
}
