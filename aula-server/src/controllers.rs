use axum::{
    extract::{Extension, Path},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use aula_core::{
    now_timestamp, Assignment, CreateAssignmentRequest, DeleteMessageResponse, EditMessageRequest,
    GradeSubmissionRequest, LoginRequest, LoginResponse, Message, RegisterRequest,
    RegisterResponse, SendMessageRequest, SubmitAssignmentRequest, User,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::{error::ApiError, lifecycle, store, AppState};

fn hash_password(password: &str) -> String {
    // hash semplice della password
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Risolve il bearer token dell'header Authorization nell'identità
/// autenticata. Ogni handler protetto parte da qui: da lì in poi il core
/// lavora solo con identità già verificate.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
    store::users::find_by_token(&state.pool, token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid token".to_string()))
}

/// Handler per POST /api/register
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if req.full_name.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "fullName and password are required".to_string(),
        ));
    }

    // genera id utente e token
    let user = User {
        user_id: Uuid::new_v4().to_string(),
        full_name: req.full_name.clone(),
        profile_pic: req.profile_pic.clone(),
        created_at: now_timestamp(),
    };
    let token = Uuid::new_v4().to_string();
    store::users::insert_user(&state.pool, &user, &hash_password(&req.password), &token).await?;

    tracing::info!(user_id = %user.user_id, "registered new user");
    Ok((StatusCode::CREATED, Json(RegisterResponse { user, token })))
}

/// Handler per POST /api/login
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (user, stored_hash) = store::users::find_by_full_name(&state.pool, &req.full_name)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    // Calcolo hash sulla password fornita e confronto dell'hash preso dal db
    if hash_password(&req.password) != stored_hash {
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    // genera token nuovo e aggiorna
    let token = Uuid::new_v4().to_string();
    store::users::update_token(&state.pool, &user.user_id, &token).await?;
    Ok(Json(LoginResponse { token, user }))
}

/// Handler per GET /api/messages/users — tutti gli altri utenti (sidebar).
pub async fn sidebar_users(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    let me = require_user(&state, &headers).await?;
    let users = store::users::list_users_except(&state.pool, &me.user_id).await?;
    Ok(Json(users))
}

/// Handler per GET /api/messages/:id — conversazione con il peer,
/// in ordine di creazione.
pub async fn conversation(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(peer_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let me = require_user(&state, &headers).await?;
    let messages = store::messages::list_conversation(&state.pool, &me.user_id, &peer_id).await?;
    Ok(Json(messages))
}

/// Handler per POST /api/messages/send/:id
pub async fn send_message(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(receiver_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let me = require_user(&state, &headers).await?;
    let message = lifecycle::send_message(&state, &me, &receiver_id, req).await?;
    tracing::info!(message_id = %message.message_id, "message sent");
    Ok((StatusCode::CREATED, Json(message)))
}

/// Handler per PUT /api/messages/read/:id
pub async fn mark_read(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(message_id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    require_user(&state, &headers).await?;
    let message = lifecycle::mark_read(&state, &message_id).await?;
    Ok(Json(message))
}

/// Handler per PUT /api/messages/edit/:id
pub async fn edit_message(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(message_id): Path<String>,
    Json(req): Json<EditMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    require_user(&state, &headers).await?;
    let message = lifecycle::edit_message(&state, &message_id, req).await?;
    Ok(Json(message))
}

/// Handler per DELETE /api/messages/delete/:id
pub async fn delete_message(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(message_id): Path<String>,
) -> Result<Json<DeleteMessageResponse>, ApiError> {
    require_user(&state, &headers).await?;
    lifecycle::delete_message(&state, &message_id).await?;
    Ok(Json(DeleteMessageResponse {
        message: "Message deleted successfully".to_string(),
    }))
}

/// Handler per POST /api/assignments
pub async fn create_assignment(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    let me = require_user(&state, &headers).await?;
    let assignment = lifecycle::create_assignment(&state, &me, req).await?;
    tracing::info!(assignment_id = %assignment.assignment_id, "assignment created");
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Handler per GET /api/assignments — creati da o assegnati al chiamante.
pub async fn list_assignments(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let me = require_user(&state, &headers).await?;
    let assignments = store::assignments::list_for_user(&state.pool, &me.user_id).await?;
    Ok(Json(assignments))
}

/// Handler per GET /api/assignments/:id
pub async fn get_assignment(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(assignment_id): Path<String>,
) -> Result<Json<Assignment>, ApiError> {
    require_user(&state, &headers).await?;
    let assignment = store::assignments::get_assignment(&state.pool, &assignment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("assignment {} not found", assignment_id)))?;
    Ok(Json(assignment))
}

/// Handler per POST /api/assignments/:id/submit
pub async fn submit_assignment(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(assignment_id): Path<String>,
    Json(req): Json<SubmitAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    let me = require_user(&state, &headers).await?;
    let assignment = lifecycle::submit_assignment(&state, &me, &assignment_id, req).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Handler per POST /api/assignments/:id/submissions/:submission_id/grade
pub async fn grade_submission(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path((assignment_id, submission_id)): Path<(String, String)>,
    Json(req): Json<GradeSubmissionRequest>,
) -> Result<Json<Assignment>, ApiError> {
    let me = require_user(&state, &headers).await?;
    let assignment =
        lifecycle::grade_submission(&state, &me, &assignment_id, &submission_id, req).await?;
    Ok(Json(assignment))
}
