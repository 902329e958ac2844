use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::feedback::{find_feedback, submit_feedback};
use crate::models::*;

// ============================================================
// Health
// ============================================================

pub async fn ping(State(db): State<Database>) -> AppResult<Json<Counter>> {
    Ok(Json(db.record_visit()?))
}

// ============================================================
// Users
// ============================================================

pub async fn list_users(State(db): State<Database>) -> AppResult<Json<UsersResponse>> {
    let users = db.get_all_users()?;
    Ok(Json(UsersResponse { users }))
}

pub async fn create_user(State(db): State<Database>) -> AppResult<Json<UserResponse>> {
    let user = db.create_user()?;
    tracing::info!(user_id = %user.id, "Created user");
    Ok(Json(UserResponse { user }))
}

pub async fn delete_user(
    State(db): State<Database>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Query(query) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let id = target_id(&query, "User")?;
    if !db.delete_user(id)? {
        return Err(AppError::NotFound("User"));
    }
    Ok(deleted("User"))
}

// ============================================================
// Sessions
// ============================================================

pub async fn list_sessions(State(db): State<Database>) -> AppResult<Json<SessionsResponse>> {
    let sessions = db.get_all_sessions()?;
    Ok(Json(SessionsResponse { sessions }))
}

pub async fn create_session(State(db): State<Database>) -> AppResult<Json<SessionResponse>> {
    let session = db.create_session()?;
    tracing::info!(session_id = %session.id, "Created session");
    Ok(Json(SessionResponse { session }))
}

pub async fn delete_session(
    State(db): State<Database>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Query(query) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let id = target_id(&query, "Session")?;
    if !db.delete_session(id)? {
        return Err(AppError::NotFound("Session"));
    }
    Ok(deleted("Session"))
}

// ============================================================
// Session feedback
// ============================================================

/// `GET /sessions/feedback`, optionally filtered by `sessionId` and/or `rating`.
pub async fn list_feedback(
    State(db): State<Database>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<FeedbackListResponse>> {
    let Query(pairs) = query.map_err(|e| AppError::MalformedInput(e.body_text()))?;
    find_feedback(&db, &FeedbackQuery::from_pairs(pairs)).map(Json)
}

pub async fn create_feedback(
    State(db): State<Database>,
    payload: Result<Json<CreateSessionFeedbackInput>, JsonRejection>,
) -> AppResult<Json<CreateSessionFeedbackResponse>> {
    let Json(input) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let session_feedback = submit_feedback(&db, input)?;

    Ok(Json(CreateSessionFeedbackResponse {
        success: true,
        message: "Session feedback created".to_string(),
        session_feedback,
    }))
}

pub async fn delete_feedback(
    State(db): State<Database>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> AppResult<Json<DeleteResponse>> {
    let Query(query) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let id = target_id(&query, "Session feedback")?;
    if !db.delete_feedback(id)? {
        return Err(AppError::NotFound("Session feedback"));
    }
    Ok(deleted("Session feedback"))
}

// ============================================================
// Helpers
// ============================================================

/// The `id` a delete targets. An id that cannot be parsed cannot name a
/// stored record, so it is reported as not found.
fn target_id(query: &DeleteQuery, kind: &'static str) -> AppResult<Uuid> {
    let raw = query
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidInput("id is required".to_string()))?;
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(kind))
}

fn deleted(kind: &str) -> Json<DeleteResponse> {
    tracing::info!("{} deleted", kind);
    Json(DeleteResponse {
        success: true,
        message: format!("{} deleted", kind),
    })
}
