use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An author of session feedback.
///
/// Users carry no data of their own beyond identity. Their feedback is
/// reachable through `session_feedback.user_id`; a user does not own the
/// lifecycle of that feedback, so deleting a user leaves it in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Bumped whenever feedback is linked to this user.
    pub updated_at: DateTime<Utc>,
}

/// Response for `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// Response for `POST /users/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}
