use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A game session that feedback can be left on.
///
/// Like [`super::User`], a session only back-references its feedback. Removing
/// a session does not remove the feedback written about it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Bumped whenever feedback is linked to this session.
    pub updated_at: DateTime<Utc>,
}

/// Response for `GET /sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<Session>,
}

/// Response for `POST /sessions/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
}
