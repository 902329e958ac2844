use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's rating and comment for one session.
///
/// Feedback is immutable once created. At most one record exists per
/// `(session_id, user_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionFeedback {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    /// Between 1 and 5 inclusive.
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /sessions/feedback/create`.
///
/// Identifiers arrive as raw strings so that a missing, empty or malformed id
/// is reported the same way as any other invalid field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionFeedbackInput {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// A missing rating reads as 0, which fails validation.
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Query string of `GET /sessions/feedback`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuery {
    pub session_id: Option<String>,
    /// Left unparsed so the dispatcher can tell malformed from out-of-range.
    pub rating: Option<String>,
}

impl FeedbackQuery {
    /// Build from raw query pairs. A repeated key keeps its first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "sessionId" => &mut query.session_id,
                "rating" => &mut query.rating,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Response for `GET /sessions/feedback`. Always an array, possibly empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackListResponse {
    pub feedback: Vec<SessionFeedback>,
}

/// Response for a successful `POST /sessions/feedback/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionFeedbackResponse {
    pub success: bool,
    pub message: String,
    pub session_feedback: SessionFeedback,
}

/// Query string shared by the delete endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// Response for a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}
