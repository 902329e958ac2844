use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreateSessionFeedbackInput, SessionFeedback};

use super::{is_valid_rating, FeedbackStore};

/// A structurally valid submission, ready to be checked against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub rating: i64,
    pub comment: Option<String>,
}

impl NewFeedback {
    /// Check everything that can be checked without the store.
    pub fn validate(input: CreateSessionFeedbackInput) -> AppResult<Self> {
        let session_id = required_id("sessionId", input.session_id.as_deref())?;
        let user_id = required_id("userId", input.user_id.as_deref())?;

        if !is_valid_rating(input.rating) {
            return Err(AppError::InvalidInput(format!(
                "Rating must be an integer from 1 through 5, got {}",
                input.rating
            )));
        }

        Ok(Self {
            session_id,
            user_id,
            rating: input.rating,
            comment: input.comment,
        })
    }
}

fn required_id(field: &str, raw: Option<&str>) -> AppResult<Uuid> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(AppError::InvalidInput(format!("{} is required", field))),
    };

    let id = Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidInput(format!("{} is not a valid identifier", field)))?;

    if id.is_nil() {
        return Err(AppError::InvalidInput(format!("{} must not be nil", field)));
    }
    Ok(id)
}

/// Create a feedback record, allowing at most one per (session, user).
///
/// Validation happens before the store is touched. The duplicate check,
/// session and user lookups, insert and linking then run as a single unit of
/// work, so either all of them take effect or none do.
pub fn submit_feedback<S: FeedbackStore + ?Sized>(
    store: &S,
    input: CreateSessionFeedbackInput,
) -> AppResult<SessionFeedback> {
    let draft = NewFeedback::validate(input)?;

    let feedback = store.unit_of_work(|tx| {
        if tx.feedback_exists(draft.session_id, draft.user_id)? {
            return Err(AppError::DuplicateSubmission);
        }

        let session = tx
            .find_session(draft.session_id)?
            .ok_or(AppError::NotFound("Session"))?;
        let user = tx
            .find_user(draft.user_id)?
            .ok_or(AppError::NotFound("User"))?;

        let feedback = SessionFeedback {
            id: Uuid::new_v4(),
            session_id: session.id,
            user_id: user.id,
            rating: draft.rating,
            comment: draft.comment.clone(),
            created_at: Utc::now(),
        };

        tx.insert_feedback(&feedback)?;
        tx.link_feedback(&session, &user, &feedback)?;
        Ok(feedback)
    })?;

    tracing::info!(
        feedback_id = %feedback.id,
        session_id = %feedback.session_id,
        user_id = %feedback.user_id,
        rating = feedback.rating,
        "Created session feedback"
    );
    Ok(feedback)
}
