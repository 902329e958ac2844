//! Feedback querying and submission.
//!
//! The store is reached only through the traits below so that the dispatch
//! and submission logic can be exercised against fakes. [`crate::db::Database`]
//! is the production implementation of both.

mod filter;
mod rating;
mod submit;

pub use filter::*;
pub use rating::*;
pub use submit::*;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Session, SessionFeedback, User};

/// The four retrieval strategies behind `GET /sessions/feedback`, one per
/// filter combination.
pub trait FeedbackSource {
    fn all_feedback(&self) -> AppResult<Vec<SessionFeedback>>;

    fn feedback_by_session(&self, session_id: &str) -> AppResult<Vec<SessionFeedback>>;

    fn feedback_by_rating(&self, rating: i64) -> AppResult<Vec<SessionFeedback>>;

    fn feedback_by_session_and_rating(
        &self,
        session_id: &str,
        rating: i64,
    ) -> AppResult<Vec<SessionFeedback>>;
}

/// Store access available inside a submission unit of work.
pub trait FeedbackTx {
    fn feedback_exists(&self, session_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    fn find_session(&self, id: Uuid) -> AppResult<Option<Session>>;

    fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Must report a second record for the same (session, user) pair as
    /// [`crate::error::AppError::DuplicateSubmission`].
    fn insert_feedback(&self, feedback: &SessionFeedback) -> AppResult<()>;

    /// Record the new feedback against its parent session and user.
    fn link_feedback(
        &self,
        session: &Session,
        user: &User,
        feedback: &SessionFeedback,
    ) -> AppResult<()>;
}

/// A store that can run a submission atomically.
///
/// Implementations must serialize units of work against each other and
/// discard every write made by `work` when it returns an error.
pub trait FeedbackStore {
    fn unit_of_work<T, F>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(&dyn FeedbackTx) -> AppResult<T>;
}
