use crate::error::AppResult;
use crate::models::{FeedbackListResponse, FeedbackQuery};

use super::{parse_rating, FeedbackSource};

/// A resolved feedback query. Building one validates the rating, so holding a
/// `FeedbackFilter` means the store may be queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackFilter {
    All,
    BySession(String),
    ByRating(i64),
    BySessionAndRating(String, i64),
}

impl FeedbackFilter {
    pub fn from_query(query: &FeedbackQuery) -> AppResult<Self> {
        let rating = query.rating.as_deref().map(parse_rating).transpose()?;

        Ok(match (query.session_id.clone(), rating) {
            (None, None) => Self::All,
            (Some(session_id), None) => Self::BySession(session_id),
            (None, Some(rating)) => Self::ByRating(rating),
            (Some(session_id), Some(rating)) => Self::BySessionAndRating(session_id, rating),
        })
    }

    /// Run the matching retrieval strategy. Result order is whatever the
    /// source returns.
    pub fn fetch<S: FeedbackSource + ?Sized>(&self, source: &S) -> AppResult<FeedbackListResponse> {
        let feedback = match self {
            Self::All => source.all_feedback()?,
            Self::BySession(session_id) => source.feedback_by_session(session_id)?,
            Self::ByRating(rating) => source.feedback_by_rating(*rating)?,
            Self::BySessionAndRating(session_id, rating) => {
                source.feedback_by_session_and_rating(session_id, *rating)?
            }
        };
        Ok(FeedbackListResponse { feedback })
    }
}

/// Serve a `GET /sessions/feedback` query.
///
/// A bad `rating` fails before `source` is touched.
pub fn find_feedback<S: FeedbackSource + ?Sized>(
    source: &S,
    query: &FeedbackQuery,
) -> AppResult<FeedbackListResponse> {
    let filter = FeedbackFilter::from_query(query)?;
    tracing::debug!(?filter, "Fetching session feedback");
    filter.fetch(source)
}
