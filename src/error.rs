use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing or unusable.
    #[error("{0}")]
    InvalidInput(String),

    /// A query parameter could not be parsed.
    #[error("{0}")]
    MalformedInput(String),

    #[error("Rating must be an integer from 1 through 5, got {0}")]
    InvalidRange(i64),

    #[error("Feedback for this session has already been submitted by this user")]
    DuplicateSubmission,

    /// Names the kind of record that was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::MalformedInput(_)
            | AppError::InvalidRange(_)
            | AppError::NotFound(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateSubmission => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable name, sent as `error` in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::MalformedInput(_) => "malformed_input",
            AppError::InvalidRange(_) => "invalid_range",
            AppError::DuplicateSubmission => "duplicate_submission",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store failures are logged in full; the client only sees a generic message.
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            other => {
                tracing::warn!(kind = other.kind(), "Rejected request: {}", other);
                other.to_string()
            }
        };

        let body = ErrorBody {
            success: false,
            error: self.kind().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
