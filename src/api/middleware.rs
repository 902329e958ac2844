//! Request logging middleware.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Level;

/// How a finished request is reported, chosen from its status code.
pub fn classify(status: StatusCode) -> (Level, &'static str) {
    match status {
        StatusCode::OK | StatusCode::ACCEPTED => (Level::INFO, "Handled request successfully"),
        StatusCode::NOT_FOUND => (Level::INFO, "Unhandled route"),
        StatusCode::BAD_REQUEST => (Level::INFO, "Bad request from client"),
        StatusCode::INTERNAL_SERVER_ERROR => (Level::ERROR, "Internal server error"),
        _ => (Level::WARN, "Encountered unexpected status"),
    }
}

/// Log latency, status, method and route of every request.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let route = request.uri().to_string();

    let response = next.run(request).await;

    let latency = started.elapsed();
    let status = response.status();
    let (level, message) = classify(status);

    match level {
        Level::ERROR => {
            tracing::error!(?latency, status = status.as_u16(), %method, %route, "{}", message)
        }
        Level::WARN => {
            tracing::warn!(?latency, status = status.as_u16(), %method, %route, "{}", message)
        }
        _ => {
            tracing::info!(?latency, status = status.as_u16(), %method, %route, "{}", message)
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_info() {
        assert_eq!(
            classify(StatusCode::OK),
            (Level::INFO, "Handled request successfully")
        );
        assert_eq!(classify(StatusCode::ACCEPTED).0, Level::INFO);
    }

    #[test]
    fn client_errors_are_info() {
        assert_eq!(
            classify(StatusCode::BAD_REQUEST),
            (Level::INFO, "Bad request from client")
        );
        assert_eq!(classify(StatusCode::NOT_FOUND), (Level::INFO, "Unhandled route"));
    }

    #[test]
    fn server_errors_are_error() {
        assert_eq!(
            classify(StatusCode::INTERNAL_SERVER_ERROR),
            (Level::ERROR, "Internal server error")
        );
    }

    #[test]
    fn anything_else_is_a_warning() {
        assert_eq!(
            classify(StatusCode::FORBIDDEN),
            (Level::WARN, "Encountered unexpected status")
        );
        assert_eq!(classify(StatusCode::CREATED).0, Level::WARN);
    }
}
