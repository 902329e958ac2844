mod handlers;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        // Users
        .route("/users", get(handlers::list_users).delete(handlers::delete_user))
        .route("/users/create", post(handlers::create_user))
        // Sessions
        .route(
            "/sessions",
            get(handlers::list_sessions).delete(handlers::delete_session),
        )
        .route("/sessions/create", post(handlers::create_session))
        // Session feedback
        .route(
            "/sessions/feedback",
            get(handlers::list_feedback).delete(handlers::delete_feedback),
        )
        .route("/sessions/feedback/create", post(handlers::create_feedback))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}
