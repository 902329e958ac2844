use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use session_feedback::api::create_router;
use session_feedback::db::Database;
use session_feedback::error::ErrorBody;
use session_feedback::models::*;

fn setup() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(db);
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_user(server: &TestServer) -> User {
    server.post("/users/create").await.json::<UserResponse>().user
}

async fn create_session(server: &TestServer) -> Session {
    server
        .post("/sessions/create")
        .await
        .json::<SessionResponse>()
        .session
}

async fn submit(
    server: &TestServer,
    session: &Session,
    user: &User,
    rating: i64,
) -> axum_test::TestResponse {
    server
        .post("/sessions/feedback/create")
        .json(&json!({
            "sessionId": session.id,
            "userId": user.id,
            "rating": rating,
        }))
        .await
}

mod ping {
    use super::*;

    #[tokio::test]
    async fn counts_visits() {
        let server = setup();

        let first: Counter = server.get("/ping").await.json();
        let second: Counter = server.get("/ping").await.json();

        assert_eq!(first.visit, 1);
        assert_eq!(second.visit, 2);
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn returns_empty_list_when_no_users_exist() {
        let server = setup();

        let response = server.get("/users").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "users": [] }));
    }

    #[tokio::test]
    async fn creates_a_user_with_a_fresh_id() {
        let server = setup();

        let response = server.post("/users/create").await;

        response.assert_status_ok();
        let user = response.json::<UserResponse>().user;
        assert!(!user.id.is_nil());

        let listed: UsersResponse = server.get("/users").await.json();
        assert_eq!(listed.users.len(), 1);
        assert_eq!(listed.users[0].id, user.id);
    }

    #[tokio::test]
    async fn deletes_a_user() {
        let server = setup();
        let user = create_user(&server).await;

        let response = server
            .delete("/users")
            .add_query_param("id", user.id)
            .await;

        response.assert_status_ok();
        let body: DeleteResponse = response.json();
        assert!(body.success);

        let listed: UsersResponse = server.get("/users").await.json();
        assert!(listed.users.is_empty());
    }

    #[tokio::test]
    async fn deleting_an_unknown_user_is_a_bad_request() {
        let server = setup();

        let response = server
            .delete("/users")
            .add_query_param("id", uuid::Uuid::new_v4())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorBody = response.json();
        assert!(!body.success);
        assert_eq!(body.error, "not_found");
    }

    #[tokio::test]
    async fn delete_without_an_id_is_a_bad_request() {
        let server = setup();

        let response = server.delete("/users").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "invalid_input");
    }

    #[tokio::test]
    async fn delete_with_a_repeated_id_is_a_json_bad_request() {
        let server = setup();

        let response = server.delete("/users?id=a&id=b").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorBody = response.json();
        assert!(!body.success);
        assert_eq!(body.error, "invalid_input");
    }
}

mod sessions {
    use super::*;

    #[tokio::test]
    async fn returns_empty_list_when_no_sessions_exist() {
        let server = setup();

        let response = server.get("/sessions").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "sessions": [] }));
    }

    #[tokio::test]
    async fn creates_a_session_with_a_fresh_id() {
        let server = setup();

        let session = create_session(&server).await;

        assert!(!session.id.is_nil());
    }

    #[tokio::test]
    async fn deletes_a_session_but_keeps_its_feedback() {
        let server = setup();
        let session = create_session(&server).await;
        let user = create_user(&server).await;
        submit(&server, &session, &user, 3).await.assert_status_ok();

        server
            .delete("/sessions")
            .add_query_param("id", session.id)
            .await
            .assert_status_ok();

        let feedback: FeedbackListResponse = server.get("/sessions/feedback").await.json();
        assert_eq!(feedback.feedback.len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_malformed_id_is_not_found() {
        let server = setup();

        let response = server
            .delete("/sessions")
            .add_query_param("id", "not-a-uuid")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "not_found");
    }
}

mod feedback_list {
    use super::*;

    #[tokio::test]
    async fn returns_an_empty_array_when_no_feedback_exists() {
        let server = setup();

        let response = server.get("/sessions/feedback").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "feedback": [] }));
    }

    #[tokio::test]
    async fn filters_by_session_rating_and_both() {
        let server = setup();
        let s1 = create_session(&server).await;
        let s2 = create_session(&server).await;
        let u1 = create_user(&server).await;
        let u2 = create_user(&server).await;
        submit(&server, &s1, &u1, 3).await.assert_status_ok();
        submit(&server, &s1, &u2, 5).await.assert_status_ok();
        submit(&server, &s2, &u1, 3).await.assert_status_ok();

        let all: FeedbackListResponse = server.get("/sessions/feedback").await.json();
        assert_eq!(all.feedback.len(), 3);

        let by_session: FeedbackListResponse = server
            .get("/sessions/feedback")
            .add_query_param("sessionId", s1.id)
            .await
            .json();
        assert_eq!(by_session.feedback.len(), 2);
        assert!(by_session.feedback.iter().all(|f| f.session_id == s1.id));

        let by_rating: FeedbackListResponse = server
            .get("/sessions/feedback")
            .add_query_param("rating", 3)
            .await
            .json();
        assert_eq!(by_rating.feedback.len(), 2);
        assert!(by_rating.feedback.iter().all(|f| f.rating == 3));

        let both: FeedbackListResponse = server
            .get("/sessions/feedback")
            .add_query_param("sessionId", s2.id)
            .add_query_param("rating", 3)
            .await
            .json();
        assert_eq!(both.feedback.len(), 1);
        assert_eq!(both.feedback[0].session_id, s2.id);
        assert_eq!(both.feedback[0].user_id, u1.id);
    }

    #[tokio::test]
    async fn a_repeated_session_id_uses_the_first_value() {
        let server = setup();

        let response = server
            .get("/sessions/feedback")
            .add_query_param("sessionId", "x")
            .add_query_param("sessionId", "y")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "feedback": [] }));
    }

    #[tokio::test]
    async fn a_repeated_rating_uses_the_first_value() {
        let server = setup();
        let session = create_session(&server).await;
        let u1 = create_user(&server).await;
        let u2 = create_user(&server).await;
        submit(&server, &session, &u1, 3).await.assert_status_ok();
        submit(&server, &session, &u2, 4).await.assert_status_ok();

        let response = server
            .get("/sessions/feedback")
            .add_query_param("rating", 3)
            .add_query_param("rating", 4)
            .await;

        response.assert_status_ok();
        let listed: FeedbackListResponse = response.json();
        assert_eq!(listed.feedback.len(), 1);
        assert_eq!(listed.feedback[0].rating, 3);
        assert_eq!(listed.feedback[0].user_id, u1.id);
    }

    #[tokio::test]
    async fn rejects_a_non_numeric_rating() {
        let server = setup();

        let response = server
            .get("/sessions/feedback")
            .add_query_param("rating", "abc")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "malformed_input");
    }

    #[tokio::test]
    async fn rejects_an_out_of_range_rating() {
        let server = setup();

        let response = server
            .get("/sessions/feedback")
            .add_query_param("sessionId", uuid::Uuid::new_v4())
            .add_query_param("rating", 9)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "invalid_range");
        assert_eq!(body.message, "Rating must be an integer from 1 through 5, got 9");
    }
}

mod feedback_create {
    use super::*;

    #[tokio::test]
    async fn end_to_end_submission_and_duplicate() {
        let server = setup();
        let session = create_session(&server).await;
        let user = create_user(&server).await;

        let response = server
            .post("/sessions/feedback/create")
            .json(&json!({
                "sessionId": session.id,
                "userId": user.id,
                "rating": 4,
                "comment": "fun",
            }))
            .await;

        response.assert_status_ok();
        let created: CreateSessionFeedbackResponse = response.json();
        assert!(created.success);
        assert!(!created.session_feedback.id.is_nil());
        assert_eq!(created.session_feedback.user_id, user.id);
        assert_eq!(created.session_feedback.session_id, session.id);
        assert_eq!(created.session_feedback.comment.as_deref(), Some("fun"));

        let listed: FeedbackListResponse = server
            .get("/sessions/feedback")
            .add_query_param("sessionId", session.id)
            .await
            .json();
        assert_eq!(listed.feedback, vec![created.session_feedback.clone()]);

        let duplicate = submit(&server, &session, &user, 2).await;
        duplicate.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(duplicate.json::<ErrorBody>().error, "duplicate_submission");

        let listed: FeedbackListResponse = server.get("/sessions/feedback").await.json();
        assert_eq!(listed.feedback.len(), 1);
    }

    #[tokio::test]
    async fn rejects_an_out_of_range_rating() {
        let server = setup();
        let session = create_session(&server).await;
        let user = create_user(&server).await;

        let response = submit(&server, &session, &user, 0).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "invalid_input");

        let listed: FeedbackListResponse = server.get("/sessions/feedback").await.json();
        assert!(listed.feedback.is_empty());
    }

    #[tokio::test]
    async fn rejects_a_missing_user_id() {
        let server = setup();
        let session = create_session(&server).await;

        let response = server
            .post("/sessions/feedback/create")
            .json(&json!({ "sessionId": session.id, "rating": 3 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "invalid_input");
    }

    #[tokio::test]
    async fn rejects_a_body_that_is_not_json() {
        let server = setup();

        let response = server
            .post("/sessions/feedback/create")
            .text("rating=3")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "invalid_input");
    }

    #[tokio::test]
    async fn unknown_session_is_a_bad_request() {
        let server = setup();
        let user = create_user(&server).await;
        let ghost = Session {
            id: uuid::Uuid::new_v4(),
            ..create_session(&server).await
        };

        let response = submit(&server, &ghost, &user, 3).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "not_found");
        assert_eq!(body.message, "Session not found");
    }
}

mod feedback_delete {
    use super::*;

    #[tokio::test]
    async fn deletes_feedback_by_id() {
        let server = setup();
        let session = create_session(&server).await;
        let user = create_user(&server).await;
        let created: CreateSessionFeedbackResponse = submit(&server, &session, &user, 5).await.json();

        let response = server
            .delete("/sessions/feedback")
            .add_query_param("id", created.session_feedback.id)
            .await;

        response.assert_status_ok();
        let body: DeleteResponse = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Session feedback deleted");

        let listed: FeedbackListResponse = server.get("/sessions/feedback").await.json();
        assert!(listed.feedback.is_empty());
    }

    #[tokio::test]
    async fn unknown_feedback_is_a_bad_request() {
        let server = setup();

        let response = server
            .delete("/sessions/feedback")
            .add_query_param("id", uuid::Uuid::new_v4())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorBody>().error, "not_found");
    }
}
