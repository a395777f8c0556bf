pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::evaluation::handlers as evaluation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document parsing
        .route("/api/v1/documents/:id", get(documents::handle_get_document))
        .route(
            "/api/v1/documents/:id/process",
            post(documents::handle_process_document),
        )
        // Job matching
        .route("/api/v1/job-match", post(evaluation::handle_job_match))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::documents::lifecycle::ParsingState;
    use crate::testing::{test_state, MemoryDocumentStore};
    use std::sync::Arc;

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let store = Arc::new(MemoryDocumentStore::default());
        let (status, body) = send(test_state(store), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-api");
        assert_eq!(body["extraction_strategy"], "pattern");
        assert_eq!(body["job_matcher"], "keyword");
    }

    #[tokio::test]
    async fn test_job_match_rejects_empty_job_description() {
        let store = Arc::new(MemoryDocumentStore::default());
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/job-match")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "user_id": Uuid::new_v4(),
                    "job_description": "  ",
                    "resume_skills": ["Python"]
                })
                .to_string(),
            ))
            .unwrap();

        let (status, body) = send(test_state(store), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_document_reports_status() {
        let store = Arc::new(MemoryDocumentStore::default());
        let id = store.insert_document(ParsingState::NotStarted);

        let (status, body) = send(test_state(store), get(&format!("/api/v1/documents/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "NOT_STARTED");
        assert!(body.get("content").is_none());
    }

    #[tokio::test]
    async fn test_unknown_document_is_404() {
        let store = Arc::new(MemoryDocumentStore::default());
        let uri = format!("/api/v1/documents/{}", Uuid::new_v4());
        let (status, body) = send(test_state(store.clone()), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let request = Request::builder()
            .method("POST")
            .uri(format!("{uri}/process"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(test_state(store), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_document_id_is_rejected() {
        let store = Arc::new(MemoryDocumentStore::default());
        let (status, _) = send(test_state(store), get("/api/v1/documents/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
