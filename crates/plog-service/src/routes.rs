//! Route configuration for the logging API.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use plog_proto::wire::{CLEAR_ROUTE, HEALTH_ROUTE, READ_ROUTE, SAVE_ROUTE};
use tower_http::trace::TraceLayer;

use crate::controller::LoggingController;
use crate::handlers::{clear_messages, health_check, read_messages, save_messages};

/// Create the logging API router.
pub fn create_router(controller: Arc<LoggingController>) -> Router {
    Router::new()
        .route(SAVE_ROUTE, post(save_messages))
        .route(READ_ROUTE, post(read_messages))
        .route(CLEAR_ROUTE, post(clear_messages))
        .route(HEALTH_ROUTE, get(health_check))
        .with_state(controller)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use plog_proto::wire::CORRELATION_ID_HEADER;
    use plog_proto::{DataPage, ErrorBody, LogMessage};
    use plog_store::{MemoryPersistence, Persistence};
    use tower::ServiceExt;

    fn make_test_router() -> (Router, Arc<MemoryPersistence>) {
        let store = Arc::new(MemoryPersistence::default());
        let controller = Arc::new(LoggingController::new(store.clone()));
        (create_router(controller), store)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = make_test_router();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["stored"], 0);
    }

    #[tokio::test]
    async fn test_save_endpoint() {
        let (app, store) = make_test_router();

        let request = Request::builder()
            .method("POST")
            .uri(SAVE_ROUTE)
            .header(CORRELATION_ID_HEADER, "req-1")
            .body(Body::from(
                r#"[{"level":"Error","message":"boom","error":{"type":"Io","message":"disk"}},
                    {"level":"Info","message":"fine","time":"2024-01-01T00:00:00Z"}]"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.len(), 2);
        assert!(store.records().iter().all(|r| r.message.time.is_some()));
    }

    #[tokio::test]
    async fn test_save_malformed_body() {
        let (app, store) = make_test_router();

        let response = app
            .oneshot(post_json(SAVE_ROUTE, r#"[{"level":"Loud","message":"x"}]"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = json_body(response).await;
        assert_eq!(body.error, "serialization");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_read_endpoint_with_filter_and_count() {
        let (app, store) = make_test_router();
        store
            .save(vec![
                LogMessage::new(plog_proto::LogLevel::Error, "a").with_source("api"),
                LogMessage::new(plog_proto::LogLevel::Info, "b").with_source("api"),
                LogMessage::new(plog_proto::LogLevel::Error, "c").with_source("db"),
            ])
            .unwrap();

        let response = app
            .oneshot(post_json(
                READ_ROUTE,
                r#"{"source":"api","max_level":"Error","take":5,"count":true}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page: DataPage<LogMessage> = json_body(response).await;
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].message, "a");
        assert_eq!(page.total, Some(1));
    }

    #[tokio::test]
    async fn test_read_empty_body_uses_defaults() {
        let (app, _) = make_test_router();

        let response = app.oneshot(post_json(READ_ROUTE, "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = json_body(response).await;
        assert_eq!(json, serde_json::json!({"data": []}));
    }

    #[tokio::test]
    async fn test_read_negative_skip() {
        let (app, _) = make_test_router();

        let response = app
            .oneshot(post_json(READ_ROUTE, r#"{"skip":-1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = json_body(response).await;
        assert_eq!(body.error, "validation");
    }

    #[tokio::test]
    async fn test_clear_endpoint() {
        let (app, store) = make_test_router();
        store
            .save(vec![
                LogMessage::new(plog_proto::LogLevel::Info, "a").with_correlation_id("x"),
                LogMessage::new(plog_proto::LogLevel::Info, "b").with_correlation_id("y"),
            ])
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_json(CLEAR_ROUTE, r#"{"correlation_id":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.len(), 1);

        let response = app.oneshot(post_json(CLEAR_ROUTE, "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_file_store_save_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            plog_store::FilePersistence::open(
                plog_store::PersistenceConfig::default().with_path(dir.path().join("logs.jsonl")),
            )
            .unwrap(),
        );
        let app = create_router(Arc::new(LoggingController::new(store.clone())));

        let response = app
            .clone()
            .oneshot(post_json(
                SAVE_ROUTE,
                r#"[{"level":"Warn","message":"disk","correlation_id":"x"},{"level":"Info","message":"ok"}]"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.len(), 2);

        let response = app
            .oneshot(post_json(CLEAR_ROUTE, r#"{"correlation_id":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_endpoint() {
        let (app, _) = make_test_router();

        let response = app
            .oneshot(post_json("/v1/logging/update", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let (app, _) = make_test_router();

        let request = Request::builder()
            .uri(READ_ROUTE)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
