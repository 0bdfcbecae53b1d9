//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::engine::SymptomEngine;

/// Build the API router for `engine`.
///
/// `request_timeout` bounds every ranking request end to end.
pub fn api_router(engine: Arc<SymptomEngine>, request_timeout: Duration) -> Router {
    build_router(ApiContext::new(engine, request_timeout))
}

/// Build router from a pre-constructed `ApiContext`.
pub(crate) fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/rank", post(endpoints::rank::rank))
        .route("/sessions/:client_id", delete(endpoints::rank::cancel))
        .route("/symptoms/suggest", get(endpoints::symptoms::suggest))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::engine::tests::local_engine;
    use crate::error::PredictionFailure;
    use crate::knowledge_base::load_from_str;
    use crate::prediction::remote::MockPredictionClient;
    use crate::prediction::RemoteStrategy;
    use crate::session::tests::{gated_engine, wait_until_started, GatedBackend};

    fn test_router() -> Router {
        api_router(Arc::new(local_engine()), Duration::from_secs(5))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_of(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ── health ───────────────────────────────────────────

    #[tokio::test]
    async fn health_reports_snapshot() {
        let response = test_router().oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");

        let json = json_of(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["backend"], "local");
        assert_eq!(json["conditions"], 3);
        assert_eq!(json["symptoms"], 6);
        assert!(!json["session_id"].as_str().unwrap().is_empty());
        assert!(json["started_at"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = test_router().oneshot(get_request("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ── rank ─────────────────────────────────────────────

    #[tokio::test]
    async fn rank_returns_tiered_results() {
        let req = post_json("/api/rank", r#"{"symptoms": ["Fever", "cough"], "k": 2}"#);
        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_of(response).await;
        assert_eq!(json["backend"], "local");
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["name"], "Condition A");
        assert_eq!(results[0]["score"], 100.0);
        assert_eq!(results[0]["confidence"], "high");
        assert_eq!(results[1]["name"], "Condition B");
        assert_eq!(results[1]["confidence"], "medium");
    }

    #[tokio::test]
    async fn rank_accepts_context() {
        let body = r#"{
            "symptoms": ["runny nose"],
            "context": {"duration": "one_to_three_days", "severity": 4, "age": 31, "gender": "other"},
            "client_id": "tab-1"
        }"#;
        let response = test_router().oneshot(post_json("/api/rank", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["results"][0]["name"], "Common Cold");
        assert_eq!(json["results"][0]["severity"], "low");
    }

    #[tokio::test]
    async fn rank_accepts_duration_label() {
        let body = r#"{"symptoms": ["fever"], "context": {"duration": "<1 day"}}"#;
        let response = test_router().oneshot(post_json("/api/rank", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await["results"][0]["name"], "Condition A");
    }

    #[tokio::test]
    async fn unknown_symptom_is_422_with_token() {
        let req = post_json("/api/rank", r#"{"symptoms": ["fever", "unknown_token"]}"#);
        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "UNKNOWN_SYMPTOM");
        assert_eq!(json["error"]["token"], "unknown_token");
    }

    #[tokio::test]
    async fn caller_errors_map_to_codes() {
        for (body, code) in [
            (r#"{"symptoms": []}"#, "EMPTY_QUERY"),
            (r#"{"symptoms": ["fever"], "k": 0}"#, "INVALID_K"),
            (r#"{"symptoms": ["fever"], "context": {"severity": 11}}"#, "INVALID_CONTEXT"),
            (r#"{"symptoms": "fever"}"#, "BAD_REQUEST"),
            (r#"not json"#, "BAD_REQUEST"),
        ] {
            let response = test_router().oneshot(post_json("/api/rank", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json_of(response).await["error"]["code"], code, "{body}");
        }
    }

    #[tokio::test]
    async fn remote_failure_is_503() {
        let loaded = load_from_str(crate::engine::tests::TEST_KNOWLEDGE).unwrap();
        let client = Arc::new(MockPredictionClient::failing(PredictionFailure::Connection(
            "http://localhost:5000".into(),
        )));
        let engine = SymptomEngine::new(
            Arc::new(loaded.catalog),
            Arc::new(loaded.knowledge_base),
            Arc::new(RemoteStrategy::new(Box::new(client))),
        );
        let app = api_router(Arc::new(engine), Duration::from_secs(5));

        let response = app
            .oneshot(post_json("/api/rank", r#"{"symptoms": ["fever"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_of(response).await["error"]["code"],
            "PREDICTION_UNAVAILABLE"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn newer_request_from_same_client_supersedes_older() {
        let backend = Arc::new(GatedBackend::new());
        let app = api_router(
            Arc::new(gated_engine(Arc::clone(&backend))),
            Duration::from_secs(10),
        );

        let first = {
            let app = app.clone();
            let req = post_json("/api/rank", r#"{"symptoms": ["fever"], "client_id": "tab-1"}"#);
            tokio::spawn(async move { app.oneshot(req).await.unwrap() })
        };
        wait_until_started(&backend).await;

        let req = post_json("/api/rank", r#"{"symptoms": ["cough"], "client_id": "tab-1"}"#);
        let second = app.clone().oneshot(req).await.unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(json_of(second).await["results"][0]["name"], "cough");

        let first = first.await.unwrap();
        assert_eq!(first.status(), StatusCode::CONFLICT);
        assert_eq!(json_of(first).await["error"]["code"], "SUPERSEDED");

        backend.release();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn other_clients_are_not_superseded() {
        let backend = Arc::new(GatedBackend::new());
        let app = api_router(
            Arc::new(gated_engine(Arc::clone(&backend))),
            Duration::from_secs(10),
        );

        let first = {
            let app = app.clone();
            let req = post_json("/api/rank", r#"{"symptoms": ["fever"], "client_id": "tab-1"}"#);
            tokio::spawn(async move { app.oneshot(req).await.unwrap() })
        };
        wait_until_started(&backend).await;

        let req = post_json("/api/rank", r#"{"symptoms": ["cough"], "client_id": "tab-2"}"#);
        let second = app.oneshot(req).await.unwrap();
        assert_eq!(second.status(), StatusCode::OK);

        backend.release();
        let first = first.await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(json_of(first).await["results"][0]["name"], "fever");
    }

    #[tokio::test]
    async fn cancel_is_no_content() {
        let req = Request::builder()
            .method("DELETE")
            .uri("/api/sessions/tab-1")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    // ── suggest ──────────────────────────────────────────

    #[tokio::test]
    async fn suggest_returns_ids_and_labels() {
        let response = test_router()
            .oneshot(get_request("/api/symptoms/suggest?q=N&limit=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        let suggestions = json["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0]["id"], "runny nose");
        assert_eq!(suggestions[0]["label"], "Runny Nose");
        assert_eq!(suggestions[1]["id"], "sneezing");
    }

    #[tokio::test]
    async fn suggest_without_query_is_empty() {
        let response = test_router()
            .oneshot(get_request("/api/symptoms/suggest"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await["suggestions"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn suggest_rejects_bad_limit() {
        let response = test_router()
            .oneshot(get_request("/api/symptoms/suggest?q=f&limit=lots"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"]["code"], "BAD_REQUEST");
    }
}
