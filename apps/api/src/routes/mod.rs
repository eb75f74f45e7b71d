pub mod health;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/evaluate", post(handlers::handle_evaluate))
        // Path used by the original front end.
        .route("/evaluate", post(handlers::handle_evaluate))
        .layer(cors)
        .with_state(state)
}

/// `*` anywhere in the list means any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::evaluation::service::tests::FakeBackend;
    use crate::evaluation::service::Evaluator;
    use crate::llm_client::{CompletionBackend, LlmError};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(backend: Option<Arc<dyn CompletionBackend>>) -> Router {
        let config = Config::from_lookup(|_| None).unwrap();
        build_router(AppState {
            evaluator: Evaluator::new(backend),
            config,
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_degraded_without_backend() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["completion_backend_configured"], false);
        assert!(body["model"].is_null());
    }

    #[tokio::test]
    async fn test_health_does_not_call_backend() {
        let backend = FakeBackend::replying("Decision: Fit");
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(Some(backend.clone())), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "fake-model");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_root_banner() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(app(None), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_evaluate_returns_decision_and_reasoning() {
        let backend = FakeBackend::replying("Decision: Not Fit\nReasoning: Only manager level.");
        let body = json!({
            "profile_text": "Sales manager at a hardware company",
            "rules": ["Must be Director-level or higher."],
            "icp_focus": "Enterprise SaaS Sales Director"
        });
        let (status, body) = send(
            app(Some(backend.clone())),
            post_json("/api/v1/evaluate", &body.to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "decision": "Not Fit", "reasoning": "Only manager level." }));
        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("ICP FOCUS: Enterprise SaaS Sales Director"));
    }

    #[tokio::test]
    async fn test_legacy_evaluate_path_is_mounted() {
        let backend = FakeBackend::replying("Decision: Fit\nReasoning: ok");
        let body = json!({ "profile_text": "p", "rules": ["r"] }).to_string();
        let (status, body) = send(app(Some(backend)), post_json("/evaluate", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"], "Fit");
    }

    #[tokio::test]
    async fn test_rules_not_a_list_is_validation_error() {
        let backend = FakeBackend::replying("Decision: Fit");
        let body = json!({ "profile_text": "p", "rules": "Must be VP" }).to_string();
        let (status, body) =
            send(app(Some(backend.clone())), post_json("/api/v1/evaluate", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "VALIDATION_ERROR");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_rules_is_validation_error() {
        let backend = FakeBackend::replying("Decision: Fit");
        let body = json!({ "profile_text": "p", "rules": [] }).to_string();
        let (status, body) =
            send(app(Some(backend.clone())), post_json("/api/v1/evaluate", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "rules cannot be empty");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_service_unavailable() {
        let body = json!({ "profile_text": "p", "rules": ["r"] }).to_string();
        let (status, body) = send(app(None), post_json("/api/v1/evaluate", &body)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["kind"], "SERVICE_UNAVAILABLE");
        assert_eq!(body["error"]["retryable"], false);
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_gateway_timeout() {
        let backend = FakeBackend::failing(|| LlmError::Timeout);
        let body = json!({ "profile_text": "p", "rules": ["r"] }).to_string();
        let (status, body) = send(app(Some(backend)), post_json("/api/v1/evaluate", &body)).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"]["kind"], "UPSTREAM_TIMEOUT");
        assert_eq!(body["error"]["retryable"], true);
    }

    #[tokio::test]
    async fn test_malformed_reply_includes_raw_text() {
        let backend = FakeBackend::replying("Fit; legacy format");
        let body = json!({ "profile_text": "p", "rules": ["r"] }).to_string();
        let (status, body) = send(app(Some(backend)), post_json("/api/v1/evaluate", &body)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["kind"], "MALFORMED_RESPONSE");
        assert_eq!(body["error"]["raw_response"], "Fit; legacy format");
    }

    #[tokio::test]
    async fn test_wildcard_origin_is_permissive() {
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://anywhere.test")
            .body(Body::empty())
            .unwrap();
        let router = Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(cors_layer(&["*".to_string()]));
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
