use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use miette::{IntoDiagnostic, Result};

use crate::rbac::root::RootPolicy;
use crate::rbac::types::{CheckRequest, CheckResponse};
use crate::settings::Settings;

/// The loaded policy is read-only once served, so handlers share it without
/// locking.
pub fn router(state: Arc<RootPolicy>) -> Router {
    Router::new()
        .route("/v1/check", post(handle_check))
        .route("/v1/policy", get(handle_policy))
        .route("/healthz", get(health))
        .with_state(state)
}

pub async fn serve(settings: &Settings, root: RootPolicy) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .map_err(|e| miette::miette!("bad listen addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .into_diagnostic()?;
    tracing::info!(%addr, "Authorization policy API listening");
    axum::serve(listener, router(Arc::new(root)))
        .await
        .into_diagnostic()?;
    Ok(())
}

async fn handle_check(
    State(state): State<Arc<RootPolicy>>,
    Json(req): Json<CheckRequest>,
) -> impl IntoResponse {
    let allowed = state.should_allow(&req.permission, &req.context, &req.subject);
    tracing::debug!(
        context = %req.context,
        permission = %req.permission,
        allowed,
        "policy check"
    );
    Json(CheckResponse { allowed })
}

async fn handle_policy(State(state): State<Arc<RootPolicy>>) -> impl IntoResponse {
    Json(state.policy().to_json())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let mut root = RootPolicy::new();
        root.add_json_policy_for_context(
            &json!({"GET": true, "PUT": ["ThingOne", "ThingTwo"]}),
            "a",
        );
        router(Arc::new(root))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn check(body: Value) -> axum::response::Response {
        app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/v1/check")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_check_allowed() {
        let response = check(json!({
            "context": "a",
            "action": "PUT",
            "resourceType": "ThingTwo",
            "subject": {"user": "alice"},
        }))
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"allowed": true}));
    }

    #[tokio::test]
    async fn test_check_denied() {
        let response = check(json!({
            "context": "b",
            "action": "GET",
            "resourceType": "ThingOne",
        }))
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"allowed": false}));
    }

    #[tokio::test]
    async fn test_check_malformed_request() {
        let response = check(json!({"context": "a"})).await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_policy_dump() {
        let response = app()
            .oneshot(Request::builder().uri("/v1/policy").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"a": {"GET": true, "PUT": ["ThingOne", "ThingTwo"]}})
        );
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
