//! HTTP transport: one envelope in, one envelope out

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use kubebridge_core::{Envelope, Router as ProtocolRouter, DEFAULT_CONNECTION};
use serde_json::{json, Value};

/// Header naming the logical connection a request belongs to
pub const CONNECTION_HEADER: &str = "mcp-connection-id";

/// Routes served by `kubebridge serve`
pub fn app(router: Arc<ProtocolRouter>) -> Router {
    Router::new()
        .route("/mcp", post(handle_envelope))
        .route("/health", get(health))
        .with_state(router)
}

/// Protocol outcomes, errors included, always return 200 with an envelope
async fn handle_envelope(
    State(router): State<Arc<ProtocolRouter>>,
    headers: HeaderMap,
    Json(request): Json<Envelope>,
) -> Json<Envelope> {
    let connection = headers
        .get(CONNECTION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONNECTION);

    tracing::debug!(connection, kind = %request.kind, id = %request.id, "envelope received");
    Json(router.dispatch(connection, request).await)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use kubebridge_core::{kubernetes_registry, DryRunBackend, NoOpLogger, ResourceCatalog};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let router = ProtocolRouter::new(
            Arc::new(kubernetes_registry().unwrap()),
            ResourceCatalog::kubernetes(),
            Arc::new(DryRunBackend),
            NoOpLogger::shared(),
        );
        app(Arc::new(router))
    }

    fn post_envelope(connection: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json");
        if let Some(connection) = connection {
            builder = builder.header("Mcp-Connection-Id", connection);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_protocol_error_is_http_ok() {
        let response = test_app()
            .oneshot(post_envelope(None, json!({"type": "foo", "id": "x"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["type"], "error");
        assert_eq!(body["id"], "x");
        assert_eq!(body["data"]["type"], "UnsupportedType");
    }

    #[tokio::test]
    async fn test_connection_header_scopes_state() {
        let app = test_app();
        let init = json!({
            "type": "initialize",
            "id": "1",
            "data": {"protocolVersion": "2024-11-05"}
        });
        let response = app.clone().oneshot(post_envelope(Some("alpha"), init)).await.unwrap();
        assert_eq!(body_json(response).await["type"], "initialization");

        let list = json!({"type": "listTools", "id": "2"});
        let ready = app.clone().oneshot(post_envelope(Some("alpha"), list.clone())).await.unwrap();
        assert_eq!(body_json(ready).await["type"], "listTools");

        let other = app.oneshot(post_envelope(Some("beta"), list)).await.unwrap();
        let body = body_json(other).await;
        assert_eq!(body["type"], "error");
        assert_eq!(body["data"]["message"], "connection not initialized");
    }

    #[tokio::test]
    async fn test_transport_errors() {
        let app = test_app();

        let not_json = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let response = app.clone().oneshot(not_json).await.unwrap();
        assert!(response.status().is_client_error());

        let wrong_method = Request::builder().uri("/mcp").body(Body::empty()).unwrap();
        let response = app.oneshot(wrong_method).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
