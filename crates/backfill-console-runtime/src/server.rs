use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use backfill_console_core::backfill::BackfillBackend;
use backfill_console_core::config::ConsoleConfig;

use crate::ui::{create_ui_router, UiState};

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Request id assigned to the current request, available as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Console HTTP server.
pub struct ConsoleServer {
    config: ConsoleConfig,
    backend: Arc<dyn BackfillBackend>,
}

impl ConsoleServer {
    pub fn new(config: ConsoleConfig, backend: Arc<dyn BackfillBackend>) -> Self {
        Self { config, backend }
    }

    /// Build the Axum router.
    pub fn router(&self) -> Router {
        let ui_state = UiState::new(self.backend.clone(), self.config.ui.clone());
        let timeout = Duration::from_secs(self.config.server.request_timeout_secs);

        Router::new()
            .route("/health", get(health_handler))
            .merge(create_ui_router(ui_state))
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(request_id_middleware))
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn_with_state(timeout, timeout_middleware)),
            )
    }

    /// Address to bind to, as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }

    /// Run the server until ctrl-c.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let addr = self.bind_address();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Backfill console listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}

/// Health check handler.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Propagates or generates `x-request-id` and echoes it on the response.
async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    let request_id = req
        .headers()
        .get(&header)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        uri = %req.uri(),
    );
    let mut response = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(header, val);
    }
    response
}

async fn timeout_middleware(State(timeout): State<Duration>, req: Request, next: Next) -> Response {
    let uri = req.uri().clone();
    match tokio::time::timeout(timeout, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%uri, ?timeout, "Request timed out");
            (StatusCode::GATEWAY_TIMEOUT, "request timed out").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::backend::InMemoryBackend;

    fn server() -> ConsoleServer {
        ConsoleServer::new(ConsoleConfig::default(), Arc::new(InMemoryBackend::new()))
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(server().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_health_response_serialization() {
        let resp = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
    }

    #[tokio::test]
    async fn test_health_endpoint_sets_request_id() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/backfills/1")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
    }
}
