use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use backfill_console_core::backfill::{
    BackendFuture, BackfillBackend, BackfillStatus, CreateBackfillRequest, CreateBackfillResponse,
};
use backfill_console_core::error::{ConsoleError, Result};

/// Backend that talks JSON to a running backfill service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("backfill-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConsoleError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn status_url(&self, id: i64) -> String {
        format!("{}/backfills/{}/status", self.base_url, id)
    }

    /// Service and variant come from the form and are encoded as single
    /// path segments.
    fn create_url(&self, service: &str, variant: &str) -> String {
        format!(
            "{}/services/{}/variants/{}/create",
            self.base_url,
            urlencoding::encode(service),
            urlencoding::encode(variant)
        )
    }
}

/// Map a response to a typed body, turning error statuses into errors.
async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ConsoleError::Serialization(format!("Invalid {} response: {}", what, e)));
    }

    let body = response.text().await.unwrap_or_default();
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    };

    Err(match status {
        StatusCode::NOT_FOUND => ConsoleError::NotFound(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ConsoleError::InvalidArgument(detail)
        }
        _ => ConsoleError::Backend(format!("{} failed with {}", what, detail)),
    })
}

fn transport_error(e: reqwest::Error) -> ConsoleError {
    ConsoleError::Http(e.to_string())
}

impl BackfillBackend for HttpBackend {
    fn status<'a>(&'a self, id: i64, offset: Option<&'a str>) -> BackendFuture<'a, BackfillStatus> {
        Box::pin(async move {
            let mut request = self.client.get(self.status_url(id));
            if let Some(offset) = offset {
                request = request.query(&[("offset", offset)]);
            }

            let response = request.send().await.map_err(transport_error)?;
            decode(response, "status").await
        })
    }

    fn create<'a>(
        &'a self,
        service: &'a str,
        variant: &'a str,
        request: CreateBackfillRequest,
    ) -> BackendFuture<'a, CreateBackfillResponse> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.create_url(service, variant))
                .json(&request)
                .send()
                .await
                .map_err(transport_error)?;
            decode(response, "create").await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query};
    use axum::http::{StatusCode as AxumStatus, Uri};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn status_json(id: i64, offset: Option<&str>) -> Value {
        json!({
            "id": id,
            "service_name": "franklin",
            "variant": "default",
            "name": "ChickenSandwich",
            "state": "RUNNING",
            "dry_run": false,
            "num_threads": 1,
            "scan_size": 100,
            "batch_size": 10,
            "extra_sleep_ms": 0,
            "created_at": "2024-03-01T10:00:00Z",
            "partitions": [],
            "event_logs": [],
            "next_offset": offset,
        })
    }

    fn test_router() -> Router {
        Router::new()
            .route(
                "/backfills/{id}/status",
                get(
                    |Path(id): Path<i64>, Query(q): Query<HashMap<String, String>>| async move {
                        if id == 404 {
                            return Err((AxumStatus::NOT_FOUND, "no such backfill"));
                        }
                        Ok(Json(status_json(id, q.get("offset").map(String::as_str))))
                    },
                ),
            )
            .route(
                "/services/{service}/variants/{variant}/create",
                post(
                    |Path((service, _variant)): Path<(String, String)>,
                     Json(body): Json<Value>| async move {
                        if service == "unknown" {
                            return Err((AxumStatus::BAD_REQUEST, "unknown service".to_string()));
                        }
                        if service == "broken" {
                            return Err((AxumStatus::INTERNAL_SERVER_ERROR, String::new()));
                        }
                        let id = if body["dry_run"] == json!(true) { 7 } else { 8 };
                        Ok(Json(json!({ "backfill_run_id": id })))
                    },
                ),
            )
    }

    #[tokio::test]
    async fn test_status_passes_offset() {
        let base = serve(test_router()).await;
        let backend = HttpBackend::new(format!("{}/", base), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), base);

        let status = backend.status(3, Some("abc")).await.unwrap();
        assert_eq!(status.id, 3);
        assert_eq!(status.next_offset.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_status_not_found() {
        let base = serve(test_router()).await;
        let backend = HttpBackend::new(base, Duration::from_secs(5)).unwrap();

        let err = backend.status(404, None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_maps_responses() {
        let base = serve(test_router()).await;
        let backend = HttpBackend::new(base, Duration::from_secs(5)).unwrap();

        let request = CreateBackfillRequest {
            dry_run: true,
            ..Default::default()
        };
        let created = backend.create("franklin", "default", request).await.unwrap();
        assert_eq!(created.backfill_run_id, 7);

        let err = backend
            .create("unknown", "default", CreateBackfillRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidArgument(_)));
        assert!(err.to_string().contains("unknown service"));

        let err = backend
            .create("broken", "default", CreateBackfillRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Backend(_)));
    }

    #[tokio::test]
    async fn test_create_encodes_path_segments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let router = Router::new().fallback(move |uri: Uri| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(uri.to_string());
                Json(json!({ "backfill_run_id": 1 }))
            }
        });
        let base = serve(router).await;
        let backend = HttpBackend::new(base, Duration::from_secs(5)).unwrap();

        backend
            .create("a/b?x=1#", "blue green", CreateBackfillRequest::default())
            .await
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["/services/a%2Fb%3Fx%3D1%23/variants/blue%20green/create".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let err = backend.status(1, None).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Http(_)));
    }
}
