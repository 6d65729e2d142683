//! # REST API HTTP Server
//!
//! Axum-based HTTP server for the list endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::store::DocumentStore;
use crate::transpiler::{ListRequest, ListResponse, TranspileError, Transpiler};

use super::errors::{RestError, RestResult};
use super::parser::parse_list_request;

/// One transpiler per configured collection, plus shared counters
#[derive(Debug)]
pub struct ListService<S> {
    endpoints: HashMap<String, Transpiler<S>>,
    metrics: MetricsRegistry,
}

impl<S: DocumentStore + Clone> ListService<S> {
    pub fn from_config(config: &ServiceConfig, store: S) -> Self {
        let limits = config.page_limits();
        let endpoints = config
            .endpoints
            .iter()
            .map(|endpoint| {
                let transpiler = Transpiler::new(
                    store.clone(),
                    endpoint.collection.clone(),
                    endpoint.declarations.clone(),
                    limits,
                );
                (endpoint.collection.clone(), transpiler)
            })
            .collect();

        Self {
            endpoints,
            metrics: MetricsRegistry::new(),
        }
    }
}

impl<S: DocumentStore> ListService<S> {
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Lists one page of `collection`, logging and counting the outcome
    pub fn list(&self, collection: &str, request: &ListRequest) -> RestResult<ListResponse<Value>> {
        let transpiler = self
            .endpoints
            .get(collection)
            .ok_or_else(|| RestError::CollectionNotFound(collection.to_string()))?;

        log_event_with_fields(
            Event::ListReceived,
            &[
                ("collection", collection),
                ("filter", request.filter.as_str()),
                ("parent", request.parent.as_str()),
            ],
        );

        match transpiler.transpile::<Value>(request) {
            Ok(page) => {
                self.metrics.increment_filters_transpiled();
                self.metrics.add_documents_returned(page.items.len() as u64);
                log_event_with_fields(
                    Event::ListCompleted,
                    &[
                        ("collection", collection),
                        ("items", page.items.len().to_string().as_str()),
                    ],
                );
                Ok(page)
            }
            Err(err) => {
                self.record_failure(collection, &err);
                Err(err.into())
            }
        }
    }

    fn record_failure(&self, collection: &str, err: &TranspileError) {
        if let Some(diagnostic) = err.diagnostic() {
            diagnostic.emit();
        }

        let reason = err.to_string();
        match err {
            TranspileError::InvalidArgument { .. } => {
                self.metrics.increment_filters_rejected();
                log_event_with_fields(
                    Event::FilterRejected,
                    &[("collection", collection), ("reason", reason.as_str())],
                );
            }
            TranspileError::Store(store_err) => {
                self.metrics.increment_store_failures();
                log_event_with_fields(
                    Event::StoreFailed,
                    &[
                        ("code", store_err.code()),
                        ("collection", collection),
                        ("reason", reason.as_str()),
                    ],
                );
            }
        }
    }
}

/// Shared state type
type ServerState<S> = Arc<ListService<S>>;

/// Build the Axum router
pub fn router<S: DocumentStore + 'static>(service: ListService<S>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler::<S>))
        .route("/v1/:collection", get(list_handler::<S>))
        .with_state(Arc::new(service))
}

/// Bind `address` and serve until the process exits
pub async fn serve<S: DocumentStore + 'static>(
    service: ListService<S>,
    address: &str,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    let local = listener.local_addr()?.to_string();
    log_event_with_fields(Event::Serving, &[("address", local.as_str())]);
    axum::serve(listener, router(service)).await
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

async fn metrics_handler<S: DocumentStore + 'static>(
    State(service): State<ServerState<S>>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(service.metrics().snapshot()))
}

/// List documents handler
async fn list_handler<S: DocumentStore + 'static>(
    State(service): State<ServerState<S>>,
    Path(collection): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse<Value>>, RestError> {
    let request = parse_list_request(&query)?;
    let page = service.list(&collection, &request)?;
    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn service() -> ListService<Arc<InMemoryStore>> {
        let config = ServiceConfig::from_json(
            r#"{
                "default_page_size": 2,
                "endpoints": [{
                    "collection": "users",
                    "identifiers": {"age": "int64", "name": "string"}
                }]
            }"#,
        )
        .unwrap();
        let store = InMemoryStore::from_seed(json!({
            "users": [
                {"id": "u1", "name": "ada", "age": 36},
                {"id": "u2", "name": "bob", "age": 17},
                {"id": "u3", "name": "cy", "age": 52}
            ]
        }))
        .unwrap();
        ListService::from_config(&config, Arc::new(store))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let (status, body) = get_json(router(service()), "/v1/users?filter=age%20%3E%2030").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([{"name": "ada", "age": 36}, {"name": "cy", "age": 52}]));
        assert_eq!(body["next_page_token"], "u3");
    }

    #[tokio::test]
    async fn test_default_page_size_applies() {
        let (status, body) = get_json(router(service()), "/v1/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["next_page_token"], "u2");
    }

    #[tokio::test]
    async fn test_rejected_filter_is_bad_request() {
        let (status, body) = get_json(router(service()), "/v1/users?filter=age").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_bad_page_size_is_bad_request() {
        let (status, _) = get_json(router(service()), "/v1/users?page_size=many").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json(router(service()), "/v1/users?page_size=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_not_found() {
        let (status, body) = get_json(router(service()), "/v1/books").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(router(service()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn test_list_updates_metrics() {
        let service = service();
        let ok = ListRequest {
            filter: "age < 40".into(),
            page_size: 10,
            ..Default::default()
        };
        let bad = ListRequest {
            filter: "age > 1 AND name > \"a\"".into(),
            ..Default::default()
        };

        assert_eq!(service.list("users", &ok).unwrap().items.len(), 2);
        assert!(service.list("users", &bad).is_err());

        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.filters_transpiled, 1);
        assert_eq!(snapshot.filters_rejected, 1);
        assert_eq!(snapshot.documents_returned, 2);
        assert_eq!(snapshot.store_failures, 0);
    }
}
