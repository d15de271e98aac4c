//! Route handlers for the configuration and schema resources.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::EndpointError;
use super::live::LiveConfig;
use super::store::ConfigStore;
use super::Logger;
use crate::observability::metrics;

pub(crate) const CONFIG_ROUTE: &str = "config";
pub(crate) const SCHEMA_ROUTE: &str = "schema";

/// State shared by every handler of one endpoint.
pub(crate) struct Shared<T> {
    pub(crate) store: Arc<ConfigStore<T>>,
    pub(crate) logger: Logger,
}

impl<T> Shared<T> {
    fn reject(&self, route: &'static str, method: &'static str, err: EndpointError) -> Response {
        self.logger.in_scope(|| {
            if err.is_client_error() {
                tracing::debug!(route, method, error = %err, "Rejected configuration request");
            } else {
                tracing::warn!(route, method, error = %err, "Configuration request failed");
            }
        });
        err.into_response()
    }
}

fn json(body: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub(crate) async fn get_config<T: LiveConfig>(State(shared): State<Arc<Shared<T>>>) -> Response {
    match shared.store.to_json() {
        Ok(body) => json(body),
        Err(err) => shared.reject(CONFIG_ROUTE, "GET", err),
    }
}

pub(crate) async fn post_config<T: LiveConfig>(
    State(shared): State<Arc<Shared<T>>>,
    body: Bytes,
) -> Response {
    match shared.store.submit_json(&body) {
        Ok(()) => {
            shared
                .logger
                .in_scope(|| tracing::info!(bytes = body.len(), "Configuration updated"));
            metrics::record_update("http", "applied");
            StatusCode::OK.into_response()
        }
        Err(err) => {
            metrics::record_update("http", err.kind());
            shared.reject(CONFIG_ROUTE, "POST", err)
        }
    }
}

pub(crate) async fn get_schema<T: LiveConfig>(State(shared): State<Arc<Shared<T>>>) -> Response {
    let schema = schemars::schema_for!(T);
    match serde_json::to_vec(&schema) {
        Ok(body) => json(body),
        Err(err) => shared.reject(SCHEMA_ROUTE, "GET", EndpointError::SerializeSchema(err)),
    }
}

/// Preflight: empty body, default status.
pub(crate) async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Count every response on `route`, including 405 and 413 from axum.
pub(crate) async fn count_requests(route: &'static str, request: Request, next: Next) -> Response {
    let method = method_label(request.method().as_str());
    let response = next.run(request).await;
    metrics::record_request(route, method, response.status().as_u16());
    response
}

fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "PATCH" => "PATCH",
        "DELETE" => "DELETE",
        "OPTIONS" => "OPTIONS",
        _ => "other",
    }
}
