//! Endpoint error surface.
//!
//! # Design Decisions
//! - Decode and validation failures are client errors (400)
//! - Serialization and commit failures are server faults (500)
//! - The response body carries the error text; the audience is operators

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors produced while serving the configuration routes.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("failed to decode request body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to validate request body: {0}")]
    Validation(String),

    #[error("failed to marshal config: {0}")]
    SerializeConfig(#[source] serde_json::Error),

    #[error("failed to marshal schema: {0}")]
    SerializeSchema(#[source] serde_json::Error),

    #[error("failed to update config: {0}")]
    Update(String),
}

impl EndpointError {
    /// HTTP status this error resolves to.
    pub fn status(&self) -> StatusCode {
        match self {
            EndpointError::Decode(_) | EndpointError::Validation(_) => StatusCode::BAD_REQUEST,
            EndpointError::SerializeConfig(_)
            | EndpointError::SerializeSchema(_)
            | EndpointError::Update(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the caller sent something we refuse to apply.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EndpointError::Decode(_) => "decode",
            EndpointError::Validation(_) => "validation",
            EndpointError::SerializeConfig(_) | EndpointError::SerializeSchema(_) => "serialization",
            EndpointError::Update(_) => "update",
        }
    }
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
