//! Expose a process's live configuration over HTTP.
//!
//! [`ConfigEndpoint`] serves any [`LiveConfig`] value: `GET` returns it,
//! `POST` decodes, validates and commits a replacement, and a second route
//! returns its JSON Schema. The remaining modules make up the demo host
//! binary.

pub mod config;
pub mod endpoint;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::{RuntimeConfig, ServiceConfig};
pub use endpoint::{ConfigEndpoint, ConfigStore, EndpointError, EndpointOptions, LiveConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
