//! HTTP exposure of a live configuration value.
//!
//! # Data Flow
//! ```text
//! GET  /config/         → store snapshot → JSON
//! POST /config/         → decode into fresh instance
//!                       → validate candidate
//!                       → update a private copy of the live value
//!                       → atomic swap of Arc<T>
//! GET  /config-schema/  → schemars reflection over T → JSON Schema
//! OPTIONS (both)        → 200, empty body
//! anything else         → 405
//! ```
//!
//! # Design Decisions
//! - Generic over any `T: LiveConfig`; no trait objects
//! - Routes mount onto a host-supplied `axum::Router` or a fresh one
//! - Every failure resolves to a response; none are fatal

mod error;
mod handlers;
mod live;
mod store;

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    response::Response,
    routing::get,
    Router,
};
use tower::Service;
use tracing::Dispatch;

pub use error::EndpointError;
pub use live::LiveConfig;
pub use store::ConfigStore;

use handlers::{Shared, CONFIG_ROUTE, SCHEMA_ROUTE};

/// Default route for the configuration resource.
pub const DEFAULT_CONFIG_PATH: &str = "/config/";
/// Default route for the schema resource.
pub const DEFAULT_SCHEMA_PATH: &str = "/config-schema/";
/// Default limit on POST bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Construction options for a [`ConfigEndpoint`].
#[derive(Clone)]
pub struct EndpointOptions {
    /// Path of the configuration resource.
    pub config_path: String,
    /// Path of the schema resource.
    pub schema_path: String,
    /// Largest accepted POST body; larger bodies get 413.
    pub max_body_bytes: usize,
    /// Subscriber for the endpoint's log events. `None` uses the process default.
    pub logger: Option<Dispatch>,
}

impl Default for EndpointOptions {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            schema_path: DEFAULT_SCHEMA_PATH.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            logger: None,
        }
    }
}

/// Routes endpoint log events to an override subscriber, if any.
#[derive(Clone, Default)]
pub(crate) struct Logger {
    dispatch: Option<Dispatch>,
}

impl Logger {
    fn new(dispatch: Option<Dispatch>) -> Self {
        Self { dispatch }
    }

    pub(crate) fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

/// Serves one live configuration value over HTTP.
///
/// The endpoint is itself a `tower::Service`, so it can be served directly,
/// or converted into an [`axum::Router`] and nested in a larger application.
#[derive(Clone)]
pub struct ConfigEndpoint<T> {
    store: Arc<ConfigStore<T>>,
    router: Router,
}

impl<T: LiveConfig> ConfigEndpoint<T> {
    /// Create an endpoint with default paths.
    ///
    /// Routes are added to `parent` when given, otherwise to a new router.
    ///
    /// # Panics
    /// See [`ConfigEndpoint::with_options`].
    pub fn new(initial: T, parent: Option<Router>, logger: Option<Dispatch>) -> Self {
        let options = EndpointOptions {
            logger,
            ..EndpointOptions::default()
        };
        Self::with_options(initial, parent, options)
    }

    /// Create an endpoint with explicit options.
    ///
    /// # Panics
    /// Route registration panics, as `axum::Router::route` and `merge` do, when:
    /// - `config_path` or `schema_path` does not start with `/`
    /// - the two paths collide, including after the trailing `/` is trimmed
    ///   (`/a/` and `/a`)
    /// - `parent` already has a route at one of the endpoint's paths
    pub fn with_options(initial: T, parent: Option<Router>, options: EndpointOptions) -> Self {
        let store = Arc::new(ConfigStore::new(initial));
        let logger = Logger::new(options.logger.clone());
        logger.in_scope(|| {
            tracing::debug!(
                config_path = %options.config_path,
                schema_path = %options.schema_path,
                "Mounting configuration endpoint"
            )
        });

        let shared = Arc::new(Shared {
            store: store.clone(),
            logger,
        });
        let router = parent.unwrap_or_default().merge(build_routes(&options, shared));

        Self { store, router }
    }

    /// Store holding the live value; share it with other writers.
    pub fn store(&self) -> &Arc<ConfigStore<T>> {
        &self.store
    }

    /// Snapshot of the live configuration.
    pub fn current(&self) -> Arc<T> {
        self.store.current()
    }

    /// Router serving the endpoint's routes and any parent routes.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

impl<T> From<ConfigEndpoint<T>> for Router {
    fn from(endpoint: ConfigEndpoint<T>) -> Self {
        endpoint.router
    }
}

impl<T, B> Service<Request<B>> for ConfigEndpoint<T>
where
    Router: Service<Request<B>, Response = Response, Error = Infallible>,
{
    type Response = Response;
    type Error = Infallible;
    type Future = <Router as Service<Request<B>>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Service::<Request<B>>::poll_ready(&mut self.router, cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        self.router.call(request)
    }
}

fn build_routes<T: LiveConfig>(options: &EndpointOptions, shared: Arc<Shared<T>>) -> Router {
    let config = get(handlers::get_config::<T>)
        .post(handlers::post_config::<T>)
        .options(handlers::preflight)
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .layer(middleware::from_fn(
            |request: Request<Body>, next: middleware::Next| {
                handlers::count_requests(CONFIG_ROUTE, request, next)
            },
        ));
    let schema = get(handlers::get_schema::<T>)
        .options(handlers::preflight)
        .layer(middleware::from_fn(
            |request: Request<Body>, next: middleware::Next| {
                handlers::count_requests(SCHEMA_ROUTE, request, next)
            },
        ));

    let mut router = Router::new();
    for path in route_paths(&options.config_path) {
        router = router.route(&path, config.clone());
    }
    for path in route_paths(&options.schema_path) {
        router = router.route(&path, schema.clone());
    }
    router.with_state(shared)
}

/// `/config/` is served at both `/config/` and `/config`.
fn route_paths(path: &str) -> Vec<String> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == path {
        vec![path.to_string()]
    } else {
        vec![path.to_string(), trimmed.to_string()]
    }
}
