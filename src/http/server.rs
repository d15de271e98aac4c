//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the host Axum Router and mount the config endpoint on it
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Feed file reloads into the endpoint's store

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::watcher::apply_reload;
use crate::config::{RuntimeConfig, ServiceConfig};
use crate::endpoint::{ConfigEndpoint, ConfigStore, EndpointOptions};
use crate::lifecycle::Shutdown;

/// Response of the host's health route.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub instance: String,
    pub version: &'static str,
}

/// HTTP server hosting the runtime configuration endpoint.
pub struct HttpServer {
    router: Router,
    endpoint: ConfigEndpoint<RuntimeConfig>,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let options = EndpointOptions {
            config_path: config.server.config_path.clone(),
            schema_path: config.server.schema_path.clone(),
            max_body_bytes: config.server.max_body_bytes,
            logger: None,
        };

        let endpoint = ConfigEndpoint::with_options(config.runtime.clone(), None, options);
        let host_routes = Router::new()
            .route("/health", get(health))
            .with_state(endpoint.store().clone());
        let router = Self::build_router(&config, endpoint.router().merge(host_routes));

        Self {
            router,
            endpoint,
            config,
        }
    }

    /// Wrap the application routes in the middleware stack.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, routes: Router) -> Router {
        routes
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The mounted configuration endpoint.
    pub fn endpoint(&self) -> &ConfigEndpoint<RuntimeConfig> {
        &self.endpoint
    }

    /// The full application router, middleware included.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the startup config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Reloaded files arriving on `reloads` are pushed through the endpoint's
    /// store.
    pub async fn run(
        self,
        listener: TcpListener,
        reloads: Option<mpsc::UnboundedReceiver<ServiceConfig>>,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            config_path = %self.config.server.config_path,
            schema_path = %self.config.server.schema_path,
            "HTTP server starting"
        );

        if let Some(reloads) = reloads {
            tokio::spawn(reload_loop(
                self.endpoint.store().clone(),
                reloads,
                shutdown.clone(),
            ));
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn reload_loop(
    store: Arc<ConfigStore<RuntimeConfig>>,
    mut reloads: mpsc::UnboundedReceiver<ServiceConfig>,
    shutdown: Shutdown,
) {
    let stopped = shutdown.wait();
    tokio::pin!(stopped);

    loop {
        tokio::select! {
            next = reloads.recv() => match next {
                Some(config) => {
                    apply_reload(&store, config);
                }
                None => break,
            },
            _ = &mut stopped => break,
        }
    }
    tracing::debug!("Reload loop stopped");
}

async fn health(State(store): State<Arc<ConfigStore<RuntimeConfig>>>) -> Json<HealthStatus> {
    let runtime = store.current();
    Json(HealthStatus {
        status: if runtime.maintenance_mode {
            "maintenance"
        } else {
            "operational"
        },
        instance: runtime.instance_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
