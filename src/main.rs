//! live-config host server.
//!
//! Serves a process's runtime configuration over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ loader ──▶ validation ──▶ ServiceConfig
//!        │                                        │ runtime section
//!        ▼                                        ▼
//!     watcher ──── reload ────────────────▶ ConfigStore<RuntimeConfig>
//!                                                 ▲
//!   Client ──▶ TraceLayer ──▶ Router ──▶ ConfigEndpoint
//!                              │           GET/POST /config/
//!                              │           GET /config-schema/
//!                              └──▶ /health
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use live_config::config::watcher::ConfigWatcher;
use live_config::config::{load_config, ServiceConfig};
use live_config::lifecycle::{signals, Shutdown};
use live_config::observability::{logging, metrics};
use live_config::HttpServer;

#[derive(Parser)]
#[command(name = "live-config")]
#[command(about = "Expose a process's runtime configuration over HTTP", long_about = None)]
struct Args {
    /// Path to the TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override server.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("live-config v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        instance = %config.runtime.instance_name,
        reload = config.reload.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Dropping the watcher stops it, so it lives until main returns.
    let (_watcher, reloads) = match (&args.config, config.reload.enabled) {
        (Some(path), true) => {
            let (watcher, rx) =
                ConfigWatcher::new(path, Duration::from_secs(config.reload.poll_interval_secs));
            (Some(watcher.run()?), Some(rx))
        }
        _ => (None, None),
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    let server = HttpServer::new(config);
    server.run(listener, reloads, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
