//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! endpoint handlers, watcher, host binary produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request and update counters)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or configured level)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The global subscriber is installed once by the host and never reset
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
