//! Host HTTP server.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → /health (host route, reads live runtime config)
//!     → /config/, /config-schema/ (config endpoint)
//! ```

pub mod server;

pub use server::HttpServer;
