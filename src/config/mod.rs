//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated)
//!     → runtime section handed to the config endpoint
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → ConfigStore::submit (validate, update, atomic swap)
//!     → readers observe the new runtime section
//! ```
//!
//! # Design Decisions
//! - Only the runtime section changes after startup
//! - All startup sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ObservabilityConfig, RateLimitConfig, ReloadConfig, RuntimeConfig, ServerConfig,
    ServiceConfig, TimeoutConfig,
};
pub use validation::{ValidationError, ValidationErrors};
