//! Configuration schema definitions.
//!
//! `ServiceConfig` is the startup file of the host binary. Its `runtime`
//! section is the live value exposed over HTTP and may change while the
//! process runs; every other section is read once at startup.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::validation::{validate_runtime, ValidationError, ValidationErrors};
use crate::endpoint::{LiveConfig, DEFAULT_CONFIG_PATH, DEFAULT_MAX_BODY_BYTES, DEFAULT_SCHEMA_PATH};

/// Root configuration for the host process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Hot reload of this file.
    pub reload: ReloadConfig,

    /// Live configuration exposed on the config endpoint.
    pub runtime: RuntimeConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Path of the configuration resource.
    pub config_path: String,

    /// Path of the schema resource.
    pub schema_path: String,

    /// Maximum accepted POST body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            schema_path: DEFAULT_SCHEMA_PATH.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Hot reload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Watch the config file and push its `runtime` section on change.
    pub enabled: bool,

    /// Poll interval for filesystems without change notifications.
    pub poll_interval_secs: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_interval_secs: 2,
        }
    }
}

/// Settings that can be read and replaced while the process runs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct RuntimeConfig {
    /// Instance name; fixed for the lifetime of the process.
    pub instance_name: String,

    /// Port advertised to clients (1024 or above).
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Reported as `maintenance` by the host's `/health` route while set.
    pub maintenance_mode: bool,

    /// Timeout configuration.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            instance_name: "live-config".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            maintenance_mode: false,
            timeouts: TimeoutConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl LiveConfig for RuntimeConfig {
    type Error = ValidationErrors;

    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_runtime(self).map_err(ValidationErrors)
    }

    fn update(&mut self, candidate: Self) -> Result<(), ValidationErrors> {
        if candidate.instance_name != self.instance_name {
            return Err(ValidationErrors(vec![ValidationError::new(
                "instance_name",
                format!(
                    "cannot change from {:?} to {:?} at runtime",
                    self.instance_name, candidate.instance_name
                ),
            )]));
        }
        *self = candidate;
        Ok(())
    }

    /// Payloads may omit fields; they fall back to the defaults.
    fn create_new(&self) -> Option<Self> {
        Some(Self {
            instance_name: self.instance_name.clone(),
            ..Self::default()
        })
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per second per client.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: 100,
            burst_size: 50,
        }
    }
}
