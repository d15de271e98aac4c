//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the config
//! - Runs before config is accepted into the system, whether it comes
//!   from the startup file, the file watcher, or an HTTP POST

use std::fmt;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{RuntimeConfig, ServiceConfig};

/// Accepted log levels.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Lowest port the runtime config may advertise.
pub const MIN_PORT: u16 = 1024;

/// A single semantic problem with a config value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn nested(self, prefix: &str) -> Self {
        Self {
            field: format!("{prefix}.{}", self.field),
            message: self.message,
        }
    }
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate the live section.
pub fn validate_runtime(config: &RuntimeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.instance_name.trim().is_empty() {
        errors.push(ValidationError::new("instance_name", "must not be empty"));
    }
    if config.port < MIN_PORT {
        errors.push(ValidationError::new(
            "port",
            format!("{} is below {}", config.port, MIN_PORT),
        ));
    }
    check_log_level("log_level", &config.log_level, &mut errors);

    let timeouts = &config.timeouts;
    if timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if timeouts.connect_secs > timeouts.request_secs {
        errors.push(ValidationError::new(
            "timeouts.connect_secs",
            "must not exceed timeouts.request_secs",
        ));
    }

    let rate_limit = &config.rate_limit;
    if rate_limit.enabled {
        if rate_limit.requests_per_second == 0 {
            errors.push(ValidationError::new(
                "rate_limit.requests_per_second",
                "must be greater than 0 when rate limiting is enabled",
            ));
        }
        if rate_limit.burst_size == 0 {
            errors.push(ValidationError::new(
                "rate_limit.burst_size",
                "must be at least 1 when rate limiting is enabled",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the whole startup file.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let server = &config.server;
    if server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("{:?} is not a socket address", server.bind_address),
        ));
    }
    if server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }
    for (field, path) in [
        ("server.config_path", &server.config_path),
        ("server.schema_path", &server.schema_path),
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field, format!("{path:?} must start with '/'")));
        }
    }
    if server.config_path.trim_end_matches('/') == server.schema_path.trim_end_matches('/') {
        errors.push(ValidationError::new(
            "server.schema_path",
            "must differ from server.config_path",
        ));
    }
    if server.max_body_bytes == 0 {
        errors.push(ValidationError::new("server.max_body_bytes", "must be greater than 0"));
    }

    check_log_level("observability.log_level", &config.observability.log_level, &mut errors);
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.reload.enabled && config.reload.poll_interval_secs == 0 {
        errors.push(ValidationError::new("reload.poll_interval_secs", "must be greater than 0"));
    }

    if let Err(runtime_errors) = validate_runtime(&config.runtime) {
        errors.extend(runtime_errors.into_iter().map(|e| e.nested("runtime")));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_log_level(field: &str, level: &str, errors: &mut Vec<ValidationError>) {
    if !LOG_LEVELS.contains(&level) {
        errors.push(ValidationError::new(
            field,
            format!("{level:?} is not one of {}", LOG_LEVELS.join(", ")),
        ));
    }
}
