//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the backend base URL and endpoint shapes
//! - Validate value ranges (timeouts > 0, metrics address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NavigatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::NavigatorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.base_url {0:?} is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("backend.base_url must use http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("backend.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("endpoints.{name} must start with '/', got {value:?}")]
    RelativeEndpoint { name: &'static str, value: String },

    #[error("endpoints.resolve_manage must contain the {{id}} placeholder")]
    MissingIdPlaceholder,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &NavigatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.backend.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidBaseUrl(config.backend.base_url.clone())),
    }

    if config.backend.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let endpoints = &config.endpoints;
    for (name, value) in [
        ("overview", &endpoints.overview),
        ("archived_overview", &endpoints.archived_overview),
        ("resolve_manage", &endpoints.resolve_manage),
        ("user_details", &endpoints.user_details),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativeEndpoint {
                name,
                value: value.clone(),
            });
        }
    }

    if !endpoints.resolve_manage.contains("{id}") {
        errors.push(ValidationError::MissingIdPlaceholder);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
