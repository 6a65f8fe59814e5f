//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the navigator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the navigation controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Backend connection settings.
    pub backend: BackendConfig,

    /// Backend endpoints queried for each prefetched route.
    pub endpoints: EndpointConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL every endpoint path is joined onto (e.g., "http://127.0.0.1:8000").
    pub base_url: String,

    /// Transport timeout for a single page-state request, in seconds.
    pub timeout_secs: u64,

    /// Honour HTTP(S)_PROXY environment variables.
    pub use_env_proxy: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
            use_env_proxy: true,
        }
    }
}

/// Endpoint paths, one per route key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Overview page state.
    pub overview: String,

    /// Archived overview page state.
    pub archived_overview: String,

    /// Resolve/manage state for an identifier. Must contain `{id}`.
    pub resolve_manage: String,

    /// Current user details (profile page).
    pub user_details: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            overview: "/get_overview_state".to_string(),
            archived_overview: "/get_archived_overview_state".to_string(),
            resolve_manage: "/resolve_manage/{id}".to_string(),
            user_details: "/accounts/get_user_details/".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
