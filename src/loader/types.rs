//! Load result and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::routing::RouteKey;

/// Outcome of one completed page-state load.
///
/// Exactly one case is populated per completed load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadResult {
    /// The backend returned the page state.
    Success { data: Value, status: u16 },
    /// Authorization failure for a protected view.
    Denied { message: String, status: u16 },
    /// The backend sent the client elsewhere; requires a full navigation.
    Redirected { target_url: String },
    /// Any other non-success outcome, including unparseable bodies and
    /// transport errors (which carry no status).
    Failed { message: String, status: Option<u16> },
}

impl LoadResult {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            LoadResult::Success { .. } => "success",
            LoadResult::Denied { .. } => "denied",
            LoadResult::Redirected { .. } => "redirected",
            LoadResult::Failed { .. } => "failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoadResult::Success { .. })
    }

    /// Fold a loader error into a `Failed` result.
    pub fn from_error(err: &LoadError) -> Self {
        LoadResult::Failed {
            message: err.to_string(),
            status: None,
        }
    }
}

/// Errors a loader may raise instead of producing a result.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Connection, TLS, timeout or body read failure.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint for a route could not be turned into a URL.
    #[error("Invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The route has no loader (non-prefetched routes never reach a loader).
    #[error("No loader for route")]
    Unroutable,

    /// The route is missing a parameter its endpoint needs.
    #[error("Route {route} is missing parameter {param:?}")]
    MissingParam { route: RouteKey, param: &'static str },
}

/// Code module a page needs before it can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageModule {
    Overview,
    Archive,
    Profile,
    ManagePlant,
    ManageGroup,
    Register,
}

impl PageModule {
    /// Module for a fixed route. `Manage` depends on the payload.
    pub fn for_route(key: RouteKey) -> Option<Self> {
        match key {
            RouteKey::Overview => Some(PageModule::Overview),
            RouteKey::Archive => Some(PageModule::Archive),
            RouteKey::Profile => Some(PageModule::Profile),
            RouteKey::Manage => None,
        }
    }

    /// Module selected by the `page` discriminator of a resolve payload.
    pub fn from_discriminator(page: &str) -> Option<Self> {
        match page {
            "plant" => Some(PageModule::ManagePlant),
            "group" => Some(PageModule::ManageGroup),
            "register" => Some(PageModule::Register),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageModule::Overview => "overview",
            PageModule::Archive => "archive",
            PageModule::Profile => "profile",
            PageModule::ManagePlant => "manage_plant",
            PageModule::ManageGroup => "manage_group",
            PageModule::Register => "register",
        }
    }
}

/// Payload field carrying the manage sub-page discriminator.
pub const PAGE_FIELD: &str = "page";

/// Payload field carrying the document title.
pub const TITLE_FIELD: &str = "title";
