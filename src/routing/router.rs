//! Route lookup.
//!
//! # Responsibilities
//! - Own the fixed, ordered route table
//! - Resolve a path to a route descriptor with extracted parameters
//! - Return an explicit "not prefetched" descriptor for everything else
//!
//! # Design Decisions
//! - Immutable table (thread-safe without locks)
//! - Exact routes checked before the parameterized manage route
//! - Total: every path yields a descriptor, never an error

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routing::matcher::identifier_after;

/// Prefix of the parameterized manage route.
pub const MANAGE_PREFIX: &str = "/manage/";

/// Name of the identifier parameter extracted from the manage route.
pub const ID_PARAM: &str = "id";

/// Identifies which page/data-loading behavior applies to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKey {
    /// Plant and group overview (`/`).
    Overview,
    /// Archived overview (`/archived`).
    Archive,
    /// Current user's profile (`/accounts/profile/`).
    Profile,
    /// Resolve and manage an entity (`/manage/<id>`).
    Manage,
}

impl RouteKey {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKey::Overview => "overview",
            RouteKey::Archive => "archive",
            RouteKey::Profile => "profile",
            RouteKey::Manage => "manage",
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const EXACT_ROUTES: [(&str, RouteKey); 3] = [
    ("/", RouteKey::Overview),
    ("/archived", RouteKey::Archive),
    ("/accounts/profile/", RouteKey::Profile),
];

/// Result of matching a path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// `None` for paths that transition without prefetching.
    pub key: Option<RouteKey>,
    /// Parameters extracted from the path.
    pub params: BTreeMap<String, String>,
    /// Query string forwarded to the backend, without the leading `?`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl RouteDescriptor {
    /// Descriptor for a path the controller does not prefetch.
    pub fn unmatched() -> Self {
        Self::default()
    }

    fn exact(key: RouteKey) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    /// Attach a location's query string (`?a=b` or empty).
    pub fn with_query(mut self, search: &str) -> Self {
        let query = search.strip_prefix('?').unwrap_or(search);
        self.query = (!query.is_empty()).then(|| query.to_string());
        self
    }

    /// Returns true if loading this route requires a fetch.
    pub fn is_prefetched(&self) -> bool {
        self.key.is_some()
    }

    /// Get a parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Resolve a path (without query or fragment) to a route descriptor.
pub fn match_route(path: &str) -> RouteDescriptor {
    if let Some((_, key)) = EXACT_ROUTES.iter().find(|(route, _)| *route == path) {
        return RouteDescriptor::exact(*key);
    }

    if let Some(id) = identifier_after(path, MANAGE_PREFIX) {
        let mut params = BTreeMap::new();
        params.insert(ID_PARAM.to_string(), id.to_string());
        return RouteDescriptor {
            key: Some(RouteKey::Manage),
            params,
            query: None,
        };
    }

    RouteDescriptor::unmatched()
}
