//! Navigation state.
//!
//! # States
//! ```text
//! Idle ──dispatch──▶ Loading(pending) ──settle──▶ Displayed(location)
//!                          ▲                 └──▶ Denied(denial)
//!                          └────── new location ──────┘
//! ```
//!
//! # Design Decisions
//! - One immutable snapshot, swapped atomically on every transition
//! - The previously displayed page stays in the snapshot while loading
//! - `dispatch_seq` tags every dispatch; only the latest may settle

use std::fmt;

use serde::Serialize;

/// A location as reported by the host: path, query string and fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pathname: String,
    search: String,
    hash: String,
}

impl Location {
    /// Split an href (`/path?query#hash`) into its parts.
    pub fn parse(href: &str) -> Self {
        let (rest, hash) = match href.split_once('#') {
            Some((rest, hash)) => (rest, format!("#{}", hash)),
            None => (href, String::new()),
        };
        let (pathname, search) = match rest.split_once('?') {
            Some((path, query)) => (path, format!("?{}", query)),
            None => (rest, String::new()),
        };
        let pathname = if pathname.is_empty() { "/" } else { pathname };

        Self {
            pathname: pathname.to_string(),
            search,
            hash,
        }
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Query string including the leading `?`, or empty.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Fragment including the leading `#`, or empty.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Path used as the prefetch cache key: pathname plus query string.
    pub fn request_path(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }
}

impl From<&str> for Location {
    fn from(href: &str) -> Self {
        Self::parse(href)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Which kind of unsuccessful load produced a denial view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// Authorization failure.
    Denied,
    /// Any other failure (server error, bad body, network error).
    Failed,
}

/// Message shown in place of the routed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
    pub status: Option<u16>,
}

/// Navigation state for one mounted controller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavigationSnapshot {
    /// Location currently rendered; `None` before the first commit.
    pub displayed: Option<Location>,
    /// Most recently requested location.
    pub pending: Option<Location>,
    /// A load for `pending` is in flight.
    pub loading: bool,
    /// Present iff the most recently settled load was denied or failed.
    pub denial: Option<Denial>,
    /// Bumped by each successful refresh.
    pub version: u64,
    #[serde(skip)]
    pub(crate) dispatch_seq: u64,
}

/// The state machine's current state, derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<'a> {
    Idle,
    Loading(&'a Location),
    Displayed(&'a Location),
    Denied(&'a Denial),
}

impl NavigationSnapshot {
    pub fn phase(&self) -> Phase<'_> {
        if let (true, Some(pending)) = (self.loading, &self.pending) {
            return Phase::Loading(pending);
        }
        if let Some(denial) = &self.denial {
            return Phase::Denied(denial);
        }
        match &self.displayed {
            Some(location) => Phase::Displayed(location),
            None => Phase::Idle,
        }
    }

    /// Message of the current denial view, for either kind.
    pub fn denied_message(&self) -> Option<&str> {
        self.denial.as_ref().map(|d| d.message.as_str())
    }
}
