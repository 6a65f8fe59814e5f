//! Prefetched page-state cache.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::loader::types::{PageModule, PAGE_FIELD};
use crate::observability::metrics;
use crate::routing::{RouteDescriptor, RouteKey};

/// The last successful load of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPage {
    /// Route the path resolved to.
    pub route: RouteDescriptor,
    /// Parsed response body.
    pub data: Value,
    /// HTTP status of the response.
    pub status: u16,
}

impl CachedPage {
    /// Page module that renders this entry.
    pub fn page_module(&self) -> Option<PageModule> {
        match self.route.key? {
            RouteKey::Manage => self
                .data
                .get(PAGE_FIELD)
                .and_then(Value::as_str)
                .and_then(PageModule::from_discriminator),
            key => PageModule::for_route(key),
        }
    }
}

/// A thread-safe map of request path -> last successful load.
///
/// Entries are replaced whole, so a reader sees either the old or the new
/// value. Entries never expire; the cache lives as long as its controller.
#[derive(Clone, Default)]
pub struct PrefetchCache {
    inner: Arc<DashMap<String, Arc<CachedPage>>>,
}

impl PrefetchCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the result for `path`, replacing any previous entry.
    pub fn insert(&self, path: impl Into<String>, page: CachedPage) -> Arc<CachedPage> {
        let page = Arc::new(page);
        self.inner.insert(path.into(), page.clone());
        metrics::record_cache_size(self.inner.len());
        page
    }

    /// Get the entry for an exact request path.
    pub fn get(&self, path: &str) -> Option<Arc<CachedPage>> {
        self.inner.get(path).map(|r| r.value().clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Cached paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.inner.iter().map(|r| r.key().clone()).collect();
        paths.sort();
        paths
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.clear();
        metrics::record_cache_size(0);
    }
}
