//! Consumer context for page components.
//!
//! Pages read their prefetched state here and may ask for a refresh. They
//! never write the cache or navigation state directly.

use std::sync::Arc;

use crate::navigation::controller::{NavigationController, RefreshOutcome};
use crate::navigation::state::Location;
use crate::prefetch::CachedPage;

/// Read handle given to rendered pages.
#[derive(Clone)]
pub struct PageContext {
    controller: NavigationController,
}

impl PageContext {
    pub(crate) fn new(controller: NavigationController) -> Self {
        Self { controller }
    }

    /// Cached state for an exact request path, or `None` if nothing has
    /// been loaded for it (render nothing in that case).
    pub fn cached_result(&self, path: &str) -> Option<Arc<CachedPage>> {
        self.controller.cache().get(path)
    }

    /// Cached state for the displayed location.
    pub fn displayed_result(&self) -> Option<Arc<CachedPage>> {
        let location = self.controller.displayed_location()?;
        self.cached_result(&location.request_path())
    }

    pub fn displayed_location(&self) -> Option<Location> {
        self.controller.displayed_location()
    }

    /// Changes whenever a refresh replaced cached state.
    pub fn version(&self) -> u64 {
        self.controller.version()
    }

    /// See [`NavigationController::refresh`].
    pub async fn refresh(&self, path: Option<&str>) -> RefreshOutcome {
        self.controller.refresh(path).await
    }
}
