//! Host environment abstraction.
//!
//! The controller never touches the document directly; it asks the host to
//! change the title or to leave the application with a full navigation.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Side effects the controller performs on its host.
pub trait Host: Send + Sync {
    /// Set the document title.
    fn set_title(&self, title: &str);

    /// Leave the application: full (non-SPA) navigation to `url`.
    fn navigate_full(&self, url: &str);
}

/// Host without a document; records the last title and redirect.
#[derive(Debug)]
pub struct HeadlessHost {
    title: ArcSwapOption<String>,
    redirect: ArcSwapOption<String>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            title: ArcSwapOption::empty(),
            redirect: ArcSwapOption::empty(),
        }
    }

    /// Last title set.
    pub fn title(&self) -> Option<String> {
        self.title.load_full().map(|t| t.as_ref().clone())
    }

    /// Target of the last full navigation.
    pub fn redirected_to(&self) -> Option<String> {
        self.redirect.load_full().map(|r| r.as_ref().clone())
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for HeadlessHost {
    fn set_title(&self, title: &str) {
        tracing::debug!(title, "Document title changed");
        self.title.store(Some(Arc::new(title.to_string())));
    }

    fn navigate_full(&self, url: &str) {
        tracing::info!(url, "Full navigation requested");
        self.redirect.store(Some(Arc::new(url.to_string())));
    }
}
