//! Code-module preloading.
//!
//! # Responsibilities
//! - Abstract "load the code a page needs" behind a trait
//! - Run preloads in their own tasks
//! - Bound the wait on a preload so it never outlasts the data fetch
//!
//! # Design Decisions
//! - Preload failures are the preloader's concern; the trait returns `()`
//! - A preload that outlives its bound keeps running in a detached task

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{self, BoxFuture};
use tokio::task::JoinHandle;

use crate::loader::types::PageModule;

/// Loads the code module needed to render a page.
pub trait ModulePreloader: Send + Sync {
    fn preload(&self, module: PageModule) -> BoxFuture<'static, ()>;
}

/// Preloader for hosts where page code is always resident.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPreloader;

impl ModulePreloader for NoopPreloader {
    fn preload(&self, module: PageModule) -> BoxFuture<'static, ()> {
        tracing::trace!(module = module.as_str(), "Page module already resident");
        Box::pin(future::ready(()))
    }
}

/// A preload running in its own task.
#[derive(Debug)]
pub struct PreloadTask {
    module: PageModule,
    handle: JoinHandle<()>,
}

impl PreloadTask {
    /// Start preloading `module` in the background.
    pub fn start(preloader: &Arc<dyn ModulePreloader>, module: PageModule) -> Self {
        Self {
            module,
            handle: tokio::spawn(preloader.preload(module)),
        }
    }

    /// Wait at most `bound` for the preload to finish.
    ///
    /// Returns true if it finished within the bound.
    pub async fn wait(self, bound: Duration) -> bool {
        match tokio::time::timeout(bound, self.handle).await {
            Ok(_) => true,
            Err(_) => {
                tracing::debug!(
                    module = self.module.as_str(),
                    bound_ms = bound.as_millis() as u64,
                    "Preload still running, continuing without it"
                );
                false
            }
        }
    }
}

/// Preload `module`, waiting at most `bound` before returning.
pub async fn preload_bounded(
    preloader: &Arc<dyn ModulePreloader>,
    module: PageModule,
    bound: Duration,
) -> bool {
    PreloadTask::start(preloader, module).wait(bound).await
}
