//! Page data loading subsystem.
//!
//! # Data Flow
//! ```text
//! RouteDescriptor (key + params)
//!     → http.rs (endpoint lookup, GET with Accept: application/json)
//!     → classify.rs (Redirected | Denied | Failed | Success)
//!     → preload.rs (page module for the destination, bounded wait)
//!     → Return: LoadResult
//! ```
//!
//! # Design Decisions
//! - `PageLoader` is the seam the navigation controller depends on
//! - Exactly one `LoadResult` variant per completed load
//! - Transport failures surface as `LoadError`; the controller folds them
//!   into `LoadResult::Failed`

use std::future::Future;

use futures_util::future::BoxFuture;

use crate::routing::RouteDescriptor;

pub mod classify;
pub mod http;
pub mod preload;
pub mod types;

pub use classify::{classify, FetchedResponse};
pub use http::HttpLoader;
pub use preload::{ModulePreloader, NoopPreloader};
pub use types::{LoadError, LoadResult, PageModule};

/// Fetches the state a page needs before it is displayed.
pub trait PageLoader: Send + Sync {
    fn load<'a>(
        &'a self,
        route: &'a RouteDescriptor,
    ) -> BoxFuture<'a, Result<LoadResult, LoadError>>;
}

/// Adapts an async closure into a [`PageLoader`].
pub struct FnLoader<F>(pub F);

impl<F, Fut> PageLoader for FnLoader<F>
where
    F: Fn(RouteDescriptor) -> Fut + Send + Sync,
    Fut: Future<Output = Result<LoadResult, LoadError>> + Send + 'static,
{
    fn load<'a>(
        &'a self,
        route: &'a RouteDescriptor,
    ) -> BoxFuture<'a, Result<LoadResult, LoadError>> {
        Box::pin((self.0)(route.clone()))
    }
}
