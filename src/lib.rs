//! Plant tracker navigation controller.
//!
//! Prefetches the state a page needs before switching the displayed
//! location, so a page never renders stale or empty content.

pub mod config;
pub mod loader;
pub mod navigation;
pub mod observability;
pub mod prefetch;
pub mod routing;

pub use config::NavigatorConfig;
pub use loader::{HttpLoader, LoadResult, PageLoader};
pub use navigation::{Location, NavigationController, PageContext};
