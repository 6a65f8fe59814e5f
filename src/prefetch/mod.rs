//! Prefetch cache subsystem.
//!
//! # Data Flow
//! ```text
//! Successful load (controller only)
//!     → cache.rs insert(request path, CachedPage)
//!
//! Page components (read only)
//!     → PageContext::cached_result(path)
//!     → cache.rs get(path)
//! ```
//!
//! # Design Decisions
//! - Keyed by exact request path (pathname + query string)
//! - Atomic whole-entry replacement, no partial writes
//! - No expiry; bounded by distinct paths visited while mounted

pub mod cache;

pub use cache::{CachedPage, PrefetchCache};
