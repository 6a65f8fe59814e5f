//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Location pathname
//!     → router.rs (ordered route table lookup)
//!     → matcher.rs (identifier shape for parameterized routes)
//!     → Return: RouteDescriptor { key: Some(..) | None, params, query }
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous, no I/O
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins (exact routes, then `/manage/<id>`, then no key)

pub mod matcher;
pub mod router;

pub use router::{match_route, RouteDescriptor, RouteKey, ID_PARAM};
