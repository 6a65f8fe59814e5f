//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! Host location change
//!     → controller.rs location_changed (ignore same-path changes)
//!     → routing::match_route
//!         key = None → commit immediately
//!         key = Some → loader::PageLoader::load
//!     → settle (only if still the latest dispatch):
//!         Success    → prefetch cache write, commit, title
//!         Denied     → denial view, displayed location unchanged
//!         Failed     → denial view (kind = Failed)
//!         Redirected → host full navigation
//!
//! Page components
//!     → context.rs PageContext (cached_result, refresh, version)
//! ```
//!
//! # Design Decisions
//! - State lives in one atomically swapped snapshot (state.rs)
//! - Host side effects go through the `Host` trait (host.rs)

pub mod context;
pub mod controller;
pub mod host;
pub mod state;

pub use context::PageContext;
pub use controller::{NavigationController, RefreshOutcome, TransitionOutcome};
pub use host::{HeadlessHost, Host};
pub use state::{Denial, DenialKind, Location, NavigationSnapshot, Phase};
