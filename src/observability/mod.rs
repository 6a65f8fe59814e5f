//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router, loader, cache and controller produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG / config)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every navigation transition logs with structured fields
//! - Metrics are cheap (atomic increments) and off until installed

pub mod logging;
pub mod metrics;
