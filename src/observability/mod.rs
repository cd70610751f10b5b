//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! health checker, resolver, prewarmer produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (probe counters, health gauges, resolution counters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Every event carries the resource and candidate as fields
//! - Metrics are recorded through the `metrics` facade; without an installed
//!   recorder they are no-ops

pub mod logging;
pub mod metrics;
