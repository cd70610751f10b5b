//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver needs a verdict for (resource, candidate):
//!     → cache.rs (fresh verdict? use it)
//!     → checker.rs (deadline-bounded check, retries inside the deadline)
//!         → probe.rs (HEAD/GET against base_url + probe_path)
//!     → cache.rs (write the verdict back)
//! ```
//!
//! # Design Decisions
//! - Verdicts are per resource, not per mirror host
//! - A probe failure is a `false` verdict, never an error
//! - Staleness is decided on read; nothing is evicted in the background

pub mod cache;
pub mod checker;
pub mod probe;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{HealthCache, HealthSnapshot};
pub use checker::HealthChecker;
pub use probe::{HttpProbe, Probe, ProbeFailure};
