//! Resolution subsystem.
//!
//! # Data Flow
//! ```text
//! resolve(name, suffix)
//!     → registry lookup (UnknownResource if missing)
//!     → sort candidates by priority
//!     → partition by cache: healthy / unhealthy / unknown
//!     → any cached-healthy? return the best one (no network)
//!     → else probe all unknown concurrently, join, cache each verdict
//!     → best fresh success, or priority 1 in degraded mode
//!     → base_url + suffix
//! ```
//!
//! # Design Decisions
//! - The decision waits for every probe (a join, not a race), so a fast
//!   low-preference mirror never beats a slower preferred one
//! - Concurrent first calls may probe the same candidates twice; verdicts
//!   converge through the cache
//! - CDN failures never surface as errors

pub mod engine;

pub use engine::{Resolution, Resolver};
