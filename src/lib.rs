//! CDN failover resolver library.
//!
//! Picks, for a named resource mirrored on several CDNs, the base URL a
//! caller should use right now: fresh cached verdicts first, otherwise a
//! concurrent probe of every unknown mirror, lowest priority wins, and the
//! priority-1 mirror when nothing answers.

pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod prewarm;
pub mod registry;
pub mod resilience;
pub mod resolver;
pub mod well_known;

pub use config::schema::ResolverConfig;
pub use error::{ResolveError, ResourceError};
pub use lifecycle::Shutdown;
pub use prewarm::Prewarmer;
pub use registry::{CdnCandidate, CdnResource, HealthCheckStrategy, ResourceRegistry};
pub use resolver::{Resolution, Resolver};
