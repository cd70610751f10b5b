//! Resource registry subsystem.
//!
//! # Data Flow
//! ```text
//! defaults.rs (built-in resources) ─┐
//! config resources (validated) ─────┼→ store.rs (ResourceRegistry)
//!                                    │     → resolver looks up by name
//! config reload ─────────────────────┘     → prewarmer iterates all names
//! ```
//!
//! # Design Decisions
//! - Definitions are immutable once registered; replacement is whole-value
//! - Candidates are kept sorted by priority
//! - Validation happens at construction, so the registry never holds an
//!   invalid resource

pub mod defaults;
pub mod resource;
pub mod store;

pub use resource::{CdnCandidate, CdnResource, HealthCheckStrategy};
pub use store::ResourceRegistry;
