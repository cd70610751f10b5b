//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe of one candidate:
//!     → timeouts.rs (deadline around the whole attempt sequence)
//!     → On failure inside the deadline: backoff.rs (jittered delay, next attempt)
//! ```
//!
//! # Design Decisions
//! - Every probe has a deadline; nothing waits on the network unbounded
//! - Retries never extend the deadline, they share it

pub mod backoff;
pub mod timeouts;
