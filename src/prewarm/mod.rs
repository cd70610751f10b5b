//! Prewarming subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     pre_check_all → resolve() per resource (concurrent)
//!         → health cache populated before real demand
//!
//! Background (optional):
//!     interval tick → refresh() per resource (concurrent)
//!         → every candidate re-probed, verdicts rewritten
//! ```

pub mod warmer;

pub use warmer::{PrewarmReport, Prewarmer};
