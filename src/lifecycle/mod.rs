//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build registry, cache, checker → Resolver
//!
//! Reload (reload.rs):
//!     Validated config from the watcher → swap registry → clear cache → prewarm
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → background loops exit → drain with grace
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger graceful shutdown
//! ```

pub mod reload;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use reload::apply_config;
pub use shutdown::Shutdown;
pub use startup::{build_resolver, StartupError};
