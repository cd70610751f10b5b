//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every resource validated)
//!     → ResolverConfig (validated, immutable)
//!     → lifecycle::startup builds the registry, cache and checker
//!
//! On file change:
//!     watcher.rs detects change, waits for the burst to settle
//!     → loader.rs loads + validates
//!     → new config sent over a channel
//!     → lifecycle::reload swaps registry contents, clears the health cache
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no file at all means built-in resources only
//! - Invalid reloads are logged and dropped

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CacheConfig, CandidateConfig, ObservabilityConfig, PrewarmConfig, ProbeConfig, ResolverConfig,
    ResourceConfig,
};
