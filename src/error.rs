//! Error taxonomy for the resolver.
//!
//! Only configuration errors cross the public boundary. Network-level
//! conditions (timeouts, error statuses, DNS failures, total outages) are
//! absorbed by the checker and the degraded-resolution path.

use thiserror::Error;

/// Errors returned by `Resolver::resolve` and the well-known wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The resource name was never registered.
    #[error("unknown CDN resource: {0}")]
    UnknownResource(String),
}

/// Result type for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Reasons a resource definition is rejected before registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("resource name must not be empty")]
    EmptyName,

    #[error("resource '{0}' has no candidates")]
    NoCandidates(String),

    #[error("resource '{resource}': candidate '{candidate}' has priority 0 (priorities start at 1)")]
    ZeroPriority { resource: String, candidate: String },

    #[error("resource '{resource}': priority {priority} is used by more than one candidate")]
    DuplicatePriority { resource: String, priority: u32 },

    #[error("resource '{0}' has no priority-1 candidate")]
    MissingPrimary(String),

    #[error("resource '{resource}': invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        resource: String,
        url: String,
        reason: String,
    },

    #[error("resource '{resource}': probe path '{path}' must start with '/'")]
    InvalidProbePath { resource: String, path: String },

    #[error("resource '{0}' has a zero check timeout")]
    ZeroTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResolveError::UnknownResource("does-not-exist".into());
        assert_eq!(err.to_string(), "unknown CDN resource: does-not-exist");

        let err = ResourceError::DuplicatePriority {
            resource: "editor-engine".into(),
            priority: 2,
        };
        assert!(err.to_string().contains("priority 2"));
    }
}
