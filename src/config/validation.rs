//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (TTL and timeouts > 0, metrics address parses)
//! - Validate every resource definition and reject duplicate names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: ResolverConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::ResolverConfig;
use crate::error::ResourceError;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cache.ttl_ms must be greater than zero")]
    ZeroTtl,

    #[error("probe.default_timeout_ms must be greater than zero")]
    ZeroDefaultTimeout,

    #[error("probe.retry_base_delay_ms ({base}) exceeds probe.retry_max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("resource '{0}' is defined more than once")]
    DuplicateResource(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Check a parsed configuration.
pub fn validate_config(config: &ResolverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.cache.ttl_ms == 0 {
        errors.push(ValidationError::ZeroTtl);
    }
    if config.probe.default_timeout_ms == 0 {
        errors.push(ValidationError::ZeroDefaultTimeout);
    }
    if config.probe.retry_base_delay_ms > config.probe.retry_max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: config.probe.retry_base_delay_ms,
            max: config.probe.retry_max_delay_ms,
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let default_timeout = Duration::from_millis(config.probe.default_timeout_ms.max(1));
    let mut names = HashSet::new();
    for resource in &config.resources {
        if !names.insert(resource.name.as_str()) {
            errors.push(ValidationError::DuplicateResource(resource.name.clone()));
        }
        if let Err(e) = resource.to_resource(default_timeout) {
            errors.push(e.into());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CandidateConfig, ResourceConfig};
    use crate::registry::HealthCheckStrategy;

    fn resource(name: &str, priorities: &[u32]) -> ResourceConfig {
        ResourceConfig {
            name: name.into(),
            probe_path: "/lib.js".into(),
            check_timeout_ms: None,
            strategy: HealthCheckStrategy::Head,
            candidates: priorities
                .iter()
                .map(|p| CandidateConfig {
                    name: format!("c{}", p),
                    base_url: format!("https://c{}.example.com", p),
                    priority: *p,
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ResolverConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ResolverConfig::default();
        config.cache.ttl_ms = 0;
        config.probe.default_timeout_ms = 0;
        config.resources.push(resource("lib", &[1, 2]));
        config.resources.push(resource("lib", &[1, 2]));
        config.resources.push(resource("bad", &[2, 3]));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTtl));
        assert!(errors.contains(&ValidationError::ZeroDefaultTimeout));
        assert!(errors.contains(&ValidationError::DuplicateResource("lib".into())));
        assert!(errors.contains(&ValidationError::Resource(ResourceError::MissingPrimary(
            "bad".into()
        ))));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ResolverConfig::default();
        config.observability.metrics_address = "not-an-address".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::MetricsAddress("not-an-address".into())]
        );
    }

    #[test]
    fn test_backoff_range() {
        let mut config = ResolverConfig::default();
        config.probe.retry_base_delay_ms = 2_000;
        assert!(matches!(
            validate_config(&config).unwrap_err()[0],
            ValidationError::BackoffRange { base: 2_000, max: 1_000 }
        ));
    }
}
