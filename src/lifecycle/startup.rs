//! Startup wiring.
//!
//! # Responsibilities
//! - Build the probe transport from configuration
//! - Populate the registry (built-in resources, then configured ones)
//! - Assemble the resolver that owns the health cache
//!
//! # Design Decisions
//! - Fail fast: a client that cannot be built or an invalid resource is fatal
//! - Configured resources replace built-in ones with the same name

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, ResolverConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::health::{HealthCache, HealthChecker, HttpProbe};
use crate::registry::{CdnResource, ResourceRegistry};
use crate::resilience::backoff::Backoff;
use crate::resolver::Resolver;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Validated resource list for a configuration.
pub fn resources_from_config(config: &ResolverConfig) -> Result<Vec<CdnResource>, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let default_timeout = Duration::from_millis(config.probe.default_timeout_ms);
    let mut resources = if config.include_defaults {
        crate::registry::defaults::default_resources()
            .into_iter()
            .map(|r| r.with_check_timeout(default_timeout))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::Validation(vec![ValidationError::from(e)]))?
    } else {
        Vec::new()
    };

    for resource_config in &config.resources {
        let resource = resource_config
            .to_resource(default_timeout)
            .map_err(|e| ConfigError::Validation(vec![ValidationError::from(e)]))?;
        resources.retain(|r| r.name() != resource.name());
        resources.push(resource);
    }
    Ok(resources)
}

/// Build a resolver backed by real HTTP probes.
pub fn build_resolver(config: &ResolverConfig) -> Result<Arc<Resolver<HttpProbe>>, StartupError> {
    let registry = Arc::new(ResourceRegistry::new());
    for resource in resources_from_config(config)? {
        registry.register(resource);
    }

    let probe = HttpProbe::with_user_agent(&config.probe.user_agent)?;
    let checker = HealthChecker::new(probe).with_retries(
        config.probe.retries,
        Backoff::new(
            Duration::from_millis(config.probe.retry_base_delay_ms),
            Duration::from_millis(config.probe.retry_max_delay_ms),
        ),
    );
    let cache = HealthCache::new(config.cache.ttl());

    tracing::info!(
        resources = registry.len(),
        ttl_ms = config.cache.ttl_ms,
        retries = config.probe.retries,
        "Resolver initialized"
    );
    Ok(Arc::new(Resolver::new(registry, cache, checker)))
}
