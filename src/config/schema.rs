//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML. Every field
//! has a default so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::registry::{CdnCandidate, CdnResource, HealthCheckStrategy};

/// Root configuration for the resolver.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Register the built-in resources before the configured ones.
    pub include_defaults: bool,

    /// Health cache settings.
    pub cache: CacheConfig,

    /// Probe settings.
    pub probe: ProbeConfig,

    /// Prewarming and background refresh.
    pub prewarm: PrewarmConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Additional (or overriding) resource definitions.
    pub resources: Vec<ResourceConfig>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            cache: CacheConfig::default(),
            probe: ProbeConfig::default(),
            prewarm: PrewarmConfig::default(),
            observability: ObservabilityConfig::default(),
            resources: Vec::new(),
        }
    }
}

/// Health cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Verdict lifetime in milliseconds.
    pub ttl_ms: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_ms: 300_000 }
    }
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Timeout for resources that do not set their own, in milliseconds.
    pub default_timeout_ms: u64,

    /// Extra attempts per check, all inside the same timeout.
    pub retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub retry_max_delay_ms: u64,

    /// User-Agent sent with every probe.
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 5_000,
            retries: 0,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 1_000,
            user_agent: "cdn-failover-health-check".to_string(),
        }
    }
}

/// Prewarm configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrewarmConfig {
    /// Resolve every resource at startup.
    pub on_startup: bool,

    /// Background refresh interval in seconds (0 = disabled).
    pub refresh_interval_secs: u64,
}

impl PrewarmConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for PrewarmConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            refresh_interval_secs: 240,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A resource definition as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    /// Unique resource name.
    pub name: String,

    /// Suffix appended to each candidate's base URL to form the probe target.
    pub probe_path: String,

    /// Probe timeout in milliseconds; falls back to `probe.default_timeout_ms`.
    #[serde(default)]
    pub check_timeout_ms: Option<u64>,

    /// Probe method.
    #[serde(default)]
    pub strategy: HealthCheckStrategy,

    /// Mirrors, in any order.
    pub candidates: Vec<CandidateConfig>,
}

/// A mirror definition as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CandidateConfig {
    pub name: String,
    pub base_url: String,
    pub priority: u32,
}

impl ResourceConfig {
    /// Convert into a validated resource.
    pub fn to_resource(&self, default_timeout: Duration) -> Result<CdnResource, ResourceError> {
        let candidates = self
            .candidates
            .iter()
            .map(|c| CdnCandidate::new(c.name.clone(), c.base_url.clone(), c.priority))
            .collect();
        let timeout = self
            .check_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(default_timeout);

        CdnResource::new(self.name.clone(), self.probe_path.clone(), candidates)?
            .with_check_timeout(timeout)
            .map(|r| r.with_strategy(self.strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ResolverConfig = toml::from_str("").unwrap();
        assert!(config.include_defaults);
        assert_eq!(config.cache.ttl(), Duration::from_millis(300_000));
        assert_eq!(config.probe.default_timeout_ms, 5_000);
        assert_eq!(config.probe.retries, 0);
        assert!(config.prewarm.on_startup);
        assert!(config.resources.is_empty());
    }

    #[test]
    fn test_parse_resource() {
        let config: ResolverConfig = toml::from_str(
            r#"
            [[resources]]
            name = "editor-engine"
            probe_path = "/monaco-editor@0.52.2/min/vs/loader.js"
            strategy = "get"

            [[resources.candidates]]
            name = "backup"
            base_url = "https://unpkg.com"
            priority = 2

            [[resources.candidates]]
            name = "primary"
            base_url = "https://cdn.jsdelivr.net/npm"
            priority = 1
            "#,
        )
        .unwrap();

        let resource = config.resources[0]
            .to_resource(Duration::from_millis(config.probe.default_timeout_ms))
            .unwrap();
        assert_eq!(resource.primary().unwrap().name, "primary");
        assert_eq!(resource.strategy(), HealthCheckStrategy::Get);
        assert_eq!(resource.check_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_resource_timeout_override() {
        let resource = ResourceConfig {
            name: "lib".into(),
            probe_path: "/lib.js".into(),
            check_timeout_ms: Some(750),
            strategy: HealthCheckStrategy::Head,
            candidates: vec![CandidateConfig {
                name: "a".into(),
                base_url: "https://a.example.com".into(),
                priority: 1,
            }],
        };
        let built = resource.to_resource(Duration::from_secs(5)).unwrap();
        assert_eq!(built.check_timeout(), Duration::from_millis(750));
    }
}
