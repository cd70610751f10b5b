//! CDN resource and candidate definitions.
//!
//! # Responsibilities
//! - Represent a single CDN mirror (candidate) for a resource
//! - Validate resource definitions before they reach the registry
//! - Keep candidates sorted by priority

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ResourceError;

/// Default per-candidate probe timeout.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_millis(5_000);

/// How a candidate's reachability is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCheckStrategy {
    /// HEAD request, no body transferred.
    #[default]
    Head,
    /// GET request with the body dropped unread. For mirrors that reject HEAD.
    Get,
}

/// A single CDN mirror for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CdnCandidate {
    /// Human-readable label (e.g. "jsdelivr").
    pub name: String,
    /// Root URL of the mirror, without a trailing slash.
    pub base_url: String,
    /// Preference order, 1 is most preferred.
    pub priority: u32,
}

impl CdnCandidate {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            priority,
        }
    }

    /// Exact URL probed for this candidate.
    pub fn probe_url(&self, probe_path: &str) -> String {
        format!("{}{}", self.base_url, probe_path)
    }
}

/// A resource delivered redundantly through several CDN mirrors.
///
/// Immutable once built. Candidates are always held in ascending priority
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnResource {
    name: String,
    candidates: Vec<CdnCandidate>,
    probe_path: String,
    check_timeout: Duration,
    strategy: HealthCheckStrategy,
}

impl CdnResource {
    /// Build and validate a resource definition.
    pub fn new(
        name: impl Into<String>,
        probe_path: impl Into<String>,
        candidates: Vec<CdnCandidate>,
    ) -> Result<Self, ResourceError> {
        let resource = Self::from_parts(name.into(), probe_path.into(), candidates);
        resource.validate()?;
        Ok(resource)
    }

    /// Built-in definitions skip `new` so construction is infallible; a unit
    /// test validates them instead.
    pub(crate) fn from_parts(
        name: String,
        probe_path: String,
        mut candidates: Vec<CdnCandidate>,
    ) -> Self {
        candidates.sort_by_key(|c| c.priority);
        Self {
            name,
            candidates,
            probe_path,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            strategy: HealthCheckStrategy::default(),
        }
    }

    /// Override the per-candidate probe timeout.
    pub fn with_check_timeout(mut self, timeout: Duration) -> Result<Self, ResourceError> {
        if timeout.is_zero() {
            return Err(ResourceError::ZeroTimeout(self.name));
        }
        self.check_timeout = timeout;
        Ok(self)
    }

    /// Override the probe strategy.
    pub fn with_strategy(mut self, strategy: HealthCheckStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidates in ascending priority order.
    pub fn candidates(&self) -> &[CdnCandidate] {
        &self.candidates
    }

    pub fn probe_path(&self) -> &str {
        &self.probe_path
    }

    pub fn check_timeout(&self) -> Duration {
        self.check_timeout
    }

    pub fn strategy(&self) -> HealthCheckStrategy {
        self.strategy
    }

    /// The priority-1 candidate, used for degraded resolution.
    pub fn primary(&self) -> Option<&CdnCandidate> {
        self.candidates.iter().find(|c| c.priority == 1)
    }

    /// Check every structural invariant, reporting the first violation.
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.name.trim().is_empty() {
            return Err(ResourceError::EmptyName);
        }
        if self.candidates.is_empty() {
            return Err(ResourceError::NoCandidates(self.name.clone()));
        }
        if !self.probe_path.starts_with('/') {
            return Err(ResourceError::InvalidProbePath {
                resource: self.name.clone(),
                path: self.probe_path.clone(),
            });
        }
        if self.check_timeout.is_zero() {
            return Err(ResourceError::ZeroTimeout(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for candidate in &self.candidates {
            if candidate.priority == 0 {
                return Err(ResourceError::ZeroPriority {
                    resource: self.name.clone(),
                    candidate: candidate.name.clone(),
                });
            }
            if !seen.insert(candidate.priority) {
                return Err(ResourceError::DuplicatePriority {
                    resource: self.name.clone(),
                    priority: candidate.priority,
                });
            }
            validate_base_url(&self.name, &candidate.base_url)?;
        }

        if !seen.contains(&1) {
            return Err(ResourceError::MissingPrimary(self.name.clone()));
        }
        Ok(())
    }
}

fn validate_base_url(resource: &str, base_url: &str) -> Result<(), ResourceError> {
    let invalid = |reason: &str| ResourceError::InvalidBaseUrl {
        resource: resource.to_string(),
        url: base_url.to_string(),
        reason: reason.to_string(),
    };

    if base_url.ends_with('/') {
        return Err(invalid("trailing slash"));
    }
    let url = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(&format!("unsupported scheme '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<CdnCandidate> {
        vec![
            CdnCandidate::new("c", "https://c.example.com", 3),
            CdnCandidate::new("a", "https://a.example.com", 1),
            CdnCandidate::new("b", "https://b.example.com/npm", 2),
        ]
    }

    #[test]
    fn test_candidates_sorted_by_priority() {
        let resource = CdnResource::new("lib", "/lib.js", candidates()).unwrap();
        let order: Vec<u32> = resource.candidates().iter().map(|c| c.priority).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(resource.primary().unwrap().name, "a");
        assert_eq!(resource.check_timeout(), DEFAULT_CHECK_TIMEOUT);
        assert_eq!(resource.strategy(), HealthCheckStrategy::Head);
    }

    #[test]
    fn test_probe_url() {
        let c = CdnCandidate::new("b", "https://b.example.com/npm", 2);
        assert_eq!(c.probe_url("/pkg@1.0.0/index.js"), "https://b.example.com/npm/pkg@1.0.0/index.js");
    }

    #[test]
    fn test_rejects_duplicate_priority() {
        let mut list = candidates();
        list.push(CdnCandidate::new("d", "https://d.example.com", 2));
        let err = CdnResource::new("lib", "/lib.js", list).unwrap_err();
        assert_eq!(
            err,
            ResourceError::DuplicatePriority { resource: "lib".into(), priority: 2 }
        );
    }

    #[test]
    fn test_rejects_missing_primary() {
        let list = vec![
            CdnCandidate::new("b", "https://b.example.com", 2),
            CdnCandidate::new("c", "https://c.example.com", 3),
        ];
        let err = CdnResource::new("lib", "/lib.js", list).unwrap_err();
        assert_eq!(err, ResourceError::MissingPrimary("lib".into()));
    }

    #[test]
    fn test_rejects_bad_urls_and_paths() {
        let list = vec![CdnCandidate::new("a", "https://a.example.com/", 1)];
        assert!(matches!(
            CdnResource::new("lib", "/lib.js", list),
            Err(ResourceError::InvalidBaseUrl { .. })
        ));

        let list = vec![CdnCandidate::new("a", "ftp://a.example.com", 1)];
        assert!(matches!(
            CdnResource::new("lib", "/lib.js", list),
            Err(ResourceError::InvalidBaseUrl { .. })
        ));

        assert!(matches!(
            CdnResource::new("lib", "lib.js", candidates()),
            Err(ResourceError::InvalidProbePath { .. })
        ));

        assert_eq!(
            CdnResource::new("  ", "/lib.js", candidates()).unwrap_err(),
            ResourceError::EmptyName
        );
        assert_eq!(
            CdnResource::new("lib", "/lib.js", Vec::new()).unwrap_err(),
            ResourceError::NoCandidates("lib".into())
        );
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let resource = CdnResource::new("lib", "/lib.js", candidates()).unwrap();
        assert_eq!(
            resource.with_check_timeout(Duration::ZERO).unwrap_err(),
            ResourceError::ZeroTimeout("lib".into())
        );
    }

    #[test]
    fn test_strategy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: HealthCheckStrategy,
        }
        let w: Wrapper = toml::from_str("strategy = \"get\"").unwrap();
        assert_eq!(w.strategy, HealthCheckStrategy::Get);
    }
}
