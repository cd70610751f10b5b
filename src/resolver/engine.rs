//! Resolution engine.
//!
//! # Responsibilities
//! - Look up a resource and order its candidates by priority
//! - Serve from fresh cache verdicts when any candidate is known healthy
//! - Otherwise fan out probes to every unknown candidate and join them
//! - Pick the lowest-priority healthy candidate, or degrade to priority 1

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;

use crate::error::{ResolveError, ResolveResult};
use crate::health::{HealthCache, HealthChecker, HealthSnapshot, HttpProbe, Probe};
use crate::observability::metrics;
use crate::registry::{CdnCandidate, CdnResource, ResourceRegistry};

/// Outcome of a single resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub resource: String,
    pub candidate: String,
    pub priority: u32,
    /// Chosen base URL with the suffix (if any) appended.
    pub url: String,
    /// No candidate passed; the priority-1 candidate was returned anyway.
    pub degraded: bool,
    /// Probes issued by this call.
    pub probed: usize,
}

/// Picks the mirror a caller should use for a named resource.
///
/// One instance owns one health cache for its whole lifetime. Share it
/// through `Arc`.
#[derive(Debug)]
pub struct Resolver<P = HttpProbe> {
    registry: Arc<ResourceRegistry>,
    cache: HealthCache,
    checker: HealthChecker<P>,
}

impl<P: Probe> Resolver<P> {
    pub fn new(registry: Arc<ResourceRegistry>, cache: HealthCache, checker: HealthChecker<P>) -> Self {
        Self {
            registry,
            cache,
            checker,
        }
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &HealthCache {
        &self.cache
    }

    /// Register (or replace) a resource definition.
    pub fn register(&self, resource: CdnResource) {
        self.registry.register(resource);
    }

    /// Forget every cached verdict.
    pub fn clear_health_cache(&self) {
        self.cache.clear();
        tracing::info!("Health cache cleared");
    }

    /// Fresh cached verdicts, for diagnostics.
    pub fn health_snapshot(&self) -> Vec<HealthSnapshot> {
        self.cache.snapshot()
    }

    /// Resolve a resource to a URL.
    ///
    /// Fails only for an unregistered name; CDN-level failures fall back to
    /// the priority-1 mirror.
    pub async fn resolve(&self, resource_name: &str, suffix: Option<&str>) -> ResolveResult<String> {
        self.resolve_detailed(resource_name, suffix)
            .await
            .map(|resolution| resolution.url)
    }

    /// Resolve a resource, reporting how the choice was made.
    pub async fn resolve_detailed(
        &self,
        resource_name: &str,
        suffix: Option<&str>,
    ) -> ResolveResult<Resolution> {
        // Taken before the lookup so a reload that swaps the definition and
        // clears the cache invalidates everything this call probes.
        let generation = self.cache.generation();
        let resource = self.registry.get(resource_name)?;
        let candidates = by_priority(&resource);

        let mut unknown = Vec::new();
        for candidate in &candidates {
            match self.cache.get(resource.name(), &candidate.base_url) {
                // Sorted, so the first cached-healthy one is the best.
                Some(true) => return Ok(self.finish(&resource, candidate, suffix, false, 0)),
                Some(false) => {}
                None => unknown.push(*candidate),
            }
        }

        let verdicts = self.probe_all(&resource, &unknown, generation).await;
        let probed = verdicts.len();

        let healthy = verdicts
            .iter()
            .filter(|(_, healthy)| *healthy)
            .map(|(candidate, _)| *candidate)
            .min_by_key(|candidate| candidate.priority);

        match healthy {
            Some(candidate) => Ok(self.finish(&resource, candidate, suffix, false, probed)),
            None => {
                let fallback = resource
                    .primary()
                    .or_else(|| candidates.first().copied())
                    .ok_or_else(|| ResolveError::UnknownResource(resource.name().to_string()))?;
                Ok(self.finish(&resource, fallback, suffix, true, probed))
            }
        }
    }

    /// Probe every candidate regardless of cache state and store the
    /// verdicts. Returns how many were healthy.
    pub async fn refresh(&self, resource_name: &str) -> ResolveResult<usize> {
        let generation = self.cache.generation();
        let resource = self.registry.get(resource_name)?;
        let candidates = by_priority(&resource);
        let verdicts = self.probe_all(&resource, &candidates, generation).await;
        let healthy = verdicts.iter().filter(|(_, healthy)| *healthy).count();

        tracing::debug!(
            resource = %resource.name(),
            healthy,
            total = verdicts.len(),
            "Health verdicts refreshed"
        );
        Ok(healthy)
    }

    /// Concurrent fan-out; waits for every probe to settle. Each verdict is
    /// cached as soon as its own probe settles, unless the cache has been
    /// cleared since `generation`.
    async fn probe_all<'a>(
        &self,
        resource: &CdnResource,
        candidates: &[&'a CdnCandidate],
        generation: u64,
    ) -> Vec<(&'a CdnCandidate, bool)> {
        let mut probes = Vec::with_capacity(candidates.len());
        for &candidate in candidates {
            probes.push(self.probe_one(resource, candidate, generation));
        }
        join_all(probes).await
    }

    async fn probe_one<'a>(
        &self,
        resource: &CdnResource,
        candidate: &'a CdnCandidate,
        generation: u64,
    ) -> (&'a CdnCandidate, bool) {
        let healthy = self
            .checker
            .check(
                resource.name(),
                candidate,
                resource.probe_path(),
                resource.strategy(),
                resource.check_timeout(),
            )
            .await;
        self.cache.record(resource.name(), &candidate.base_url, healthy, generation);
        (candidate, healthy)
    }

    fn finish(
        &self,
        resource: &CdnResource,
        candidate: &CdnCandidate,
        suffix: Option<&str>,
        degraded: bool,
        probed: usize,
    ) -> Resolution {
        let url = match suffix {
            Some(suffix) => format!("{}{}", candidate.base_url, suffix),
            None => candidate.base_url.clone(),
        };

        if degraded {
            tracing::warn!(
                resource = %resource.name(),
                candidate = %candidate.name,
                url = %url,
                degraded,
                probed,
                "No healthy CDN candidate, falling back to primary"
            );
        } else {
            tracing::info!(
                resource = %resource.name(),
                candidate = %candidate.name,
                url = %url,
                degraded,
                probed,
                "CDN resource resolved"
            );
        }
        metrics::record_resolution(resource.name(), &candidate.name, degraded);

        Resolution {
            resource: resource.name().to_string(),
            candidate: candidate.name.clone(),
            priority: candidate.priority,
            url,
            degraded,
            probed,
        }
    }
}

/// Candidates in ascending priority; stable, so ties keep registration order.
fn by_priority(resource: &CdnResource) -> Vec<&CdnCandidate> {
    let mut candidates: Vec<&CdnCandidate> = resource.candidates().iter().collect();
    candidates.sort_by_key(|c| c.priority);
    candidates
}
