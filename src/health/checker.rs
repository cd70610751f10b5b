//! Bounded reachability check for a single candidate.
//!
//! # Responsibilities
//! - Probe `base_url + probe_path` through a `Probe` transport
//! - Retry within the same deadline when configured
//! - Convert every failure into `false`, logging it with candidate identity

use std::time::Duration;

use crate::health::probe::{Probe, ProbeFailure};
use crate::observability::metrics;
use crate::registry::{CdnCandidate, HealthCheckStrategy};
use crate::resilience::backoff::Backoff;
use crate::resilience::timeouts::with_deadline;

/// Performs deadline-bounded probes.
#[derive(Debug, Clone)]
pub struct HealthChecker<P> {
    probe: P,
    retries: u32,
    backoff: Backoff,
}

impl<P: Probe> HealthChecker<P> {
    /// A checker that makes exactly one attempt per check.
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            retries: 0,
            backoff: Backoff::new(Duration::from_millis(100), Duration::from_millis(1000)),
        }
    }

    /// Allow `retries` extra attempts inside the same deadline.
    pub fn with_retries(mut self, retries: u32, backoff: Backoff) -> Self {
        self.retries = retries;
        self.backoff = backoff;
        self
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Probe one candidate. Returns within `timeout` and never fails.
    pub async fn check(
        &self,
        resource: &str,
        candidate: &CdnCandidate,
        probe_path: &str,
        strategy: HealthCheckStrategy,
        timeout: Duration,
    ) -> bool {
        let url = candidate.probe_url(probe_path);

        let outcome = match with_deadline(timeout, self.attempt_all(&url, strategy)).await {
            Ok(result) => result,
            Err(elapsed) => Err(ProbeFailure::Timeout(elapsed.0)),
        };

        match outcome {
            Ok(()) => {
                tracing::debug!(resource = %resource, candidate = %candidate.name, url = %url, "Health check passed");
                metrics::record_probe(resource, &candidate.name, "success");
                true
            }
            Err(failure) => {
                tracing::warn!(
                    resource = %resource,
                    candidate = %candidate.name,
                    priority = candidate.priority,
                    url = %url,
                    error = %failure,
                    "Health check failed"
                );
                metrics::record_probe(resource, &candidate.name, failure_label(&failure));
                false
            }
        }
    }

    async fn attempt_all(&self, url: &str, strategy: HealthCheckStrategy) -> Result<(), ProbeFailure> {
        let mut attempt = 0;
        loop {
            match self.probe.probe(url, strategy).await {
                Ok(()) => return Ok(()),
                Err(failure) if attempt >= self.retries => return Err(failure),
                Err(failure) => {
                    attempt += 1;
                    tracing::debug!(url = %url, attempt, error = %failure, "Retrying health check");
                    tokio::time::sleep(self.backoff.delay(attempt)).await;
                }
            }
        }
    }
}

fn failure_label(failure: &ProbeFailure) -> &'static str {
    match failure {
        ProbeFailure::Status(_) => "status",
        ProbeFailure::Transport(_) => "transport",
        ProbeFailure::Timeout(_) => "timeout",
    }
}
