//! Cache prewarming.
//!
//! # Responsibilities
//! - Resolve every registered resource once, ahead of real demand
//! - Periodically re-probe every candidate so verdicts stay fresh
//!
//! # Design Decisions
//! - Resources are warmed concurrently, each in its own task
//! - Errors and panics are logged and swallowed; warming never takes the
//!   host down

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio::time::{self, Instant};

use crate::health::Probe;
use crate::resolver::Resolver;

/// Summary of one prewarm pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrewarmReport {
    /// Resources resolved to a healthy candidate.
    pub resolved: usize,
    /// Resources that fell back to their primary.
    pub degraded: usize,
    /// Resources whose resolution errored or panicked.
    pub failed: usize,
}

/// Drives resolutions for every registered resource.
pub struct Prewarmer<P> {
    resolver: Arc<Resolver<P>>,
    refresh_interval: Duration,
}

impl<P: Probe + 'static> Prewarmer<P> {
    /// `refresh_interval` of zero disables the background loop.
    pub fn new(resolver: Arc<Resolver<P>>, refresh_interval: Duration) -> Self {
        Self {
            resolver,
            refresh_interval,
        }
    }

    /// Resolve every registered resource once, discarding the URLs.
    pub async fn pre_check_all(&self) -> PrewarmReport {
        let mut tasks = JoinSet::new();
        for name in self.resolver.registry().names() {
            let resolver = self.resolver.clone();
            tasks.spawn(async move {
                let result = resolver.resolve_detailed(&name, None).await;
                (name, result)
            });
        }

        let mut report = PrewarmReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(resolution))) if resolution.degraded => report.degraded += 1,
                Ok((_, Ok(_))) => report.resolved += 1,
                Ok((name, Err(e))) => {
                    tracing::error!(resource = %name, error = %e, "Prewarm resolution failed");
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Prewarm task aborted");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            resolved = report.resolved,
            degraded = report.degraded,
            failed = report.failed,
            "Health cache prewarmed"
        );
        report
    }

    /// Re-probe every candidate of every resource. Returns the number of
    /// resources refreshed.
    pub async fn refresh_all(&self) -> usize {
        let mut tasks = JoinSet::new();
        for name in self.resolver.registry().names() {
            let resolver = self.resolver.clone();
            tasks.spawn(async move {
                let result = resolver.refresh(&name).await;
                (name, result)
            });
        }

        let mut refreshed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(_))) => refreshed += 1,
                Ok((name, Err(e))) => {
                    tracing::error!(resource = %name, error = %e, "Health refresh failed");
                }
                Err(e) => tracing::error!(error = %e, "Health refresh task aborted"),
            }
        }
        refreshed
    }

    /// Refresh verdicts on a fixed interval until shutdown.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if self.refresh_interval.is_zero() {
            tracing::info!("Background health refresh disabled");
            return;
        }

        tracing::info!(
            interval_secs = self.refresh_interval.as_secs(),
            "Health refresher starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.refresh_interval, self.refresh_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let refreshed = self.refresh_all().await;
                    tracing::debug!(resources = refreshed, "Health verdicts refreshed");
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health refresher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
