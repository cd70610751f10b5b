//! Applying reloaded configuration to a running resolver.
//!
//! # Responsibilities
//! - Rebuild the resource set from a reloaded configuration
//! - Swap the registry contents and forget every verdict gathered against
//!   the old definitions
//! - Re-warm the cache so the first callers after a reload don't pay for it
//!
//! # Design Decisions
//! - A rejected configuration leaves registry and cache untouched
//! - Cache TTL, probe settings and the refresh interval are read at startup
//!   only; a reload swaps resources

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use crate::config::{ConfigError, ResolverConfig};
use crate::health::Probe;
use crate::lifecycle::startup::resources_from_config;
use crate::prewarm::{PrewarmReport, Prewarmer};
use crate::resolver::Resolver;

/// Swap in the resources from `config`, clear the health cache, and prewarm.
pub async fn apply_config<P: Probe + 'static>(
    resolver: &Arc<Resolver<P>>,
    config: &ResolverConfig,
) -> Result<PrewarmReport, ConfigError> {
    let resources = resources_from_config(config)?;
    let count = resources.len();

    // Registry first: anything probed against the old definitions started in
    // the old cache generation and is dropped by the clear.
    resolver.registry().replace_all(resources);
    resolver.clear_health_cache();
    tracing::info!(resources = count, "Configuration reloaded");

    Ok(Prewarmer::new(resolver.clone(), Duration::ZERO).pre_check_all().await)
}

/// Apply every reloaded configuration until shutdown or until the update
/// stream closes.
pub async fn run_reloads<P: Probe + 'static>(
    resolver: Arc<Resolver<P>>,
    mut updates: mpsc::UnboundedReceiver<ResolverConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(config) => {
                    if let Err(e) = apply_config(&resolver, &config).await {
                        tracing::error!(error = %e, "Reloaded configuration rejected, keeping current resources");
                    }
                }
                None => break,
            },
            _ = shutdown.recv() => {
                tracing::info!("Config reloader received shutdown signal, exiting loop");
                break;
            }
        }
    }
}
