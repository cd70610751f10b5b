//! `cdn-failover` command-line interface.
//!
//! ```text
//! cdn-failover [--config resolver.toml] <command>
//!
//!   resolve <resource> [--suffix S] [--json]   pick a mirror for one resource
//!   editor-engine | runtime-core               well-known shortcuts
//!   list                                       registered resources and mirrors
//!   prewarm [--json]                           probe everything, print verdicts
//!   watch                                      keep verdicts fresh until Ctrl-C
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use cdn_failover::config::watcher::ConfigWatcher;
use cdn_failover::config::{load_config, ResolverConfig};
use cdn_failover::health::HttpProbe;
use cdn_failover::lifecycle::reload::run_reloads;
use cdn_failover::lifecycle::shutdown::{drain, DEFAULT_GRACE};
use cdn_failover::lifecycle::signals::wait_for_signal;
use cdn_failover::lifecycle::{build_resolver, Shutdown};
use cdn_failover::observability::{logging, metrics};
use cdn_failover::prewarm::Prewarmer;
use cdn_failover::resolver::Resolver;
use cdn_failover::well_known;

#[derive(Parser)]
#[command(name = "cdn-failover")]
#[command(about = "Pick a reachable CDN mirror for redundantly hosted resources", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in resources are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one resource to a mirror URL
    Resolve {
        resource: String,
        /// Path appended to the chosen base URL
        #[arg(short, long)]
        suffix: Option<String>,
        /// Print the full resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve the editor engine's base URL
    EditorEngine,
    /// Resolve the language runtime's core package URL
    RuntimeCore,
    /// List registered resources and their mirrors
    List,
    /// Probe every resource and print the health cache
    Prewarm {
        #[arg(long)]
        json: bool,
    },
    /// Keep the health cache warm until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ResolverConfig::default(),
    };
    logging::init_logging(&config.observability);

    let resolver = build_resolver(&config)?;

    match cli.command {
        Commands::Resolve { resource, suffix, json } => {
            let resolution = resolver.resolve_detailed(&resource, suffix.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                println!("{}", resolution.url);
            }
        }
        Commands::EditorEngine => {
            println!("{}", well_known::editor_engine_base_url(&*resolver).await?);
        }
        Commands::RuntimeCore => {
            println!("{}", well_known::runtime_core_base_url(&*resolver).await?);
        }
        Commands::List => {
            for resource in resolver.registry().all() {
                println!(
                    "{} (probe {}, {:?}, timeout {}ms)",
                    resource.name(),
                    resource.probe_path(),
                    resource.strategy(),
                    resource.check_timeout().as_millis()
                );
                for candidate in resource.candidates() {
                    println!("  {} {:<16} {}", candidate.priority, candidate.name, candidate.base_url);
                }
            }
        }
        Commands::Prewarm { json } => {
            let report = Prewarmer::new(resolver.clone(), config.prewarm.refresh_interval())
                .pre_check_all()
                .await;
            let snapshot = resolver.health_snapshot();
            if json {
                let out = serde_json::json!({ "report": report, "health": snapshot });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for entry in snapshot {
                    let verdict = if entry.healthy { "up" } else { "down" };
                    println!("{:<14} {:<5} {}", entry.resource, verdict, entry.url);
                }
            }
        }
        Commands::Watch => watch(resolver, config, cli.config).await?,
    }

    Ok(())
}

async fn watch(
    resolver: Arc<Resolver<HttpProbe>>,
    config: ResolverConfig,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let prewarmer = Prewarmer::new(resolver.clone(), config.prewarm.refresh_interval());
    if config.prewarm.on_startup {
        prewarmer.pre_check_all().await;
    }
    let mut tasks = vec![tokio::spawn(prewarmer.run(shutdown.subscribe()))];

    // Dropping the notify watcher ends the update stream, so it lives as
    // long as this scope.
    let _watcher = match config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path).spawn()?;
            tasks.push(tokio::spawn(run_reloads(resolver.clone(), updates, shutdown.subscribe())));
            Some(watcher)
        }
        None => None,
    };

    wait_for_signal(&shutdown).await;
    drain(tasks, DEFAULT_GRACE).await;
    tracing::info!("Shutdown complete");
    Ok(())
}
