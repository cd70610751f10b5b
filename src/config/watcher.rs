//! Configuration file watcher for hot reload.
//!
//! # Responsibilities
//! - Notice writes to the configuration file, including editors that save by
//!   writing a temp file and renaming it over the original
//! - Coalesce a burst of filesystem events into one reload
//! - Forward only configurations that load and validate
//!
//! # Design Decisions
//! - The parent directory is watched, not the file itself; a rename replaces
//!   the inode and a file-level watch would go silent
//! - Invalid files are logged and skipped; the running configuration stays

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time;

use crate::config::loader::load_config;
use crate::config::schema::ResolverConfig;

/// Quiet period after the last filesystem event before the file is read.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches one configuration file and streams validated reloads.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
}

impl ConfigWatcher {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start watching. The returned watcher must be kept alive; dropping it
    /// ends the update stream.
    pub fn spawn(
        self,
    ) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<ResolverConfig>), notify::Error> {
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let file_name = self.path.file_name().map(OsString::from);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, file_name.as_deref()) => {
                    let _ = change_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default(),
        )?;
        watcher.watch(&watch_dir(&self.path), RecursiveMode::NonRecursive)?;
        tracing::info!(
            path = ?self.path,
            debounce_ms = self.debounce.as_millis() as u64,
            "Config watcher started"
        );

        let (update_tx, update_rx) = mpsc::unbounded_channel();
        tokio::spawn(forward(self.path, self.debounce, change_rx, update_tx));
        Ok((watcher, update_rx))
    }
}

/// Directory to watch for `path`. A bare file name lives in the working
/// directory.
fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether `event` writes, creates, or renames onto the watched file.
fn touches(event: &Event, file_name: Option<&OsStr>) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == file_name)
}

/// Turn change notifications into validated configurations until either
/// side of the pipeline goes away.
async fn forward(
    path: PathBuf,
    debounce: Duration,
    mut changes: mpsc::UnboundedReceiver<()>,
    updates: mpsc::UnboundedSender<ResolverConfig>,
) {
    while changes.recv().await.is_some() {
        let coalesced = settle(&mut changes, debounce).await;

        match load_config(&path) {
            Ok(config) => {
                tracing::info!(path = ?path, coalesced, "Config file changed, reloading");
                if updates.send(config).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(path = ?path, error = %e, "Config reload rejected, keeping current configuration");
            }
        }
    }
}

/// Absorb follow-up events until none arrives for `debounce`. Returns how
/// many were absorbed.
async fn settle(changes: &mut mpsc::UnboundedReceiver<()>, debounce: Duration) -> usize {
    let mut absorbed = 0;
    while let Ok(Some(())) = time::timeout(debounce, changes.recv()).await {
        absorbed += 1;
    }
    absorbed
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::fs;

    fn temp_config(tag: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cdn-failover-watcher-{}-{}.toml",
            tag,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_watch_dir() {
        assert_eq!(watch_dir(Path::new("resolver.toml")), PathBuf::from("."));
        assert_eq!(watch_dir(Path::new("/etc/cdn/resolver.toml")), PathBuf::from("/etc/cdn"));
    }

    #[test]
    fn test_only_writes_to_the_watched_file_count() {
        let name = Some(OsStr::new("resolver.toml"));

        let write = Event::new(EventKind::Modify(ModifyKind::Any)).add_path("/etc/cdn/resolver.toml".into());
        let rename = Event::new(EventKind::Create(CreateKind::File)).add_path("/etc/cdn/resolver.toml".into());
        let sibling = Event::new(EventKind::Modify(ModifyKind::Any)).add_path("/etc/cdn/other.toml".into());
        let read = Event::new(EventKind::Access(AccessKind::Any)).add_path("/etc/cdn/resolver.toml".into());

        assert!(touches(&write, name));
        assert!(touches(&rename, name));
        assert!(!touches(&sibling, name));
        assert!(!touches(&read, name));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_events_yields_one_reload() {
        let path = temp_config("burst", "[cache]\nttl_ms = 60000\n");
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        tokio::spawn(forward(path.clone(), DEFAULT_DEBOUNCE, change_rx, update_tx));

        for _ in 0..3 {
            change_tx.send(()).unwrap();
        }
        let config = update_rx.recv().await.unwrap();
        assert_eq!(config.cache.ttl_ms, 60_000);

        time::sleep(Duration::from_secs(1)).await;
        assert!(update_rx.try_recv().is_err());
        fs::remove_file(&path).unwrap_or_default();
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_file_is_skipped() {
        let path = temp_config("invalid", "[cache]\nttl_ms = 0\n");
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        tokio::spawn(forward(path.clone(), DEFAULT_DEBOUNCE, change_rx, update_tx));

        change_tx.send(()).unwrap();
        time::sleep(Duration::from_secs(1)).await;
        assert!(update_rx.try_recv().is_err());

        fs::write(&path, "[cache]\nttl_ms = 1000\n").unwrap();
        change_tx.send(()).unwrap();
        assert_eq!(update_rx.recv().await.unwrap().cache.ttl_ms, 1_000);
        fs::remove_file(&path).unwrap_or_default();
    }
}
