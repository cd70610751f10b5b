//! Shutdown coordination.
//!
//! Background loops (the health refresher, the config reloader) subscribe to
//! one broadcast. After it fires they get a bounded grace period to return;
//! whatever is still running then is aborted.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Time background tasks get to wind down after the signal.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        let listeners = self.tx.send(()).unwrap_or(0);
        tracing::info!(listeners, "Shutdown triggered");
        listeners
    }

    /// Tasks still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for `tasks` to finish, sharing one `grace` deadline, and abort the
/// ones that miss it. Returns the number aborted.
pub async fn drain(tasks: Vec<JoinHandle<()>>, grace: Duration) -> usize {
    let deadline = Instant::now() + grace;
    let mut aborted = 0;

    for mut task in tasks {
        match time::timeout_at(deadline, &mut task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Background task failed during shutdown"),
            Err(_) => {
                task.abort();
                aborted += 1;
            }
        }
    }

    if aborted > 0 {
        tracing::warn!(
            aborted,
            grace_ms = grace.as_millis() as u64,
            "Background tasks ignored shutdown, aborted"
        );
    }
    aborted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_trigger() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.clone().subscribe();

        assert_eq!(shutdown.trigger(), 2);
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_listeners() {
        assert_eq!(Shutdown::new().trigger(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_aborts_stragglers() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let cooperative = tokio::spawn(async move {
            let _ = rx.recv().await;
        });
        let stubborn = tokio::spawn(async {
            time::sleep(Duration::from_secs(3600)).await;
        });

        shutdown.trigger();
        let start = Instant::now();
        let aborted = drain(vec![cooperative, stubborn], Duration::from_secs(2)).await;

        assert_eq!(aborted, 1);
        assert!(start.elapsed() <= Duration::from_secs(2));
        assert_eq!(shutdown.receiver_count(), 0);
    }
}
