//! Scripted probe transport for unit tests.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::health::probe::{Probe, ProbeFailure};
use crate::registry::HealthCheckStrategy;

/// Scripted behavior for one URL.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Up,
    Down,
    Status(u16),
    UpAfter(Duration),
    DownAfter(Duration),
    /// Fail this many times, then succeed.
    FailTimes(usize),
}

/// Probe whose answers are scripted per URL. Clones share state, so a test
/// can keep a handle after moving one into a resolver.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProbe {
    routes: Arc<DashMap<String, Outcome>>,
    calls: Arc<DashMap<String, usize>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, outcome: Outcome) -> Self {
        self.set(url, outcome);
        self
    }

    pub fn set(&self, url: &str, outcome: Outcome) {
        self.routes.insert(url.to_string(), outcome);
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.get(url).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|r| *r.value()).sum()
    }
}

impl Probe for ScriptedProbe {
    async fn probe(&self, url: &str, _strategy: HealthCheckStrategy) -> Result<(), ProbeFailure> {
        let previous = {
            let mut count = self.calls.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count - 1
        };
        let outcome = self.routes.get(url).map(|o| *o).unwrap_or(Outcome::Down);

        match outcome {
            Outcome::Up => Ok(()),
            Outcome::Down => Err(ProbeFailure::Transport("connection refused".into())),
            Outcome::Status(code) => Err(ProbeFailure::Status(code)),
            Outcome::UpAfter(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Outcome::DownAfter(delay) => {
                tokio::time::sleep(delay).await;
                Err(ProbeFailure::Status(503))
            }
            Outcome::FailTimes(n) if previous < n => {
                Err(ProbeFailure::Transport("connection reset".into()))
            }
            Outcome::FailTimes(_) => Ok(()),
        }
    }
}
