//! Reachability probe transport.
//!
//! # Responsibilities
//! - Issue one minimal-cost request against an exact URL
//! - Classify the outcome (success-class status vs. failure)
//!
//! # Design Decisions
//! - No deadline here; `HealthChecker` owns the time bound
//! - Redirects are followed, so a 3xx to a live object counts as reachable

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method};
use thiserror::Error;

use crate::registry::HealthCheckStrategy;

/// Why a single probe did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// The mirror answered with a non-success status.
    #[error("non-success status {0}")]
    Status(u16),

    /// Connection, TLS, DNS or request-building failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The probe did not settle before its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A transport able to probe a URL.
pub trait Probe: Send + Sync {
    fn probe(
        &self,
        url: &str,
        strategy: HealthCheckStrategy,
    ) -> impl Future<Output = Result<(), ProbeFailure>> + Send;
}

/// HTTP probe backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client suited to health checks.
    pub fn with_user_agent(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self::new(client))
    }
}

impl Probe for HttpProbe {
    async fn probe(&self, url: &str, strategy: HealthCheckStrategy) -> Result<(), ProbeFailure> {
        let method = match strategy {
            HealthCheckStrategy::Head => Method::HEAD,
            HealthCheckStrategy::Get => Method::GET,
        };

        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(|e| ProbeFailure::Transport(e.to_string()))?;

        // Dropping the response without reading the body releases the connection.
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeFailure::Status(status.as_u16()))
        }
    }
}
