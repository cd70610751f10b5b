//! Deadline enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - On expiry the wrapped future is dropped, cancelling any in-flight
//!   request; its eventual result is never observed

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

/// The deadline passed before the operation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deadline of {0:?} elapsed")]
pub struct DeadlineElapsed(pub Duration);

/// Run `future` with a hard deadline.
pub async fn with_deadline<F, T>(deadline: Duration, future: F) -> Result<T, DeadlineElapsed>
where
    F: Future<Output = T>,
{
    timeout(deadline, future)
        .await
        .map_err(|_| DeadlineElapsed(deadline))
}
