//! Request pacing between extraction calls.

use futures::future::BoxFuture;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// After a page has been processed and its links queued
    BetweenRequests,
    /// Before the single retry of a failed seed page
    BeforeRetry,
}

/// Decides how long the crawler waits at each pause point.
pub trait Pacer: Send + Sync {
    fn pause(&self, reason: PauseReason) -> BoxFuture<'_, ()>;
}

/// Fixed delays, slept on the tokio timer.
#[derive(Debug, Clone)]
pub struct FixedDelayPacer {
    pub between_requests: Duration,
    pub before_retry: Duration,
}

impl FixedDelayPacer {
    pub fn new(between_requests: Duration, before_retry: Duration) -> Self {
        Self {
            between_requests,
            before_retry,
        }
    }

    pub fn delay_for(&self, reason: PauseReason) -> Duration {
        match reason {
            PauseReason::BetweenRequests => self.between_requests,
            PauseReason::BeforeRetry => self.before_retry,
        }
    }
}

impl Default for FixedDelayPacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000), Duration::from_millis(5000))
    }
}

impl Pacer for FixedDelayPacer {
    fn pause(&self, reason: PauseReason) -> BoxFuture<'_, ()> {
        let delay = self.delay_for(reason);
        Box::pin(async move {
            debug!("Pausing {:?} ({:?})", delay, reason);
            tokio::time::sleep(delay).await;
        })
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&self, _reason: PauseReason) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }
}
