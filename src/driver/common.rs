//! Polling helpers shared by the interaction layer
//!
//! Bounded condition waits with exponential backoff. The closures passed in
//! decide what "done" means; driver faults inside a check count as "not yet".

use std::future::Future;
use std::time::{Duration, Instant};

// ============================================================================
// Polling Utilities
// ============================================================================

/// Configuration for polling operations
#[derive(Clone, Debug)]
pub struct PollConfig {
    pub timeout_ms: u64,
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub use_exponential_backoff: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10000,
            initial_interval_ms: 100,
            max_interval_ms: 500,
            use_exponential_backoff: true,
        }
    }
}

impl PollConfig {
    /// Default backoff bounded by `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis() as u64,
            ..Self::default()
        }
    }
}

/// Generic polling function with optional exponential backoff
///
/// Calls `check_fn` repeatedly until it returns `true` or timeout is reached.
/// The condition is always checked at least once, so a zero timeout still
/// observes the current state. Returns `true` if the condition was met.
pub async fn wait_until<F, Fut>(check_fn: F, config: PollConfig) -> bool
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    poll_for(
        || {
            let fut = check_fn();
            async move { fut.await.then_some(()) }
        },
        config,
    )
    .await
    .is_some()
}

/// Like [`wait_until`] but hands back the first value the check produced
pub async fn poll_for<T, F, Fut>(check_fn: F, config: PollConfig) -> Option<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = Instant::now();
    let timeout = Duration::from_millis(config.timeout_ms);
    let mut interval = config.initial_interval_ms;

    loop {
        if let Some(value) = check_fn().await {
            return Some(value);
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            log::trace!("poll gave up after {:?}", elapsed);
            return None;
        }

        let remaining = timeout - elapsed;
        tokio::time::sleep(Duration::from_millis(interval).min(remaining)).await;

        if config.use_exponential_backoff {
            interval = (interval * 3 / 2).min(config.max_interval_ms);
        }
    }
}
