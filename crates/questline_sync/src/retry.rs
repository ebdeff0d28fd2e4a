//! Bounded linear backoff.

use async_trait::async_trait;
use std::time::Duration;

/// How many times to retry and how long to wait between attempts.
///
/// Attempts are counted from zero. Before retrying attempt `n` the caller waits
/// `base_delay * (n + 1)`, so the default policy waits 1s, 2s, then 3s.
///
/// # Examples
///
/// ```
/// use questline_sync::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert!(policy.can_retry(2));
/// assert!(!policy.can_retry(3));
/// assert_eq!(policy.delay_for(2), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Delay unit; attempt `n` waits `n + 1` units
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// True while another attempt is allowed after `attempt` failed.
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Delay to wait after `attempt` failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Something that can wait.
///
/// Sources await every retry delay through this trait so tests can observe delays
/// without sleeping.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_grow_linearly() {
        let policy = RetryPolicy::new(3, Duration::from_millis(250));
        let delays: Vec<_> = (0..3).map(|a| policy.delay_for(a)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_millis(750),
            ]
        );
    }

    #[test]
    fn none_never_retries() {
        assert!(!RetryPolicy::none().can_retry(0));
    }
}
