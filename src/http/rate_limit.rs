//! Rate limiting implementation
//!
//! Uses the governor crate for token bucket rate limiting. The source
//! publishes its quota as a number of requests per rolling period; permits
//! are spaced `period / requests` apart with no burst, so any window of one
//! period admits at most `requests` of them.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Requests allowed per period
    pub requests: u32,
    /// Length of the period
    pub period: Duration,
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests: u32, period: Duration) -> Self {
        Self { requests, period }
    }

    /// Create a per-second config
    pub fn per_second(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(1))
    }

    fn quota(&self) -> Quota {
        let requests = NonZeroU32::new(self.requests).unwrap_or(NonZeroU32::MIN);
        let interval = self.period / requests.get();
        Quota::with_period(interval)
            .unwrap_or_else(|| Quota::per_second(requests))
            .allow_burst(NonZeroU32::MIN)
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[test]
    fn test_rate_limiter_config() {
        let config = RateLimiterConfig::new(5, Duration::from_secs(30));
        assert_eq!(config.requests, 5);
        assert_eq!(config.period, Duration::from_secs(30));
        assert_eq!(RateLimiterConfig::per_second(7).period, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_rate_limiter_spaces_permits() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(5, Duration::from_secs(30)));

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_rate_limiter_never_exceeds_requests_per_period() {
        let config = RateLimiterConfig::new(5, Duration::from_millis(500));
        let limiter = RateLimiter::new(&config);

        let start = std::time::Instant::now();
        let mut granted = 0;
        while start.elapsed() < Duration::from_millis(450) {
            if limiter.try_acquire() {
                granted += 1;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(granted >= 1);
        assert!(granted <= config.requests, "granted {granted} permits");
    }

    #[tokio::test]
    async fn test_rate_limiter_zero_requests_is_clamped() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(0, Duration::from_secs(60)));
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_rate_limiter_first_wait_is_immediate() {
        let limiter = RateLimiter::new(&RateLimiterConfig::per_second(100));
        tokio::time::timeout(Duration::from_millis(100), limiter.wait())
            .await
            .unwrap();
    }
}
