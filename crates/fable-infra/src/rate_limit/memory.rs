//! In-memory rate limiter using governor crate.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};

use fable_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

type KeyedRateLimiter = GovernorRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// In-memory rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

/// Per-key in-memory rate limiter using the GCRA algorithm.
///
/// Limits are per-process, not distributed across instances.
pub struct InMemoryRateLimiter {
    limiter: Arc<KeyedRateLimiter>,
    config: RateLimitConfig,
    clock: DefaultClock,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        // Degenerate configs clamp to the smallest sane values.
        let max_requests = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let period = config.window.max(Duration::from_millis(1)) / max_requests.get();
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(max_requests))
            .allow_burst(max_requests);

        Self {
            limiter: Arc::new(GovernorRateLimiter::keyed(quota)),
            config,
            clock: DefaultClock::default(),
        }
    }

    pub fn from_env() -> Self {
        let config = RateLimitConfig {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            window: Duration::from_secs(
                std::env::var("RATE_LIMIT_WINDOW_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        };
        Self::new(config)
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(_) => Ok(RateLimitResult {
                allowed: true,
                remaining: self.config.max_requests, // Approximate
                reset_after: self.config.window,
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn burst_is_capped_per_key() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        });

        assert!(limiter.check("reader-a").await.unwrap().allowed);
        assert!(limiter.check("reader-a").await.unwrap().allowed);

        let denied = limiter.check("reader-a").await.unwrap();
        assert!(!denied.allowed);
        assert!(denied.reset_after > Duration::ZERO);

        // A different key has its own budget.
        assert!(limiter.check("reader-b").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn zero_max_requests_clamps_to_one() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 0,
            window: Duration::from_secs(60),
        });
        assert!(limiter.check("reader").await.unwrap().allowed);
        assert!(!limiter.check("reader").await.unwrap().allowed);
    }
}
