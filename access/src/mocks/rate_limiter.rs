//! Mock rate limiter for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::RateLimitQuota;
use crate::error::{AccessError, Result};
use crate::providers::{RateLimitKey, RateLimiter};

/// In-memory sliding-window rate limiter.
///
/// Old entries are only pruned during `check_and_record` calls for that
/// key; long-running tests should `reset` keys they are done with.
/// Production deployments use
/// [`RedisRateLimiter`](crate::stores::RedisRateLimiter), which cleans up
/// via key TTLs.
#[derive(Debug, Clone, Default)]
pub struct MockRateLimiter {
    /// Map of key -> recorded attempt timestamps (ms since epoch).
    attempts: Arc<Mutex<HashMap<String, Vec<u64>>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockRateLimiter {
    /// Create a new mock rate limiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a counter-store outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AccessError::StoreUnavailable(
                "simulated rate-limit store outage".to_string(),
            ));
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn current_timestamp_ms() -> u64 {
        // Safe cast: ms timestamps fit u64 far beyond any plausible clock
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}

impl RateLimiter for MockRateLimiter {
    async fn check_and_record(&self, key: &RateLimitKey, quota: RateLimitQuota) -> Result<()> {
        self.check_available()?;

        let mut attempts = self
            .attempts
            .lock()
            .map_err(|_| AccessError::StoreUnavailable("lock poisoned".to_string()))?;

        let now_ms = Self::current_timestamp_ms();
        #[allow(clippy::cast_possible_truncation)]
        let window_ms = quota.window.as_millis() as u64;
        let window_start = now_ms.saturating_sub(window_ms);

        let timestamps = attempts.entry(key.as_str().to_string()).or_default();
        timestamps.retain(|&ts| ts >= window_start);

        if timestamps.len() >= quota.max_attempts as usize {
            // Retry once the oldest counted attempt leaves the window
            let oldest = timestamps.iter().copied().min().unwrap_or(now_ms);
            let retry_after = Duration::from_millis((oldest + window_ms).saturating_sub(now_ms));

            tracing::debug!(
                key = %key,
                attempts = timestamps.len(),
                max_attempts = quota.max_attempts,
                "rate limit ceiling reached"
            );

            return Err(AccessError::RateLimited { retry_after });
        }

        timestamps.push(now_ms);
        Ok(())
    }

    async fn reset(&self, key: &RateLimitKey) -> Result<()> {
        self.check_available()?;

        self.attempts
            .lock()
            .map_err(|_| AccessError::StoreUnavailable("lock poisoned".to_string()))?
            .remove(key.as_str());
        Ok(())
    }

    async fn attempt_count(&self, key: &RateLimitKey) -> Result<u32> {
        self.check_available()?;

        #[allow(clippy::cast_possible_truncation)]
        let count = self
            .attempts
            .lock()
            .map_err(|_| AccessError::StoreUnavailable("lock poisoned".to_string()))?
            .get(key.as_str())
            .map_or(0, |timestamps| timestamps.len() as u32);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::check_best_effort;
    use std::net::{IpAddr, Ipv4Addr};

    fn key() -> RateLimitKey {
        RateLimitKey::attributed(
            "otp_request",
            "staff@example.com",
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn allows_up_to_ceiling() {
        let limiter = MockRateLimiter::new();
        let quota = RateLimitQuota::new(5, Duration::from_secs(60));

        for i in 1..=5 {
            let result = limiter.check_and_record(&key(), quota).await;
            assert!(result.is_ok(), "attempt {i} should be admitted");
        }
    }

    #[tokio::test]
    async fn denies_over_ceiling_without_recording() {
        let limiter = MockRateLimiter::new();
        let quota = RateLimitQuota::new(5, Duration::from_secs(60));

        for _ in 0..5 {
            limiter.check_and_record(&key(), quota).await.unwrap();
        }

        let denied = limiter.check_and_record(&key(), quota).await;
        assert!(matches!(denied, Err(AccessError::RateLimited { .. })));

        // The denied attempt was not recorded
        assert_eq!(limiter.attempt_count(&key()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn window_elapse_readmits() {
        let limiter = MockRateLimiter::new();
        let quota = RateLimitQuota::new(2, Duration::from_millis(400));

        limiter.check_and_record(&key(), quota).await.unwrap();
        limiter.check_and_record(&key(), quota).await.unwrap();
        assert!(limiter.check_and_record(&key(), quota).await.is_err());

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(limiter.check_and_record(&key(), quota).await.is_ok());
    }

    #[tokio::test]
    async fn retry_after_is_bounded_by_window() {
        let limiter = MockRateLimiter::new();
        let quota = RateLimitQuota::new(1, Duration::from_secs(60));

        limiter.check_and_record(&key(), quota).await.unwrap();
        match limiter.check_and_record(&key(), quota).await {
            Err(AccessError::RateLimited { retry_after }) => {
                assert!(retry_after <= Duration::from_secs(60));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reset_clears_the_counter() {
        let limiter = MockRateLimiter::new();
        let quota = RateLimitQuota::new(1, Duration::from_secs(60));

        limiter.check_and_record(&key(), quota).await.unwrap();
        limiter.reset(&key()).await.unwrap();
        assert!(limiter.check_and_record(&key(), quota).await.is_ok());
    }

    #[tokio::test]
    async fn outage_surfaces_store_error() {
        let limiter = MockRateLimiter::new();
        limiter.set_unavailable(true);

        let result = limiter
            .check_and_record(&key(), RateLimitQuota::new(5, Duration::from_secs(60)))
            .await;
        assert!(matches!(result, Err(AccessError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn best_effort_admits_on_outage_but_still_denies_ceiling() {
        let limiter = MockRateLimiter::new();
        let quota = RateLimitQuota::new(1, Duration::from_secs(60));
        let key = RateLimitKey::attributed(
            crate::constants::actions::CHECKOUT,
            "buyer@example.com",
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        )
        .unwrap();

        // Ceiling denial passes through
        limiter.check_and_record(&key, quota).await.unwrap();
        assert!(matches!(
            check_best_effort(&limiter, &key, quota).await,
            Err(AccessError::RateLimited { .. })
        ));

        // Store outage is admitted (fail open)
        limiter.set_unavailable(true);
        assert!(check_best_effort(&limiter, &key, quota).await.is_ok());
    }
}
