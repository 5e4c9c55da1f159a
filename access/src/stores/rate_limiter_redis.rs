//! Redis-based rate limiter implementation.
//!
//! Sliding window with sorted sets:
//! 1. Record attempts as sorted-set members scored by timestamp (ZADD)
//! 2. Remove entries outside the window (ZREMRANGEBYSCORE)
//! 3. Count remaining entries (ZCARD)
//! 4. Compare against the ceiling
//!
//! The prune/count/record sequence is not a single atomic unit; two
//! near-simultaneous callers can each slip under the ceiling. That slack is
//! acceptable for attempt counting (unlike ticket redemption, which uses a
//! server-side atomic claim).

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::RateLimitQuota;
use crate::error::{AccessError, Result};
use crate::providers::{RateLimitKey, RateLimiter};

/// Redis-backed sliding-window rate limiter.
///
/// # Example
///
/// ```no_run
/// use gatekit_access::stores::RedisRateLimiter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let limiter = RedisRateLimiter::new("redis://127.0.0.1:6379").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn_manager: ConnectionManager,
}

impl RedisRateLimiter {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` if the connection fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            AccessError::StoreUnavailable(format!("failed to create Redis client: {e}"))
        })?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            AccessError::StoreUnavailable(format!("failed to connect to Redis: {e}"))
        })?;

        Ok(Self { conn_manager })
    }

    fn redis_key(key: &RateLimitKey) -> String {
        format!("access:rate:{key}")
    }

    #[allow(clippy::cast_possible_truncation)]
    fn current_timestamp_ms() -> u64 {
        // Safe cast: ms timestamps fit u64 far beyond any plausible clock
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }

    fn store_err(context: &str, e: &redis::RedisError) -> AccessError {
        AccessError::StoreUnavailable(format!("{context}: {e}"))
    }
}

impl RateLimiter for RedisRateLimiter {
    async fn check_and_record(&self, key: &RateLimitKey, quota: RateLimitQuota) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let redis_key = Self::redis_key(key);
        let now_ms = Self::current_timestamp_ms();
        #[allow(clippy::cast_possible_truncation)]
        let window_ms = quota.window.as_millis() as u64;
        let window_start = now_ms.saturating_sub(window_ms);

        let _: () = conn
            .zrembyscore(&redis_key, 0, window_start)
            .await
            .map_err(|e| Self::store_err("failed to prune rate-limit entries", &e))?;

        let count: u64 = conn
            .zcard(&redis_key)
            .await
            .map_err(|e| Self::store_err("failed to count rate-limit entries", &e))?;

        if count >= u64::from(quota.max_attempts) {
            // Retry once the oldest counted attempt leaves the window
            let oldest: Vec<(String, f64)> = conn
                .zrange_withscores(&redis_key, 0, 0)
                .await
                .map_err(|e| Self::store_err("failed to read oldest rate-limit entry", &e))?;
            let retry_after = oldest.first().map_or(quota.window, |(_, score)| {
                // Scores are ms timestamps, well inside f64's integer range
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let oldest_ms = *score as u64;
                Duration::from_millis((oldest_ms + window_ms).saturating_sub(now_ms))
            });

            tracing::debug!(
                key = %key,
                count = count,
                max_attempts = quota.max_attempts,
                "rate limit ceiling reached"
            );

            return Err(AccessError::RateLimited { retry_after });
        }

        // Unique member per attempt so same-millisecond attempts both count
        let member = format!("{now_ms}:{}", uuid::Uuid::new_v4());
        let _: () = conn
            .zadd(&redis_key, member, now_ms)
            .await
            .map_err(|e| Self::store_err("failed to record rate-limit attempt", &e))?;

        // Let idle keys clean themselves up
        let ttl_seconds = i64::try_from(quota.window.as_secs().max(1)).unwrap_or(i64::MAX);
        let _: () = conn
            .expire(&redis_key, ttl_seconds)
            .await
            .map_err(|e| Self::store_err("failed to set rate-limit key TTL", &e))?;

        Ok(())
    }

    async fn reset(&self, key: &RateLimitKey) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .del(Self::redis_key(key))
            .await
            .map_err(|e| Self::store_err("failed to reset rate limit", &e))?;
        Ok(())
    }

    async fn attempt_count(&self, key: &RateLimitKey) -> Result<u32> {
        let mut conn = self.conn_manager.clone();
        let count: u64 = conn
            .zcard(Self::redis_key(key))
            .await
            .map_err(|e| Self::store_err("failed to count rate-limit entries", &e))?;
        #[allow(clippy::cast_possible_truncation)]
        let count = count.min(u64::from(u32::MAX)) as u32;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn key(subject: &str) -> RateLimitKey {
        RateLimitKey::attributed(
            "otp_request",
            subject,
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        )
        .unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn ceiling_is_enforced() {
        let limiter = RedisRateLimiter::new("redis://127.0.0.1:6379")
            .await
            .unwrap();
        let key = key(&format!("{}@example.com", uuid::Uuid::new_v4()));
        let quota = RateLimitQuota::new(3, Duration::from_secs(60));

        for _ in 0..3 {
            limiter.check_and_record(&key, quota).await.unwrap();
        }

        let denied = limiter.check_and_record(&key, quota).await;
        assert!(matches!(denied, Err(AccessError::RateLimited { .. })));

        limiter.reset(&key).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn reset_clears_the_counter() {
        let limiter = RedisRateLimiter::new("redis://127.0.0.1:6379")
            .await
            .unwrap();
        let key = key(&format!("{}@example.com", uuid::Uuid::new_v4()));
        let quota = RateLimitQuota::new(1, Duration::from_secs(60));

        limiter.check_and_record(&key, quota).await.unwrap();
        limiter.reset(&key).await.unwrap();
        assert_eq!(limiter.attempt_count(&key).await.unwrap(), 0);
        assert!(limiter.check_and_record(&key, quota).await.is_ok());

        limiter.reset(&key).await.unwrap();
    }
}
