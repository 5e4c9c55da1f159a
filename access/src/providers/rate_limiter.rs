//! Rate limiter trait and keys.
//!
//! Sliding-window rate limiting keyed by (action, subject, origin). The
//! window is a trailing interval: an attempt counts until `window` has
//! elapsed since it was recorded, so a denied caller can retry as soon as
//! the oldest counted attempt ages out.

use crate::config::RateLimitQuota;
use crate::error::{AccessError, Result};
use std::fmt;
use std::net::IpAddr;

/// Composite rate-limit key: `{action}:{subject}:{origin}`.
///
/// Construction requires a resolvable network origin. Requests with no
/// attributable origin bypass limiting entirely: [`RateLimitKey::attributed`]
/// returns `None` and the call site skips the check. This fail-open behavior
/// for unattributable subjects is a deliberate, accepted risk: limiting by a
/// fabricated key would let one bucket throttle unrelated callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    /// Build a key for an attributable request.
    ///
    /// Returns `None` when `origin` is unknown; callers should log and skip
    /// the check.
    #[must_use]
    pub fn attributed(action: &str, subject: &str, origin: Option<IpAddr>) -> Option<Self> {
        let origin = origin?;
        Some(Self(format!("{action}:{subject}:{origin}")))
    }

    /// The key as a string, suitable for use as a store key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sliding-window rate limiter.
///
/// # Errors
///
/// `check_and_record` distinguishes two failure classes, and call sites
/// treat them differently on purpose:
/// - `AccessError::RateLimited { retry_after }`: the ceiling was reached;
///   the attempt was **not** recorded.
/// - `AccessError::StoreUnavailable`: the counter store failed. OTP
///   issuance fails **closed** on this; the checkout flow uses
///   [`check_best_effort`] and fails **open**.
pub trait RateLimiter: Send + Sync {
    /// Check the quota and record the attempt in one operation.
    ///
    /// Counts live attempts for `key` inside the trailing window; at or
    /// above `quota.max_attempts` the call denies without recording,
    /// otherwise it records now-timestamped attempt and admits.
    ///
    /// # Errors
    ///
    /// - `AccessError::RateLimited` when the ceiling is reached.
    /// - `AccessError::StoreUnavailable` when the counter store fails.
    fn check_and_record(
        &self,
        key: &RateLimitKey,
        quota: RateLimitQuota,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Clear all recorded attempts for a key.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the counter store fails.
    fn reset(&self, key: &RateLimitKey) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Number of attempts currently counted for a key.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the counter store fails.
    fn attempt_count(
        &self,
        key: &RateLimitKey,
    ) -> impl std::future::Future<Output = Result<u32>> + Send;
}

/// Best-effort rate-limit check for the checkout flow.
///
/// Ceiling denials still deny, but store failures are logged and admitted:
/// an order must not be lost because the counter store is down. This is the
/// opposite of OTP issuance, which denies on the same failure. The
/// asymmetry is a deliberate availability/security trade-off between the
/// two call sites, not a uniform policy.
///
/// # Errors
///
/// Returns `AccessError::RateLimited` when the ceiling is reached; never
/// returns an infrastructure error.
pub async fn check_best_effort<L: RateLimiter>(
    limiter: &L,
    key: &RateLimitKey,
    quota: RateLimitQuota,
) -> Result<()> {
    match limiter.check_and_record(key, quota).await {
        Ok(()) => Ok(()),
        Err(denied @ AccessError::RateLimited { .. }) => Err(denied),
        Err(e) => {
            tracing::warn!(
                key = %key,
                error = %e,
                "rate limiter unavailable, admitting request (fail open)"
            );
            Ok(())
        }
    }
}
