//! Access-verification configuration.
//!
//! Configuration values are provided by the application, not hardcoded.
//! Defaults match the product's staff-portal policy: 10-minute codes, five
//! validation attempts, five issuances per 10-minute window, and a 24-hour
//! verified-session flag.

use std::time::Duration;

/// Sliding-window rate-limit quota: at most `max_attempts` within `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitQuota {
    /// Maximum attempts allowed inside the window.
    pub max_attempts: u32,

    /// Trailing window length.
    pub window: Duration,
}

impl RateLimitQuota {
    /// Create a quota.
    #[must_use]
    pub const fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
        }
    }

    /// Convenience constructor for per-minute windows.
    #[must_use]
    pub const fn per_minutes(max_attempts: u32, minutes: u64) -> Self {
        Self::new(max_attempts, Duration::from_secs(minutes * 60))
    }
}

/// OTP service configuration.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Code time-to-live.
    ///
    /// Default: 10 minutes.
    pub code_ttl: Duration,

    /// Wrong-guess cap before the record is treated as consumed-but-failed.
    ///
    /// Default: 5.
    pub max_validation_attempts: u32,

    /// Issuance quota per (subject, origin) key.
    ///
    /// Default: 5 requests per 10 minutes.
    pub issue_quota: RateLimitQuota,

    /// Lifetime of the per-session verified flag written by a successful
    /// validation. No re-verification happens inside this window; it is the
    /// session lifetime by default.
    ///
    /// Default: 24 hours.
    pub verified_session_ttl: Duration,
}

impl OtpConfig {
    /// Create a configuration with product defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            code_ttl: Duration::from_secs(10 * 60),
            max_validation_attempts: 5,
            issue_quota: RateLimitQuota::per_minutes(5, 10),
            verified_session_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Set the code time-to-live.
    #[must_use]
    pub const fn with_code_ttl(mut self, ttl: Duration) -> Self {
        self.code_ttl = ttl;
        self
    }

    /// Set the wrong-guess cap.
    #[must_use]
    pub const fn with_max_validation_attempts(mut self, cap: u32) -> Self {
        self.max_validation_attempts = cap;
        self
    }

    /// Set the issuance quota.
    #[must_use]
    pub const fn with_issue_quota(mut self, quota: RateLimitQuota) -> Self {
        self.issue_quota = quota;
        self
    }

    /// Set the verified-session flag lifetime.
    #[must_use]
    pub const fn with_verified_session_ttl(mut self, ttl: Duration) -> Self {
        self.verified_session_ttl = ttl;
        self
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let config = OtpConfig::default();
        assert_eq!(config.code_ttl, Duration::from_secs(600));
        assert_eq!(config.max_validation_attempts, 5);
        assert_eq!(config.issue_quota.max_attempts, 5);
        assert_eq!(config.issue_quota.window, Duration::from_secs(600));
        assert_eq!(config.verified_session_ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn builder_overrides() {
        let config = OtpConfig::new()
            .with_code_ttl(Duration::from_secs(300))
            .with_max_validation_attempts(3)
            .with_issue_quota(RateLimitQuota::per_minutes(2, 1))
            .with_verified_session_ttl(Duration::from_secs(3600));

        assert_eq!(config.code_ttl, Duration::from_secs(300));
        assert_eq!(config.max_validation_attempts, 3);
        assert_eq!(config.issue_quota.max_attempts, 2);
        assert_eq!(config.verified_session_ttl, Duration::from_secs(3600));
    }
}
