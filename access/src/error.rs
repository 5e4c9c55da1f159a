//! Error types for access-verification operations.

use gatekit_core::UserFacingError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for access-verification operations.
pub type Result<T> = std::result::Result<T, AccessError>;

/// Error taxonomy for OTP issuance, validation and gating.
///
/// Variants are grouped by category: validation errors are rejected before
/// any store access, policy and not-found errors are expected user-facing
/// outcomes, and infrastructure errors are logged with context and surfaced
/// to callers as a generic failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    // ═══════════════════════════════════════════════════════════
    // Validation
    // ═══════════════════════════════════════════════════════════

    /// Subject is missing or is not a plausible email address.
    #[error("A valid email address is required")]
    InvalidSubject,

    // ═══════════════════════════════════════════════════════════
    // Policy
    // ═══════════════════════════════════════════════════════════

    /// Too many requests within the rate-limit window.
    #[error("Too many requests. Please retry in {} seconds", .retry_after.as_secs())]
    RateLimited {
        /// How long until the oldest counted attempt leaves the window.
        retry_after: Duration,
    },

    /// The code exists but its time-to-live has elapsed.
    #[error("This code has expired. Please request a new one")]
    CodeExpired,

    /// The submitted code does not match the stored hash.
    #[error("Incorrect code")]
    CodeMismatch,

    /// The attempt cap was reached; the record is consumed-but-failed.
    #[error("Too many incorrect attempts. Please request a new code")]
    TooManyFailedAttempts,

    // ═══════════════════════════════════════════════════════════
    // Not Found
    // ═══════════════════════════════════════════════════════════

    /// No active (unconsumed, unexpired) code exists for the subject.
    ///
    /// Also returned when re-validating an already-consumed code: single-use
    /// semantics make a consumed record indistinguishable from no record.
    #[error("No active code found. Please request a new one")]
    CodeNotFound,

    // ═══════════════════════════════════════════════════════════
    // Infrastructure
    // ═══════════════════════════════════════════════════════════

    /// The backing store could not be reached or rejected the operation.
    #[error("Store error: {0}")]
    StoreUnavailable(String),

    /// The rate limiter's store failed. OTP issuance treats this as a
    /// denial (fail closed).
    #[error("Rate limiter unavailable: {0}")]
    RateLimitUnavailable(String),

    /// The email delivery collaborator failed; no code was delivered.
    #[error("Failed to send email: {0}")]
    DeliveryFailed(String),
}

impl AccessError {
    /// Returns `true` for expected, user-facing outcomes (validation,
    /// policy, not-found) as opposed to infrastructure faults.
    pub const fn is_expected(&self) -> bool {
        !self.is_infrastructure()
    }

    /// Returns `true` for infrastructure faults that should be logged with
    /// context and masked from end users.
    pub const fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::RateLimitUnavailable(_) | Self::DeliveryFailed(_)
        )
    }
}

impl UserFacingError for AccessError {
    fn is_expected(&self) -> bool {
        Self::is_expected(self)
    }

    fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_errors_are_expected() {
        assert!(AccessError::CodeExpired.is_expected());
        assert!(AccessError::CodeNotFound.is_expected());
        assert!(
            AccessError::RateLimited {
                retry_after: Duration::from_secs(60)
            }
            .is_expected()
        );
    }

    #[test]
    fn infrastructure_errors_are_not_expected() {
        assert!(AccessError::StoreUnavailable("down".into()).is_infrastructure());
        assert!(!AccessError::StoreUnavailable("down".into()).is_expected());
        assert!(AccessError::DeliveryFailed("smtp".into()).is_infrastructure());
    }

    #[test]
    fn rate_limited_message_includes_retry_hint() {
        let err = AccessError::RateLimited {
            retry_after: Duration::from_secs(90),
        };
        assert!(err.to_string().contains("90 seconds"));
    }
}
