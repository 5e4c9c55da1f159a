//! Error types for redemption and verifier-directory operations.
//!
//! Note that scan rejections (`TICKET_NOT_FOUND`, `WRONG_EVENT`,
//! `ALREADY_USED`) are **not** errors; they are ordinary
//! [`crate::types::VerificationScan`] outcomes. This enum covers input
//! validation, directory lookups and infrastructure faults only.

use gatekit_core::UserFacingError;
use thiserror::Error;

/// Result type alias for redemption operations.
pub type Result<T> = std::result::Result<T, RedemptionError>;

/// Error taxonomy for the redemption crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RedemptionError {
    // ═══════════════════════════════════════════════════════════
    // Validation
    // ═══════════════════════════════════════════════════════════

    /// Username is missing or blank.
    #[error("A username is required")]
    InvalidUsername,

    // ═══════════════════════════════════════════════════════════
    // Not Found
    // ═══════════════════════════════════════════════════════════

    /// No user record matches the given username.
    #[error("No user found with that username")]
    UserNotFound,

    // ═══════════════════════════════════════════════════════════
    // Infrastructure
    // ═══════════════════════════════════════════════════════════

    /// The backing store could not be reached or rejected the operation.
    #[error("Store error: {0}")]
    StoreUnavailable(String),
}

impl RedemptionError {
    /// Returns `true` for expected, user-facing outcomes.
    pub const fn is_expected(&self) -> bool {
        !self.is_infrastructure()
    }

    /// Returns `true` for infrastructure faults that should be logged with
    /// context and masked from end users.
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl UserFacingError for RedemptionError {
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
    fn categories() {
        assert!(RedemptionError::UserNotFound.is_expected());
        assert!(RedemptionError::InvalidUsername.is_expected());
        assert!(RedemptionError::StoreUnavailable("down".into()).is_infrastructure());
    }
}
