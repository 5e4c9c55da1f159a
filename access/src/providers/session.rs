//! Verified-session flag store trait.

use gatekit_core::SessionId;
use std::time::Duration;

use crate::error::Result;

/// Per-session verified flag with TTL.
///
/// A successful OTP validation writes the flag; the verification gate reads
/// it. Flags are ephemeral: they expire with
/// [`crate::config::OtpConfig::verified_session_ttl`] and die with the
/// session.
pub trait VerifiedSessionStore: Send + Sync {
    /// Mark a session as verified for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the write fails.
    fn mark_verified(
        &self,
        session: SessionId,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Whether a session currently holds an unexpired verified flag.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the read fails.
    fn is_verified(
        &self,
        session: SessionId,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Drop the flag (logout, admin revocation).
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the write fails.
    fn clear(&self, session: SessionId) -> impl std::future::Future<Output = Result<()>> + Send;
}
