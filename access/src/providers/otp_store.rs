//! OTP record store trait and data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// Unique identifier for an OTP record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OtpId(pub uuid::Uuid);

impl OtpId {
    /// Generate a new random record id.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for OtpId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OtpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What the code authorizes once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Staff-portal entry.
    Generic,

    /// Seller payout request confirmation.
    PayoutRequest,
}

impl OtpPurpose {
    /// Stable string form, used in store keys and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::PayoutRequest => "payout_request",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored one-time passcode.
///
/// Only the SHA-256 hash of the code is persisted; the plaintext goes to
/// the delivery collaborator and is dropped. At most one record per
/// (subject, purpose) is *active* (unconsumed and unexpired) at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Record id.
    pub id: OtpId,

    /// Normalized subject (trimmed, lowercased email).
    pub subject: String,

    /// What the code authorizes.
    pub purpose: OtpPurpose,

    /// SHA-256 hex of the 6-digit code.
    pub code_hash: String,

    /// Creation time.
    pub created_at: DateTime<Utc>,

    /// `created_at` plus the configured TTL.
    pub expires_at: DateTime<Utc>,

    /// Set on successful validation, and on lockout after too many
    /// mismatches (consumed-but-failed).
    pub consumed: bool,

    /// Mismatched validation attempts so far.
    pub attempts: u32,
}

impl OtpRecord {
    /// Create a fresh record expiring `ttl` from now.
    #[must_use]
    pub fn new(subject: String, purpose: OtpPurpose, code_hash: String, ttl: Duration) -> Self {
        let created_at = Utc::now();
        // Out-of-range TTLs saturate instead of panicking
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|delta| created_at.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            id: OtpId::new(),
            subject,
            purpose,
            code_hash,
            created_at,
            expires_at,
            consumed: false,
            attempts: 0,
        }
    }

    /// Whether the record's TTL has elapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Unconsumed and unexpired at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && !self.is_expired(now)
    }
}

/// OTP record store.
///
/// # Implementation Notes
///
/// - Records are never physically deleted by this subsystem; retention and
///   cleanup belong to the store's operator. Expiry is passive (TTL
///   arithmetic, or store-level TTL where available).
/// - `put` supersedes: any prior active record for the same
///   (subject, purpose) must stop being returned by `active_for_subject`
///   once the new record is written.
/// - Two near-simultaneous `put` calls for the same pair may race; last
///   writer wins and earlier codes become unusable. That is acceptable
///   here: OTP issuance is not safety-critical the way ticket redemption
///   is.
pub trait OtpStore: Send + Sync {
    /// Store a new record, superseding prior active records for its
    /// (subject, purpose).
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the write fails.
    fn put(&self, record: OtpRecord) -> impl std::future::Future<Output = Result<()>> + Send;

    /// The most recently created active record for a subject, across
    /// purposes.
    ///
    /// Validation looks up by subject alone (the caller does not know the
    /// purpose); because issuance supersedes per pair and subjects rarely
    /// hold codes for two purposes at once, the latest active record is the
    /// one the subject was just emailed.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the query fails.
    fn active_for_subject(
        &self,
        subject: &str,
    ) -> impl std::future::Future<Output = Result<Option<OtpRecord>>> + Send;

    /// Increment the mismatch counter of `record`, returning the new count.
    ///
    /// The store locates the document by the record's subject and purpose
    /// and verifies its id, so a concurrently superseded record is never
    /// mutated.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the write fails, or when
    /// the record no longer exists (superseded concurrently).
    fn record_failed_attempt(
        &self,
        record: &OtpRecord,
    ) -> impl std::future::Future<Output = Result<u32>> + Send;

    /// Mark a record consumed: on success, and on lockout
    /// (consumed-but-failed).
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the write fails.
    fn mark_consumed(
        &self,
        record: &OtpRecord,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> OtpRecord {
        OtpRecord::new(
            "staff@example.com".to_string(),
            OtpPurpose::Generic,
            "deadbeef".to_string(),
            Duration::from_secs(600),
        )
    }

    #[test]
    fn fresh_record_is_active() {
        let r = record();
        assert!(r.is_active(Utc::now()));
        assert_eq!(r.attempts, 0);
        assert!(!r.consumed);
    }

    #[test]
    fn record_expires_by_ttl() {
        let r = record();
        let after_ttl = Utc::now() + chrono::Duration::seconds(660);
        assert!(!r.is_expired(Utc::now()));
        assert!(r.is_expired(after_ttl));
        assert!(!r.is_active(after_ttl));
    }

    #[test]
    fn consumed_record_is_inactive() {
        let mut r = record();
        r.consumed = true;
        assert!(!r.is_active(Utc::now()));
    }

    #[test]
    fn purpose_strings_are_stable() {
        assert_eq!(OtpPurpose::Generic.as_str(), "generic");
        assert_eq!(OtpPurpose::PayoutRequest.as_str(), "payout_request");
    }
}
