//! One-time-passcode issuance and validation.
//!
//! The service is generic over its providers so the same logic runs against
//! in-memory mocks in tests and Redis-backed stores in production.
//!
//! # Security
//!
//! - Codes are 6 uniform random digits; only the SHA-256 hash is stored.
//! - Hashes are compared in constant time.
//! - Issuance is rate limited and fails **closed** when the limiter's store
//!   is down: no counter, no code.
//! - Validation is single-use, with a wrong-guess cap that consumes the
//!   record.

use chrono::{DateTime, Utc};
use gatekit_core::SessionId;
use std::net::IpAddr;

use crate::config::OtpConfig;
use crate::constants::actions;
use crate::error::{AccessError, Result};
use crate::providers::{
    EmailProvider, OtpPurpose, OtpRecord, OtpStore, RateLimitKey, RateLimiter,
    VerifiedSessionStore,
};
use crate::utils;

/// Receipt returned by a successful issuance.
///
/// Carries no secret material; the plaintext code only travels through the
/// delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    /// Opaque token identifying the delivery, for support tooling.
    pub delivery_token: String,

    /// When the code stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// OTP issuance and validation service.
pub struct OtpService<S, L, E, V> {
    store: S,
    limiter: L,
    email: E,
    sessions: V,
    config: OtpConfig,
}

impl<S, L, E, V> OtpService<S, L, E, V>
where
    S: OtpStore,
    L: RateLimiter,
    E: EmailProvider,
    V: VerifiedSessionStore,
{
    /// Create a service from its providers and configuration.
    pub const fn new(store: S, limiter: L, email: E, sessions: V, config: OtpConfig) -> Self {
        Self {
            store,
            limiter,
            email,
            sessions,
            config,
        }
    }

    /// Issue a fresh code for `(subject, purpose)` and hand it to the email
    /// collaborator.
    ///
    /// Any previously active code for the pair is superseded: only the
    /// latest issued code validates. The rate limiter is consulted first;
    /// on denial no code is generated or stored.
    ///
    /// `origin` is the caller's network address. Requests with no
    /// resolvable origin bypass rate limiting (accepted risk, see
    /// [`RateLimitKey::attributed`]).
    ///
    /// # Errors
    ///
    /// - [`AccessError::InvalidSubject`]: malformed email, checked before
    ///   any store access.
    /// - [`AccessError::RateLimited`]: quota exhausted; retry hint attached.
    /// - [`AccessError::RateLimitUnavailable`]: limiter store down; denied
    ///   (fail closed).
    /// - [`AccessError::StoreUnavailable`]: record write failed.
    /// - [`AccessError::DeliveryFailed`]: email collaborator failed; the
    ///   caller knows no code is on its way.
    pub async fn issue(
        &self,
        subject: &str,
        purpose: OtpPurpose,
        origin: Option<IpAddr>,
    ) -> Result<IssuedOtp> {
        let subject = utils::normalize_subject(subject);
        if !utils::is_valid_email(&subject) {
            return Err(AccessError::InvalidSubject);
        }

        match RateLimitKey::attributed(actions::OTP_REQUEST, &subject, origin) {
            Some(key) => match self
                .limiter
                .check_and_record(&key, self.config.issue_quota)
                .await
            {
                Ok(()) => {}
                Err(denied @ AccessError::RateLimited { .. }) => {
                    tracing::info!(subject = %subject, "OTP issuance rate limited");
                    return Err(denied);
                }
                // Fail closed: an unreachable counter must not become an
                // unmetered door to code issuance
                Err(e) => {
                    tracing::error!(subject = %subject, error = %e, "rate limiter unavailable, denying issuance");
                    return Err(AccessError::RateLimitUnavailable(e.to_string()));
                }
            },
            None => {
                tracing::debug!(subject = %subject, "no resolvable origin, skipping rate limit");
            }
        }

        let code = utils::generate_code();
        let record = OtpRecord::new(
            subject.clone(),
            purpose,
            utils::hash_code(&code),
            self.config.code_ttl,
        );
        let expires_at = record.expires_at;
        let delivery_token = record.id.to_string();

        self.store.put(record).await?;

        self.email
            .send_access_code(&subject, purpose, &code, expires_at)
            .await
            .map_err(|e| {
                tracing::error!(subject = %subject, error = %e, "access code delivery failed");
                e
            })?;

        tracing::info!(
            subject = %subject,
            purpose = %purpose,
            expires_at = %expires_at,
            "access code issued"
        );

        Ok(IssuedOtp {
            delivery_token,
            expires_at,
        })
    }

    /// Validate a submitted code and, on success, mark the caller's session
    /// as verified.
    ///
    /// Single-use: success consumes the record, so repeating the same
    /// correct code fails with [`AccessError::CodeNotFound`]. Each mismatch
    /// increments the record's attempt counter; reaching the cap consumes
    /// the record (consumed-but-failed) and the subject must request a new
    /// code.
    ///
    /// # Errors
    ///
    /// - [`AccessError::InvalidSubject`]: malformed email.
    /// - [`AccessError::CodeNotFound`]: no active record (never issued,
    ///   superseded, expired out of the query, or already consumed).
    /// - [`AccessError::CodeExpired`]: record exists but its TTL elapsed.
    /// - [`AccessError::CodeMismatch`]: wrong code, attempts remaining.
    /// - [`AccessError::TooManyFailedAttempts`]: wrong code, cap reached;
    ///   record consumed.
    /// - [`AccessError::StoreUnavailable`]: store failure.
    pub async fn validate(&self, subject: &str, code: &str, session: SessionId) -> Result<()> {
        let subject = utils::normalize_subject(subject);
        if !utils::is_valid_email(&subject) {
            return Err(AccessError::InvalidSubject);
        }

        let Some(record) = self.store.active_for_subject(&subject).await? else {
            tracing::debug!(subject = %subject, "validation with no active code");
            return Err(AccessError::CodeNotFound);
        };

        if record.is_expired(Utc::now()) {
            tracing::debug!(subject = %subject, "validation with expired code");
            return Err(AccessError::CodeExpired);
        }

        let submitted_hash = utils::hash_code(code.trim());
        if !constant_time_eq::constant_time_eq(
            submitted_hash.as_bytes(),
            record.code_hash.as_bytes(),
        ) {
            let attempts = self.store.record_failed_attempt(&record).await?;
            if attempts >= self.config.max_validation_attempts {
                self.store.mark_consumed(&record).await?;
                tracing::warn!(
                    subject = %subject,
                    attempts = attempts,
                    "attempt cap reached, code locked out"
                );
                return Err(AccessError::TooManyFailedAttempts);
            }
            tracing::debug!(subject = %subject, attempts = attempts, "code mismatch");
            return Err(AccessError::CodeMismatch);
        }

        self.store.mark_consumed(&record).await?;
        self.sessions
            .mark_verified(session, self.config.verified_session_ttl)
            .await?;

        tracing::info!(
            subject = %subject,
            purpose = %record.purpose,
            session = %session,
            "access code validated, session verified"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockEmailProvider, MockOtpStore, MockRateLimiter, MockSessionStore};

    fn service() -> (
        OtpService<MockOtpStore, MockRateLimiter, MockEmailProvider, MockSessionStore>,
        MockOtpStore,
        MockEmailProvider,
    ) {
        let store = MockOtpStore::new();
        let email = MockEmailProvider::new();
        let service = OtpService::new(
            store.clone(),
            MockRateLimiter::new(),
            email.clone(),
            MockSessionStore::new(),
            OtpConfig::default(),
        );
        (service, store, email)
    }

    #[tokio::test]
    async fn issue_rejects_malformed_subject_before_store_access() {
        let (service, store, _) = service();
        store.set_unavailable(true); // would error if touched

        let result = service
            .issue("not-an-email", OtpPurpose::Generic, None)
            .await;
        assert_eq!(result, Err(AccessError::InvalidSubject));
    }

    #[tokio::test]
    async fn issued_code_is_six_digits_and_hash_only_is_stored() {
        let (service, store, email) = service();

        service
            .issue("Staff@Example.com", OtpPurpose::Generic, None)
            .await
            .unwrap();

        let code = email.last_code_for("staff@example.com").unwrap();
        assert_eq!(code.len(), 6);

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_ne!(records[0].code_hash, code);
        assert_eq!(records[0].code_hash, utils::hash_code(&code));
    }

    #[tokio::test]
    async fn mismatch_increments_attempts_until_lockout() {
        let (service, store, email) = service();
        let session = SessionId::new();

        service
            .issue("staff@example.com", OtpPurpose::Generic, None)
            .await
            .unwrap();
        let code = email.last_code_for("staff@example.com").unwrap();
        let wrong = if code == "000000" { "000001" } else { "000000" };

        for _ in 0..4 {
            let result = service.validate("staff@example.com", wrong, session).await;
            assert_eq!(result, Err(AccessError::CodeMismatch));
        }

        // Fifth mismatch reaches the cap and consumes the record
        let result = service.validate("staff@example.com", wrong, session).await;
        assert_eq!(result, Err(AccessError::TooManyFailedAttempts));

        // Even the correct code no longer validates
        let result = service.validate("staff@example.com", &code, session).await;
        assert_eq!(result, Err(AccessError::CodeNotFound));

        let records = store.records();
        assert!(records[0].consumed);
        assert_eq!(records[0].attempts, 5);
    }

    #[tokio::test]
    async fn delivery_failure_propagates() {
        let (service, _, email) = service();
        email.set_fail_delivery(true);

        let result = service
            .issue("staff@example.com", OtpPurpose::Generic, None)
            .await;
        assert!(matches!(result, Err(AccessError::DeliveryFailed(_))));
    }
}
