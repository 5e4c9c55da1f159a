//! Session-level verification gate for protected portals.
//!
//! Protected routes ask the gate whether to render or to demand a fresh OTP
//! challenge. The gate combines the product-wide `require_staff_verification`
//! setting with the per-session verified flag written by
//! [`crate::OtpService::validate`].

use gatekit_core::SessionId;

use crate::error::Result;
use crate::providers::{SettingsProvider, VerifiedSessionStore};

/// What a protected route should do for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the portal.
    Open,

    /// Block rendering and request a fresh OTP challenge.
    ChallengeRequired,
}

/// Verification gate.
///
/// # Failure posture
///
/// The two reads fail in opposite directions, deliberately:
/// - A settings outage means verification is treated as **not required**:
///   a broken settings store must never lock legitimate staff out.
/// - A verified-flag read failure means the session is treated as **not
///   satisfied**: re-challenging a verified user is an inconvenience, not
///   a breach.
#[derive(Debug, Clone)]
pub struct VerificationGate<V, P> {
    sessions: V,
    settings: P,
}

impl<V, P> VerificationGate<V, P>
where
    V: VerifiedSessionStore,
    P: SettingsProvider,
{
    /// Create a gate from its providers.
    pub const fn new(sessions: V, settings: P) -> Self {
        Self { sessions, settings }
    }

    /// Whether staff verification is currently required.
    ///
    /// Fail-safe default: `false` when settings cannot be read (logged at
    /// warn).
    pub async fn is_required(&self) -> bool {
        match self.settings.require_staff_verification().await {
            Ok(required) => required,
            Err(e) => {
                tracing::warn!(error = %e, "settings unavailable, verification not required (fail safe)");
                false
            }
        }
    }

    /// Whether this session holds an unexpired verified flag.
    ///
    /// A flag-store failure reads as unverified (logged at warn).
    pub async fn is_satisfied(&self, session: SessionId) -> bool {
        match self.sessions.is_verified(session).await {
            Ok(verified) => verified,
            Err(e) => {
                tracing::warn!(session = %session, error = %e, "verified-flag read failed, treating session as unverified");
                false
            }
        }
    }

    /// Combined decision for protected portal entry points.
    pub async fn check(&self, session: SessionId) -> GateDecision {
        if self.is_required().await && !self.is_satisfied(session).await {
            GateDecision::ChallengeRequired
        } else {
            GateDecision::Open
        }
    }

    /// Drop a session's verified flag (logout, admin revocation).
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when the flag store fails.
    pub async fn revoke(&self, session: SessionId) -> Result<()> {
        self.sessions.clear(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockSessionStore, MockSettings};
    use std::time::Duration;

    use crate::providers::VerifiedSessionStore as _;

    fn gate(
        required: bool,
    ) -> (
        VerificationGate<MockSessionStore, MockSettings>,
        MockSessionStore,
        MockSettings,
    ) {
        let sessions = MockSessionStore::new();
        let settings = MockSettings::new(required);
        (
            VerificationGate::new(sessions.clone(), settings.clone()),
            sessions,
            settings,
        )
    }

    #[tokio::test]
    async fn open_when_not_required() {
        let (gate, _, _) = gate(false);
        assert_eq!(gate.check(SessionId::new()).await, GateDecision::Open);
    }

    #[tokio::test]
    async fn challenge_when_required_and_unverified() {
        let (gate, _, _) = gate(true);
        assert_eq!(
            gate.check(SessionId::new()).await,
            GateDecision::ChallengeRequired
        );
    }

    #[tokio::test]
    async fn open_when_required_and_verified() {
        let (gate, sessions, _) = gate(true);
        let session = SessionId::new();
        sessions
            .mark_verified(session, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(gate.check(session).await, GateDecision::Open);
    }

    #[tokio::test]
    async fn settings_outage_fails_safe_to_open() {
        let (gate, _, settings) = gate(true);
        settings.set_unavailable(true);

        assert!(!gate.is_required().await);
        assert_eq!(gate.check(SessionId::new()).await, GateDecision::Open);
    }

    #[tokio::test]
    async fn flag_store_outage_requires_challenge() {
        let (gate, sessions, _) = gate(true);
        let session = SessionId::new();
        sessions
            .mark_verified(session, Duration::from_secs(60))
            .await
            .unwrap();
        sessions.set_unavailable(true);

        assert_eq!(gate.check(session).await, GateDecision::ChallengeRequired);
    }

    #[tokio::test]
    async fn revoke_clears_the_flag() {
        let (gate, sessions, _) = gate(true);
        let session = SessionId::new();
        sessions
            .mark_verified(session, Duration::from_secs(60))
            .await
            .unwrap();

        gate.revoke(session).await.unwrap();
        assert_eq!(gate.check(session).await, GateDecision::ChallengeRequired);
    }
}
