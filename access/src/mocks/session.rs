//! Mock verified-session store for testing.

use gatekit_core::SessionId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{AccessError, Result};
use crate::providers::VerifiedSessionStore;

/// In-memory verified-session flags with TTL.
#[derive(Debug, Clone, Default)]
pub struct MockSessionStore {
    flags: Arc<Mutex<HashMap<SessionId, Instant>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockSessionStore {
    /// Create a new mock session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AccessError::StoreUnavailable(
                "simulated session store outage".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<SessionId, Instant>>> {
        self.flags
            .lock()
            .map_err(|_| AccessError::StoreUnavailable("lock poisoned".to_string()))
    }
}

impl VerifiedSessionStore for MockSessionStore {
    async fn mark_verified(&self, session: SessionId, ttl: Duration) -> Result<()> {
        self.check_available()?;
        self.lock()?.insert(session, Instant::now() + ttl);
        Ok(())
    }

    async fn is_verified(&self, session: SessionId) -> Result<bool> {
        self.check_available()?;
        Ok(self
            .lock()?
            .get(&session)
            .is_some_and(|expiry| *expiry > Instant::now()))
    }

    async fn clear(&self, session: SessionId) -> Result<()> {
        self.check_available()?;
        self.lock()?.remove(&session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_session_is_not_verified() {
        let store = MockSessionStore::new();
        assert!(!store.is_verified(SessionId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn marked_session_is_verified_until_cleared() {
        let store = MockSessionStore::new();
        let session = SessionId::new();

        store
            .mark_verified(session, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(store.is_verified(session).await.unwrap());

        store.clear(session).await.unwrap();
        assert!(!store.is_verified(session).await.unwrap());
    }

    #[tokio::test]
    async fn flag_expires_by_ttl() {
        let store = MockSessionStore::new();
        let session = SessionId::new();

        store
            .mark_verified(session, Duration::from_millis(50))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!store.is_verified(session).await.unwrap());
    }
}
