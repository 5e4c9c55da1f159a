//! Redis-based verified-session flag store.
//!
//! One key per verified session, `access:verified:{session}`, with the
//! flag's TTL delegated to Redis key expiry.

use gatekit_core::SessionId;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

use crate::error::{AccessError, Result};
use crate::providers::VerifiedSessionStore;

/// Redis-backed verified-session flags.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn_manager: ConnectionManager,
}

impl RedisSessionStore {
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

    fn flag_key(session: SessionId) -> String {
        format!("access:verified:{session}")
    }

    fn store_err(context: &str, e: &redis::RedisError) -> AccessError {
        AccessError::StoreUnavailable(format!("{context}: {e}"))
    }
}

impl VerifiedSessionStore for RedisSessionStore {
    async fn mark_verified(&self, session: SessionId, ttl: Duration) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .set_ex(Self::flag_key(session), 1, ttl.as_secs().max(1))
            .await
            .map_err(|e| Self::store_err("failed to mark session verified", &e))?;
        Ok(())
    }

    async fn is_verified(&self, session: SessionId) -> Result<bool> {
        let mut conn = self.conn_manager.clone();
        conn.exists(Self::flag_key(session))
            .await
            .map_err(|e| Self::store_err("failed to read verified flag", &e))
    }

    async fn clear(&self, session: SessionId) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .del(Self::flag_key(session))
            .await
            .map_err(|e| Self::store_err("failed to clear verified flag", &e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn flag_round_trip() {
        let store = RedisSessionStore::new("redis://127.0.0.1:6379")
            .await
            .unwrap();
        let session = SessionId::new();

        assert!(!store.is_verified(session).await.unwrap());

        store
            .mark_verified(session, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(store.is_verified(session).await.unwrap());

        store.clear(session).await.unwrap();
        assert!(!store.is_verified(session).await.unwrap());
    }
}
