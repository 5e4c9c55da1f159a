//! Redis-based scan audit store.
//!
//! Scans append to a per-event list at `redemption:scans:{event_id}`
//! (RPUSH keeps them oldest-first). Records are JSON and never mutated.

use gatekit_core::EventId;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::error::{RedemptionError, Result};
use crate::providers::ScanStore;
use crate::types::VerificationScan;

/// Redis-backed scan store.
#[derive(Clone)]
pub struct RedisScanStore {
    conn_manager: ConnectionManager,
}

impl RedisScanStore {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` if the connection fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            RedemptionError::StoreUnavailable(format!("failed to create Redis client: {e}"))
        })?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            RedemptionError::StoreUnavailable(format!("failed to connect to Redis: {e}"))
        })?;

        Ok(Self { conn_manager })
    }

    fn event_key(event_id: EventId) -> String {
        format!("redemption:scans:{event_id}")
    }

    fn store_err(context: &str, e: &redis::RedisError) -> RedemptionError {
        RedemptionError::StoreUnavailable(format!("{context}: {e}"))
    }
}

impl ScanStore for RedisScanStore {
    async fn append(&self, scan: VerificationScan) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let payload = serde_json::to_string(&scan).map_err(|e| {
            RedemptionError::StoreUnavailable(format!("failed to encode scan: {e}"))
        })?;

        let _: () = conn
            .rpush(Self::event_key(scan.event_id), payload)
            .await
            .map_err(|e| Self::store_err("failed to append scan", &e))?;
        Ok(())
    }

    async fn for_event(&self, event_id: EventId) -> Result<Vec<VerificationScan>> {
        let mut conn = self.conn_manager.clone();
        let raw: Vec<String> = conn
            .lrange(Self::event_key(event_id), 0, -1)
            .await
            .map_err(|e| Self::store_err("failed to read scans", &e))?;

        raw.iter()
            .map(|entry| {
                serde_json::from_str(entry).map_err(|e| {
                    RedemptionError::StoreUnavailable(format!("failed to decode scan: {e}"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekit_core::{TicketId, UserId};
    use crate::types::RejectReason;

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn append_and_read_back_in_order() {
        let store = RedisScanStore::new("redis://127.0.0.1:6379").await.unwrap();
        let event = EventId::new();

        let first = VerificationScan::admitted(TicketId::new(), event, UserId::new());
        let second = VerificationScan::rejected(
            TicketId::new(),
            event,
            UserId::new(),
            RejectReason::AlreadyUsed,
        );

        store.append(first.clone()).await.unwrap();
        store.append(second.clone()).await.unwrap();

        let scans = store.for_event(event).await.unwrap();
        assert_eq!(scans, vec![first, second]);
    }
}
