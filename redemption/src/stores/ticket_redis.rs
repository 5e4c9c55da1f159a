//! Redis-based ticket store.
//!
//! Tickets live as JSON at `redemption:ticket:{id}`. The claim runs as a
//! server-side Lua script: Redis executes scripts atomically, so the
//! fetch/verify/commit sequence is a single isolated read-modify-write on
//! the one ticket key, the conditional-write primitive the redemption
//! engine requires. No key is touched outside the scanned ticket, so there
//! is no cross-ticket contention.

use chrono::{DateTime, SecondsFormat, Utc};
use gatekit_core::{EventId, TicketId, UserId};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};

use crate::error::{RedemptionError, Result};
use crate::providers::{ClaimOutcome, TicketStore};
use crate::types::Ticket;

/// Lua: atomic conditional transition unused → used.
///
/// Returns `{outcome}` or `{'ADMITTED', ticket_json}`.
const CLAIM_SCRIPT: &str = r"
local raw = redis.call('GET', KEYS[1])
if not raw then return {'NOT_FOUND'} end
local t = cjson.decode(raw)
if t.event_id ~= ARGV[1] then return {'WRONG_EVENT'} end
if t.status == 'used' then return {'ALREADY_USED'} end
t.status = 'used'
t.used_by = ARGV[2]
t.used_at = ARGV[3]
local encoded = cjson.encode(t)
redis.call('SET', KEYS[1], encoded)
return {'ADMITTED', encoded}
";

/// Redis-backed ticket store.
#[derive(Clone)]
pub struct RedisTicketStore {
    conn_manager: ConnectionManager,
}

impl RedisTicketStore {
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

    fn ticket_key(ticket_id: TicketId) -> String {
        format!("redemption:ticket:{ticket_id}")
    }

    fn store_err(context: &str, e: &redis::RedisError) -> RedemptionError {
        RedemptionError::StoreUnavailable(format!("{context}: {e}"))
    }

    fn decode(raw: &str) -> Result<Ticket> {
        serde_json::from_str(raw).map_err(|e| {
            RedemptionError::StoreUnavailable(format!("failed to decode ticket: {e}"))
        })
    }
}

impl TicketStore for RedisTicketStore {
    async fn put(&self, ticket: Ticket) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let payload = serde_json::to_string(&ticket).map_err(|e| {
            RedemptionError::StoreUnavailable(format!("failed to encode ticket: {e}"))
        })?;

        let _: () = conn
            .set(Self::ticket_key(ticket.id), payload)
            .await
            .map_err(|e| Self::store_err("failed to store ticket", &e))?;
        Ok(())
    }

    async fn get(&self, ticket_id: TicketId) -> Result<Option<Ticket>> {
        let mut conn = self.conn_manager.clone();
        let raw: Option<String> = conn
            .get(Self::ticket_key(ticket_id))
            .await
            .map_err(|e| Self::store_err("failed to read ticket", &e))?;

        raw.as_deref().map(Self::decode).transpose()
    }

    async fn claim(
        &self,
        ticket_id: TicketId,
        event_id: EventId,
        verifier_id: UserId,
        used_at: DateTime<Utc>,
    ) -> Result<ClaimOutcome> {
        let mut conn = self.conn_manager.clone();

        let reply: Vec<String> = Script::new(CLAIM_SCRIPT)
            .key(Self::ticket_key(ticket_id))
            .arg(event_id.to_string())
            .arg(verifier_id.to_string())
            .arg(used_at.to_rfc3339_opts(SecondsFormat::Micros, true))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Self::store_err("failed to claim ticket", &e))?;

        match reply.first().map(String::as_str) {
            Some("ADMITTED") => {
                let raw = reply.get(1).ok_or_else(|| {
                    RedemptionError::StoreUnavailable(
                        "claim script returned no ticket payload".to_string(),
                    )
                })?;
                Ok(ClaimOutcome::Admitted(Self::decode(raw)?))
            }
            Some("NOT_FOUND") => Ok(ClaimOutcome::NotFound),
            Some("WRONG_EVENT") => Ok(ClaimOutcome::WrongEvent),
            Some("ALREADY_USED") => Ok(ClaimOutcome::AlreadyUsed),
            other => Err(RedemptionError::StoreUnavailable(format!(
                "claim script returned unexpected outcome: {other:?}"
            ))),
        }
    }
}
