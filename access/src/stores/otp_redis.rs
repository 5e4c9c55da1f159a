//! Redis-based OTP record store.
//!
//! The active record for a subject lives at `access:otp:{subject}` as JSON
//! with a TTL matching its expiry, so supersession is a plain overwrite and
//! expiry is handled by Redis. Mutations (attempt counter, consumed flag)
//! run as server-side Lua guarded by record id, so a record superseded
//! between read and write is never touched.
//!
//! Retention note: unlike document-store deployments, which keep consumed
//! records for audit, this store lets records lapse with their TTL; Redis
//! is the ephemeral deployment option.

use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};

use crate::error::{AccessError, Result};
use crate::providers::{OtpRecord, OtpStore};

/// Lua: increment `attempts` if the stored record's id matches, preserving
/// the key's TTL. Returns the new count, or -1 when the record is gone or
/// superseded.
const RECORD_ATTEMPT_SCRIPT: &str = r"
local raw = redis.call('GET', KEYS[1])
if not raw then return -1 end
local rec = cjson.decode(raw)
if rec.id ~= ARGV[1] then return -1 end
rec.attempts = rec.attempts + 1
local ttl = redis.call('TTL', KEYS[1])
if ttl > 0 then
  redis.call('SET', KEYS[1], cjson.encode(rec), 'EX', ttl)
else
  redis.call('SET', KEYS[1], cjson.encode(rec))
end
return rec.attempts
";

/// Lua: set `consumed` if the stored record's id matches, preserving the
/// key's TTL. Returns 1 on success, 0 when the record is gone or superseded.
const MARK_CONSUMED_SCRIPT: &str = r"
local raw = redis.call('GET', KEYS[1])
if not raw then return 0 end
local rec = cjson.decode(raw)
if rec.id ~= ARGV[1] then return 0 end
rec.consumed = true
local ttl = redis.call('TTL', KEYS[1])
if ttl > 0 then
  redis.call('SET', KEYS[1], cjson.encode(rec), 'EX', ttl)
else
  redis.call('SET', KEYS[1], cjson.encode(rec))
end
return 1
";

/// Redis-backed OTP store.
#[derive(Clone)]
pub struct RedisOtpStore {
    conn_manager: ConnectionManager,
}

impl RedisOtpStore {
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

    fn record_key(subject: &str) -> String {
        format!("access:otp:{subject}")
    }

    fn store_err(context: &str, e: &redis::RedisError) -> AccessError {
        AccessError::StoreUnavailable(format!("{context}: {e}"))
    }
}

impl OtpStore for RedisOtpStore {
    async fn put(&self, record: OtpRecord) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let key = Self::record_key(&record.subject);

        let payload = serde_json::to_string(&record)
            .map_err(|e| AccessError::StoreUnavailable(format!("failed to encode record: {e}")))?;

        let ttl = record.expires_at.signed_duration_since(Utc::now());
        let ttl_seconds = u64::try_from(ttl.num_seconds()).unwrap_or(0).max(1);

        // SET with EX overwrites any prior active record: supersession and
        // expiry in one write
        let _: () = conn
            .set_ex(&key, payload, ttl_seconds)
            .await
            .map_err(|e| Self::store_err("failed to store OTP record", &e))?;

        tracing::debug!(
            subject = %record.subject,
            purpose = %record.purpose,
            ttl_seconds = ttl_seconds,
            "stored OTP record"
        );

        Ok(())
    }

    async fn active_for_subject(&self, subject: &str) -> Result<Option<OtpRecord>> {
        let mut conn = self.conn_manager.clone();
        let raw: Option<String> = conn
            .get(Self::record_key(subject))
            .await
            .map_err(|e| Self::store_err("failed to read OTP record", &e))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let record: OtpRecord = serde_json::from_str(&raw)
            .map_err(|e| AccessError::StoreUnavailable(format!("failed to decode record: {e}")))?;

        Ok(record.is_active(Utc::now()).then_some(record))
    }

    async fn record_failed_attempt(&self, record: &OtpRecord) -> Result<u32> {
        let mut conn = self.conn_manager.clone();
        let attempts: i64 = Script::new(RECORD_ATTEMPT_SCRIPT)
            .key(Self::record_key(&record.subject))
            .arg(record.id.to_string())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Self::store_err("failed to record attempt", &e))?;

        u32::try_from(attempts).map_err(|_| {
            AccessError::StoreUnavailable(format!("OTP record {} no longer exists", record.id))
        })
    }

    async fn mark_consumed(&self, record: &OtpRecord) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let updated: i64 = Script::new(MARK_CONSUMED_SCRIPT)
            .key(Self::record_key(&record.subject))
            .arg(record.id.to_string())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Self::store_err("failed to mark record consumed", &e))?;

        if updated == 0 {
            // Superseded concurrently; the new record is the active one and
            // this one can no longer validate anyway
            tracing::debug!(
                subject = %record.subject,
                id = %record.id,
                "mark_consumed found record already superseded"
            );
        }

        Ok(())
    }
}
