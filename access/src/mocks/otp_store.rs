//! Mock OTP record store for testing.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{AccessError, Result};
use crate::providers::{OtpRecord, OtpStore};

/// In-memory OTP store.
///
/// Keeps full record history (records are superseded, never deleted),
/// matching the retention behavior expected of the real document store.
#[derive(Debug, Clone, Default)]
pub struct MockOtpStore {
    records: Arc<Mutex<Vec<OtpRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockOtpStore {
    /// Create a new mock OTP store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of all records, including consumed ones (for assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn records(&self) -> Vec<OtpRecord> {
        #[allow(clippy::unwrap_used)]
        let records = self.records.lock().unwrap().clone();
        records
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AccessError::StoreUnavailable(
                "simulated OTP store outage".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<OtpRecord>>> {
        self.records
            .lock()
            .map_err(|_| AccessError::StoreUnavailable("lock poisoned".to_string()))
    }
}

impl OtpStore for MockOtpStore {
    async fn put(&self, record: OtpRecord) -> Result<()> {
        self.check_available()?;
        let mut records = self.lock()?;

        // Supersede: prior active records for this (subject, purpose) stop
        // being returned by active_for_subject
        for existing in records.iter_mut() {
            if existing.subject == record.subject
                && existing.purpose == record.purpose
                && !existing.consumed
            {
                existing.consumed = true;
            }
        }

        records.push(record);
        Ok(())
    }

    async fn active_for_subject(&self, subject: &str) -> Result<Option<OtpRecord>> {
        self.check_available()?;
        let records = self.lock()?;
        let now = Utc::now();

        Ok(records
            .iter()
            .filter(|r| r.subject == subject && r.is_active(now))
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn record_failed_attempt(&self, record: &OtpRecord) -> Result<u32> {
        self.check_available()?;
        let id = record.id;
        let mut records = self.lock()?;

        let stored = records.iter_mut().find(|r| r.id == id).ok_or_else(|| {
            AccessError::StoreUnavailable(format!("OTP record {id} no longer exists"))
        })?;
        stored.attempts += 1;
        Ok(stored.attempts)
    }

    async fn mark_consumed(&self, record: &OtpRecord) -> Result<()> {
        self.check_available()?;
        let id = record.id;
        let mut records = self.lock()?;

        let stored = records.iter_mut().find(|r| r.id == id).ok_or_else(|| {
            AccessError::StoreUnavailable(format!("OTP record {id} no longer exists"))
        })?;
        stored.consumed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::OtpPurpose;
    use std::time::Duration;

    fn record(subject: &str, purpose: OtpPurpose) -> OtpRecord {
        OtpRecord::new(
            subject.to_string(),
            purpose,
            "cafe".to_string(),
            Duration::from_secs(600),
        )
    }

    #[tokio::test]
    async fn put_then_fetch_active() {
        let store = MockOtpStore::new();
        let r = record("staff@example.com", OtpPurpose::Generic);
        store.put(r.clone()).await.unwrap();

        let active = store.active_for_subject("staff@example.com").await.unwrap();
        assert_eq!(active.map(|a| a.id), Some(r.id));
    }

    #[tokio::test]
    async fn put_supersedes_same_pair() {
        let store = MockOtpStore::new();
        let first = record("staff@example.com", OtpPurpose::Generic);
        let second = record("staff@example.com", OtpPurpose::Generic);

        store.put(first.clone()).await.unwrap();
        store.put(second.clone()).await.unwrap();

        let active = store.active_for_subject("staff@example.com").await.unwrap();
        assert_eq!(active.map(|a| a.id), Some(second.id));

        // History is retained, not deleted
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn different_purposes_do_not_supersede_each_other() {
        let store = MockOtpStore::new();
        let generic = record("seller@example.com", OtpPurpose::Generic);
        let payout = record("seller@example.com", OtpPurpose::PayoutRequest);

        store.put(generic.clone()).await.unwrap();
        store.put(payout.clone()).await.unwrap();

        let records = store.records();
        let stored_generic = records.iter().find(|r| r.id == generic.id).unwrap();
        assert!(!stored_generic.consumed);
    }

    #[tokio::test]
    async fn consumed_records_are_not_active() {
        let store = MockOtpStore::new();
        let r = record("staff@example.com", OtpPurpose::Generic);
        store.put(r.clone()).await.unwrap();
        store.mark_consumed(&r).await.unwrap();

        assert!(store
            .active_for_subject("staff@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn failed_attempts_accumulate() {
        let store = MockOtpStore::new();
        let r = record("staff@example.com", OtpPurpose::Generic);
        store.put(r.clone()).await.unwrap();

        assert_eq!(store.record_failed_attempt(&r).await.unwrap(), 1);
        assert_eq!(store.record_failed_attempt(&r).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn outage_surfaces_store_error() {
        let store = MockOtpStore::new();
        store.set_unavailable(true);

        let result = store.active_for_subject("staff@example.com").await;
        assert!(matches!(result, Err(AccessError::StoreUnavailable(_))));
    }
}
