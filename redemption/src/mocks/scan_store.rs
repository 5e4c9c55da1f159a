//! Mock scan store for testing.

use gatekit_core::EventId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{RedemptionError, Result};
use crate::providers::ScanStore;
use crate::types::VerificationScan;

/// In-memory append-only scan log.
#[derive(Debug, Clone, Default)]
pub struct MockScanStore {
    scans: Arc<Mutex<Vec<VerificationScan>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockScanStore {
    /// Create a new mock scan store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage (used to test that audit writes are
    /// best-effort).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of every recorded scan (for assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<VerificationScan> {
        #[allow(clippy::unwrap_used)]
        let scans = self.scans.lock().unwrap().clone();
        scans
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RedemptionError::StoreUnavailable(
                "simulated scan store outage".to_string(),
            ));
        }
        Ok(())
    }
}

impl ScanStore for MockScanStore {
    async fn append(&self, scan: VerificationScan) -> Result<()> {
        self.check_available()?;
        self.scans
            .lock()
            .map_err(|_| RedemptionError::StoreUnavailable("lock poisoned".to_string()))?
            .push(scan);
        Ok(())
    }

    async fn for_event(&self, event_id: EventId) -> Result<Vec<VerificationScan>> {
        self.check_available()?;
        Ok(self
            .scans
            .lock()
            .map_err(|_| RedemptionError::StoreUnavailable("lock poisoned".to_string()))?
            .iter()
            .filter(|s| s.event_id == event_id)
            .cloned()
            .collect())
    }
}
