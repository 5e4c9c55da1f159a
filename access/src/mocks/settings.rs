//! Mock settings provider for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{AccessError, Result};
use crate::providers::SettingsProvider;

/// Toggleable settings with a simulated-outage switch.
#[derive(Debug, Clone, Default)]
pub struct MockSettings {
    required: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
}

impl MockSettings {
    /// Create settings with the verification flag set as given.
    #[must_use]
    pub fn new(require_staff_verification: bool) -> Self {
        let settings = Self::default();
        settings
            .required
            .store(require_staff_verification, Ordering::SeqCst);
        settings
    }

    /// Flip the verification requirement.
    pub fn set_required(&self, required: bool) {
        self.required.store(required, Ordering::SeqCst);
    }

    /// Simulate a settings outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl SettingsProvider for MockSettings {
    async fn require_staff_verification(&self) -> Result<bool> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AccessError::StoreUnavailable(
                "simulated settings outage".to_string(),
            ));
        }
        Ok(self.required.load(Ordering::SeqCst))
    }
}
