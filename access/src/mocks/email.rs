//! Mock email provider for testing.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{AccessError, Result};
use crate::providers::{EmailProvider, OtpPurpose};

/// A code the mock "delivered".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    /// Recipient address.
    pub to: String,

    /// Purpose of the code.
    pub purpose: OtpPurpose,

    /// Plaintext code as it would appear in the email.
    pub code: String,

    /// Code expiry communicated to the recipient.
    pub expires_at: DateTime<Utc>,
}

/// Records delivered codes instead of sending mail.
#[derive(Debug, Clone, Default)]
pub struct MockEmailProvider {
    sent: Arc<Mutex<Vec<SentCode>>>,
    fail_delivery: Arc<AtomicBool>,
}

impl MockEmailProvider {
    /// Create a new mock email provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail with `DeliveryFailed`.
    pub fn set_fail_delivery(&self, fail: bool) {
        self.fail_delivery.store(fail, Ordering::SeqCst);
    }

    /// All codes delivered so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<SentCode> {
        #[allow(clippy::unwrap_used)]
        let sent = self.sent.lock().unwrap().clone();
        sent
    }

    /// The most recent plaintext code delivered to `to`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        #[allow(clippy::unwrap_used)]
        let sent = self.sent.lock().unwrap();
        sent.iter().rev().find(|s| s.to == to).map(|s| s.code.clone())
    }
}

impl EmailProvider for MockEmailProvider {
    async fn send_access_code(
        &self,
        to: &str,
        purpose: OtpPurpose,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        if self.fail_delivery.load(Ordering::SeqCst) {
            return Err(AccessError::DeliveryFailed(
                "simulated delivery failure".to_string(),
            ));
        }

        self.sent
            .lock()
            .map_err(|_| AccessError::StoreUnavailable("lock poisoned".to_string()))?
            .push(SentCode {
                to: to.to_string(),
                purpose,
                code: code.to_string(),
                expires_at,
            });
        Ok(())
    }
}
