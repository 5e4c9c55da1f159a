//! Email delivery trait.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::providers::OtpPurpose;

/// Email delivery collaborator.
///
/// Abstracts over the outbound mail service. Delivery is best-effort from
/// the product's point of view, but a failure here propagates out of
/// `issue()` so the caller knows no code is on its way.
pub trait EmailProvider: Send + Sync {
    /// Send a one-time passcode to `to`.
    ///
    /// The message copy varies by `purpose` (portal entry vs payout
    /// confirmation); the plaintext `code` appears only in this message and
    /// is never persisted.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::DeliveryFailed` if the mail service rejects
    /// the message or cannot be reached.
    fn send_access_code(
        &self,
        to: &str,
        purpose: OtpPurpose,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
