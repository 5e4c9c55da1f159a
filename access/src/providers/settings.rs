//! Settings provider trait.
//!
//! The `require_staff_verification` flag used to be read from ambient
//! global settings; here it is an injected provider so the gate's fail-safe
//! behavior is explicit and testable.

use crate::error::Result;

/// Read-only product settings consulted by the verification gate.
pub trait SettingsProvider: Send + Sync {
    /// Whether staff must pass OTP verification before entering protected
    /// portals.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::StoreUnavailable` when settings cannot be
    /// read. The gate treats that as *not required* (fail safe) so a
    /// settings outage never locks out legitimate staff.
    fn require_staff_verification(&self)
        -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// Fixed settings, for deployments that configure the flag at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSettings {
    require_staff_verification: bool,
}

impl StaticSettings {
    /// Create fixed settings.
    #[must_use]
    pub const fn new(require_staff_verification: bool) -> Self {
        Self {
            require_staff_verification,
        }
    }
}

impl SettingsProvider for StaticSettings {
    async fn require_staff_verification(&self) -> Result<bool> {
        Ok(self.require_staff_verification)
    }
}
