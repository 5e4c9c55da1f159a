//! Scan audit store trait.

use gatekit_core::EventId;

use crate::error::Result;
use crate::types::VerificationScan;

/// Append-only store of scan records.
///
/// Records are immutable once written; there is no update or delete. The
/// stats rollup reads them back by event.
pub trait ScanStore: Send + Sync {
    /// Append one scan record.
    ///
    /// Callers on the redemption path treat failures as best-effort: the
    /// scan decision has already been made and returned, so an audit write
    /// failure is logged, never surfaced to the verifier.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` when the write fails.
    fn append(
        &self,
        scan: VerificationScan,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// All scan records for an event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` when the query fails.
    fn for_event(
        &self,
        event_id: EventId,
    ) -> impl std::future::Future<Output = Result<Vec<VerificationScan>>> + Send;
}
