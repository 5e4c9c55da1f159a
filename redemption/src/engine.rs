//! Redemption engine: the atomic scan decision plus its audit trail.

use chrono::Utc;
use gatekit_core::{EventId, TicketId, UserId};
use std::sync::Arc;

use crate::error::Result;
use crate::providers::{ClaimOutcome, ScanStore, TicketStore};
use crate::types::{RejectReason, VerificationScan};
use crate::watch::{ScanObserver, Watchers};

/// Ticket redemption engine.
///
/// Per ticket the state machine is `unused --scan(success)--> used`, with
/// `used` terminal: every later scan of the same ticket reports
/// `ALREADY_USED`. The transition itself happens inside
/// [`TicketStore::claim`], the store's single-document atomic write, so the
/// engine never holds a lock and never races.
///
/// Every scan, admitted or rejected, appends one [`VerificationScan`] to
/// the audit store. That append is best-effort: it is attempted after the
/// decision is committed, and a failure is logged without disturbing the
/// decision already made.
pub struct RedemptionEngine<T, S> {
    tickets: T,
    scans: S,
    watchers: Watchers<dyn ScanObserver>,
}

impl<T, S> RedemptionEngine<T, S>
where
    T: TicketStore,
    S: ScanStore,
{
    /// Create an engine over the given stores.
    #[must_use]
    pub fn new(tickets: T, scans: S) -> Self {
        Self {
            tickets,
            scans,
            watchers: Watchers::new(),
        }
    }

    /// Register a scan observer (dashboards, live counters).
    pub fn subscribe(&self, observer: Arc<dyn ScanObserver>) {
        self.watchers.subscribe(observer);
    }

    /// Redeem a scanned ticket for `event_id`.
    ///
    /// Outcomes, in check order inside the atomic claim:
    /// 1. unknown ticket → failure, `TICKET_NOT_FOUND`
    /// 2. ticket for a different event → failure, `WRONG_EVENT` (no
    ///    mutation)
    /// 3. already used → failure, `ALREADY_USED` (idempotent under
    ///    concurrent duplicate scans: exactly one scanner observes success)
    /// 4. otherwise commit `used, used_at, used_by` → success
    ///
    /// The returned record is the same one appended to the audit trail.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` only when the ticket
    /// store itself fails; every expected outcome is a
    /// [`VerificationScan`], not an error. Audit-store failures never
    /// surface here.
    pub async fn redeem(
        &self,
        ticket_id: TicketId,
        event_id: EventId,
        verifier_id: UserId,
    ) -> Result<VerificationScan> {
        let outcome = self
            .tickets
            .claim(ticket_id, event_id, verifier_id, Utc::now())
            .await?;

        let scan = match outcome {
            ClaimOutcome::Admitted(ticket) => {
                tracing::info!(
                    ticket_id = %ticket.id,
                    event_id = %event_id,
                    verifier_id = %verifier_id,
                    "ticket admitted"
                );
                VerificationScan::admitted(ticket_id, event_id, verifier_id)
            }
            ClaimOutcome::NotFound => {
                tracing::debug!(ticket_id = %ticket_id, "scan of unknown ticket");
                VerificationScan::rejected(
                    ticket_id,
                    event_id,
                    verifier_id,
                    RejectReason::TicketNotFound,
                )
            }
            ClaimOutcome::WrongEvent => {
                tracing::debug!(
                    ticket_id = %ticket_id,
                    event_id = %event_id,
                    "scan of ticket for a different event"
                );
                VerificationScan::rejected(
                    ticket_id,
                    event_id,
                    verifier_id,
                    RejectReason::WrongEvent,
                )
            }
            ClaimOutcome::AlreadyUsed => {
                tracing::debug!(ticket_id = %ticket_id, "scan of already-used ticket");
                VerificationScan::rejected(
                    ticket_id,
                    event_id,
                    verifier_id,
                    RejectReason::AlreadyUsed,
                )
            }
        };

        // Best-effort audit: the decision above is already final, so a
        // failed append is logged, never propagated to the verifier
        if let Err(e) = self.scans.append(scan.clone()).await {
            tracing::warn!(
                ticket_id = %ticket_id,
                event_id = %event_id,
                error = %e,
                "scan audit write failed"
            );
        }

        self.watchers.notify(|o| o.scan_recorded(&scan));

        Ok(scan)
    }
}
