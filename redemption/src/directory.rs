//! Verifier directory: role elevation and per-event stats.

use gatekit_core::EventId;
use std::sync::Arc;

use crate::error::{RedemptionError, Result};
use crate::providers::{ScanStore, StaffDirectory};
use crate::stats::{self, EventScanStats};
use crate::types::Role;
use crate::watch::{RoleObserver, Watchers};

/// Result of assigning a user as verifier for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Assigned user's username.
    pub username: String,

    /// Role after the assignment.
    pub role: Role,

    /// The event assigned.
    pub event_id: EventId,

    /// `false` when the user already had this event (no-op success).
    pub newly_assigned: bool,

    /// Whether this assignment elevated the role.
    pub role_elevated: bool,
}

/// Verifier directory service.
///
/// Wraps the staff directory with the two operations this subsystem owns:
/// assigning verifiers (monotonic, idempotent) and aggregating their scan
/// activity.
pub struct VerifierDirectory<D, S> {
    directory: D,
    scans: S,
    watchers: Watchers<dyn RoleObserver>,
}

impl<D, S> VerifierDirectory<D, S>
where
    D: StaffDirectory,
    S: ScanStore,
{
    /// Create a directory service over the given stores.
    #[must_use]
    pub fn new(directory: D, scans: S) -> Self {
        Self {
            directory,
            scans,
            watchers: Watchers::new(),
        }
    }

    /// Register a role observer (session refreshers, notifiers).
    pub fn subscribe(&self, observer: Arc<dyn RoleObserver>) {
        self.watchers.subscribe(observer);
    }

    /// Assign a user, looked up by username, as verifier for `event_id`.
    ///
    /// An `attendee` is upgraded to `verifier`; higher roles are kept as
    /// they are. The event is added to the user's assigned set. Both happen
    /// in one directory write. Re-assigning an already-assigned verifier is
    /// a no-op success.
    ///
    /// Role observers are notified once per actual elevation.
    ///
    /// # Errors
    ///
    /// - [`RedemptionError::InvalidUsername`]: blank username, rejected
    ///   before any store access.
    /// - [`RedemptionError::UserNotFound`]: no user with that username.
    /// - [`RedemptionError::StoreUnavailable`]: directory failure.
    pub async fn assign(&self, username: &str, event_id: EventId) -> Result<Assignment> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RedemptionError::InvalidUsername);
        }

        let Some(user) = self.directory.find_by_username(username).await? else {
            tracing::debug!(username = %username, "verifier assignment for unknown username");
            return Err(RedemptionError::UserNotFound);
        };

        let update = self.directory.assign_event(user.user_id, event_id).await?;

        if update.role_elevated {
            tracing::info!(
                username = %update.user.username,
                previous_role = ?update.previous_role,
                role = ?update.user.role,
                event_id = %event_id,
                "user elevated to verifier"
            );
            self.watchers
                .notify(|o| o.role_elevated(&update.user, update.previous_role));
        } else {
            tracing::debug!(
                username = %update.user.username,
                event_id = %event_id,
                newly_assigned = update.newly_assigned,
                "verifier assignment"
            );
        }

        Ok(Assignment {
            username: update.user.username,
            role: update.user.role,
            event_id,
            newly_assigned: update.newly_assigned,
            role_elevated: update.role_elevated,
        })
    }

    /// Scan statistics for an event: rollup plus per-assigned-verifier
    /// breakdown.
    ///
    /// Pure read-side aggregation over existing scan records.
    ///
    /// # Errors
    ///
    /// Returns [`RedemptionError::StoreUnavailable`] when either store
    /// fails.
    pub async fn stats(&self, event_id: EventId) -> Result<EventScanStats> {
        let scans = self.scans.for_event(event_id).await?;
        let verifiers = self.directory.verifiers_for_event(event_id).await?;
        Ok(stats::aggregate(event_id, &scans, &verifiers))
    }
}
