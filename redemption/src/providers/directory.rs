//! Staff directory trait.

use gatekit_core::{EventId, UserId};

use crate::error::Result;
use crate::types::{Role, StaffUser};

/// Result of a single-write event assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentUpdate {
    /// The user as committed.
    pub user: StaffUser,

    /// Role before the write.
    pub previous_role: Role,

    /// Whether the write elevated the role (attendee → verifier).
    pub role_elevated: bool,

    /// Whether the event was newly added to the assigned set.
    pub newly_assigned: bool,
}

/// Staff directory.
///
/// Abstracts over the marketplace's user collection. This subsystem only
/// reads users and performs the one monotonic write described by
/// [`StaffDirectory::assign_event`]; everything else about users belongs to
/// the surrounding product.
pub trait StaffDirectory: Send + Sync {
    /// Look a user up by username.
    ///
    /// Usernames are assumed unique; implementations must enforce that, as
    /// a duplicate would make role elevation ambiguous.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` when the query fails.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<StaffUser>>> + Send;

    /// Assign `event_id` to a user, upgrading the role to at least
    /// `verifier`, in one write.
    ///
    /// Monotonic and idempotent: an already-elevated role is kept, an
    /// already-assigned event stays assigned exactly once
    /// (`newly_assigned == false`).
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::UserNotFound` if the user vanished between
    /// lookup and write, `RedemptionError::StoreUnavailable` on store
    /// failure.
    fn assign_event(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> impl std::future::Future<Output = Result<AssignmentUpdate>> + Send;

    /// All users with `event_id` in their assigned set.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` when the query fails.
    fn verifiers_for_event(
        &self,
        event_id: EventId,
    ) -> impl std::future::Future<Output = Result<Vec<StaffUser>>> + Send;
}
