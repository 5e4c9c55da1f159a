//! Ticket store trait.

use chrono::{DateTime, Utc};
use gatekit_core::{EventId, TicketId, UserId};

use crate::error::Result;
use crate::types::Ticket;

/// Outcome of an atomic claim attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The ticket was unused and is now marked used; the returned ticket
    /// reflects the committed state.
    Admitted(Ticket),

    /// No ticket with that id exists.
    NotFound,

    /// The ticket belongs to a different event. Nothing was mutated.
    WrongEvent,

    /// The ticket was already used. Nothing was mutated.
    AlreadyUsed,
}

/// Ticket store.
///
/// # Implementation Notes
///
/// **CRITICAL**: [`TicketStore::claim`] is the subsystem's one cross-call
/// exclusion point and MUST execute as a single isolated read-modify-write
/// scoped to the one ticket document:
///
/// - In-memory: check-and-set under one mutex guard
/// - `Redis`: server-side Lua script (single-key, atomic by execution model)
/// - Document stores: the native conditional-write/transaction primitive,
///   or an optimistic-concurrency retry loop
///
/// A plain read followed by an unguarded write is a race: two concurrent
/// scans of the same ticket would both admit. No global lock is acceptable
/// either; contention is per ticket.
pub trait TicketStore: Send + Sync {
    /// Insert or replace a ticket (inventory import, test seeding).
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` when the write fails.
    fn put(&self, ticket: Ticket) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Point lookup by id.
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` when the read fails.
    fn get(
        &self,
        ticket_id: TicketId,
    ) -> impl std::future::Future<Output = Result<Option<Ticket>>> + Send;

    /// Atomically claim a ticket for `event_id`.
    ///
    /// In one isolated step: fetch the ticket, verify it belongs to
    /// `event_id`, verify it is unused, and commit
    /// `status = used, used_at, used_by`. Under N concurrent claims of one
    /// ticket exactly one returns [`ClaimOutcome::Admitted`]; the rest
    /// return [`ClaimOutcome::AlreadyUsed`].
    ///
    /// # Errors
    ///
    /// Returns `RedemptionError::StoreUnavailable` when the store fails;
    /// expected rejections are [`ClaimOutcome`] values, not errors.
    fn claim(
        &self,
        ticket_id: TicketId,
        event_id: EventId,
        verifier_id: UserId,
        used_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<ClaimOutcome>> + Send;
}
