//! Mock ticket store for testing.

use chrono::{DateTime, Utc};
use gatekit_core::{EventId, TicketId, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{RedemptionError, Result};
use crate::providers::{ClaimOutcome, TicketStore};
use crate::types::{Ticket, TicketStatus};

/// In-memory ticket store.
///
/// The claim runs entirely under one mutex guard, the in-memory
/// equivalent of a single-document conditional write, giving the same
/// exactly-once guarantee under concurrency.
#[derive(Debug, Clone, Default)]
pub struct MockTicketStore {
    tickets: Arc<Mutex<HashMap<TicketId, Ticket>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockTicketStore {
    /// Create a new mock ticket store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RedemptionError::StoreUnavailable(
                "simulated ticket store outage".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TicketId, Ticket>>> {
        self.tickets
            .lock()
            .map_err(|_| RedemptionError::StoreUnavailable("lock poisoned".to_string()))
    }
}

impl TicketStore for MockTicketStore {
    async fn put(&self, ticket: Ticket) -> Result<()> {
        self.check_available()?;
        self.lock()?.insert(ticket.id, ticket);
        Ok(())
    }

    async fn get(&self, ticket_id: TicketId) -> Result<Option<Ticket>> {
        self.check_available()?;
        Ok(self.lock()?.get(&ticket_id).cloned())
    }

    async fn claim(
        &self,
        ticket_id: TicketId,
        event_id: EventId,
        verifier_id: UserId,
        used_at: DateTime<Utc>,
    ) -> Result<ClaimOutcome> {
        self.check_available()?;

        // Check-and-set under one guard: the atomic unit
        let mut tickets = self.lock()?;

        let Some(ticket) = tickets.get_mut(&ticket_id) else {
            return Ok(ClaimOutcome::NotFound);
        };

        if ticket.event_id != event_id {
            return Ok(ClaimOutcome::WrongEvent);
        }

        if ticket.status == TicketStatus::Used {
            return Ok(ClaimOutcome::AlreadyUsed);
        }

        ticket.status = TicketStatus::Used;
        ticket.used_at = Some(used_at);
        ticket.used_by = Some(verifier_id);

        Ok(ClaimOutcome::Admitted(ticket.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn claim_admits_unused_ticket() {
        let store = MockTicketStore::new();
        let ticket = Ticket::new(EventId::new(), UserId::new());
        let verifier = UserId::new();
        store.put(ticket.clone()).await.unwrap();

        let outcome = store
            .claim(ticket.id, ticket.event_id, verifier, Utc::now())
            .await
            .unwrap();

        match outcome {
            ClaimOutcome::Admitted(committed) => {
                assert_eq!(committed.status, TicketStatus::Used);
                assert_eq!(committed.used_by, Some(verifier));
                assert!(committed.used_at.is_some());
            }
            other => panic!("expected Admitted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn claim_rejects_unknown_ticket() {
        let store = MockTicketStore::new();
        let outcome = store
            .claim(TicketId::new(), EventId::new(), UserId::new(), Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, ClaimOutcome::NotFound);
    }

    #[tokio::test]
    async fn claim_rejects_wrong_event_without_mutating() {
        let store = MockTicketStore::new();
        let ticket = Ticket::new(EventId::new(), UserId::new());
        store.put(ticket.clone()).await.unwrap();

        let outcome = store
            .claim(ticket.id, EventId::new(), UserId::new(), Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, ClaimOutcome::WrongEvent);

        let stored = store.get(ticket.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TicketStatus::Unused);
        assert!(stored.used_by.is_none());
    }

    #[tokio::test]
    async fn second_claim_sees_already_used() {
        let store = MockTicketStore::new();
        let ticket = Ticket::new(EventId::new(), UserId::new());
        store.put(ticket.clone()).await.unwrap();

        let first = store
            .claim(ticket.id, ticket.event_id, UserId::new(), Utc::now())
            .await
            .unwrap();
        assert!(matches!(first, ClaimOutcome::Admitted(_)));

        let second = store
            .claim(ticket.id, ticket.event_id, UserId::new(), Utc::now())
            .await
            .unwrap();
        assert_eq!(second, ClaimOutcome::AlreadyUsed);
    }

    #[tokio::test]
    async fn concurrent_claims_admit_exactly_once() {
        let store = MockTicketStore::new();
        let ticket = Ticket::new(EventId::new(), UserId::new());
        store.put(ticket.clone()).await.unwrap();

        let (a, b) = tokio::join!(
            store.claim(ticket.id, ticket.event_id, UserId::new(), Utc::now()),
            store.claim(ticket.id, ticket.event_id, UserId::new(), Utc::now()),
        );

        let admitted = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|o| matches!(o, ClaimOutcome::Admitted(_)))
            .count();
        assert_eq!(admitted, 1, "exactly one concurrent claim should admit");
    }
}
