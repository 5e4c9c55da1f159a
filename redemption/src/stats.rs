//! Read-side rollup over scan records.

use gatekit_core::{EventId, UserId};
use serde::{Deserialize, Serialize};

use crate::types::{StaffUser, VerificationScan};

/// Per-verifier scan counts for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierScanStats {
    /// Verifier user id.
    pub verifier_id: UserId,

    /// Verifier username, for display.
    pub username: String,

    /// All scans by this verifier for the event.
    pub total: u64,

    /// Scans that admitted a ticket.
    pub admitted: u64,

    /// Scans that were rejected.
    pub rejected: u64,
}

/// Event-level rollup plus per-assigned-verifier breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventScanStats {
    /// The event.
    pub event_id: EventId,

    /// All scans recorded for the event, by any verifier.
    pub total: u64,

    /// Admitted scans.
    pub admitted: u64,

    /// Rejected scans.
    pub rejected: u64,

    /// Breakdown per assigned verifier, sorted by username.
    pub verifiers: Vec<VerifierScanStats>,
}

/// Aggregate scan records for an event.
///
/// The event rollup counts every scan; the per-verifier breakdown covers
/// the currently assigned verifiers (scans by since-unlisted staff still
/// count toward the rollup).
#[must_use]
pub fn aggregate(
    event_id: EventId,
    scans: &[VerificationScan],
    verifiers: &[StaffUser],
) -> EventScanStats {
    let mut per_verifier: Vec<VerifierScanStats> = verifiers
        .iter()
        .map(|v| {
            let mine = scans.iter().filter(|s| s.verifier_id == v.user_id);
            let (mut admitted, mut rejected) = (0u64, 0u64);
            for scan in mine {
                if scan.is_success() {
                    admitted += 1;
                } else {
                    rejected += 1;
                }
            }
            VerifierScanStats {
                verifier_id: v.user_id,
                username: v.username.clone(),
                total: admitted + rejected,
                admitted,
                rejected,
            }
        })
        .collect();
    per_verifier.sort_by(|a, b| a.username.cmp(&b.username));

    let admitted = scans.iter().filter(|s| s.is_success()).count() as u64;
    let total = scans.len() as u64;

    EventScanStats {
        event_id,
        total,
        admitted,
        rejected: total - admitted,
        verifiers: per_verifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RejectReason, Role, StaffUser};
    use gatekit_core::TicketId;

    fn verifier(username: &str) -> StaffUser {
        let mut user = StaffUser::attendee(username, format!("{username}@example.com"));
        user.role = Role::Verifier;
        user
    }

    #[test]
    fn empty_event_has_zero_counts() {
        let stats = aggregate(EventId::new(), &[], &[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.admitted, 0);
        assert_eq!(stats.rejected, 0);
        assert!(stats.verifiers.is_empty());
    }

    #[test]
    fn counts_split_per_verifier() {
        let event = EventId::new();
        let alice = verifier("alice");
        let bob = verifier("bob");

        let scans = vec![
            VerificationScan::admitted(TicketId::new(), event, alice.user_id),
            VerificationScan::admitted(TicketId::new(), event, alice.user_id),
            VerificationScan::rejected(
                TicketId::new(),
                event,
                bob.user_id,
                RejectReason::AlreadyUsed,
            ),
        ];

        let stats = aggregate(event, &scans, &[bob.clone(), alice.clone()]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.admitted, 2);
        assert_eq!(stats.rejected, 1);

        // Sorted by username
        assert_eq!(stats.verifiers[0].username, "alice");
        assert_eq!(stats.verifiers[0].admitted, 2);
        assert_eq!(stats.verifiers[0].rejected, 0);
        assert_eq!(stats.verifiers[1].username, "bob");
        assert_eq!(stats.verifiers[1].total, 1);
        assert_eq!(stats.verifiers[1].rejected, 1);
    }

    #[test]
    fn unassigned_scanners_still_count_in_the_rollup() {
        let event = EventId::new();
        let ghost = UserId::new();
        let scans = vec![VerificationScan::admitted(TicketId::new(), event, ghost)];

        let stats = aggregate(event, &scans, &[]);
        assert_eq!(stats.total, 1);
        assert!(stats.verifiers.is_empty());
    }
}
