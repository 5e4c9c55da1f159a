//! Domain types for tickets, scans and staff roles.

use chrono::{DateTime, Utc};
use gatekit_core::{EventId, TicketId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// Tickets
// ═══════════════════════════════════════════════════════════════════════

/// Ticket lifecycle state.
///
/// `Unused` transitions to `Used` exactly once, never back. The redemption
/// engine is the only writer of this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Not yet redeemed.
    Unused,

    /// Redeemed; terminal.
    Used,
}

/// A ticket as stored in the ticketing domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket id (the QR payload).
    pub id: TicketId,

    /// Event this ticket admits to.
    pub event_id: EventId,

    /// Purchasing user.
    pub owner_id: UserId,

    /// Lifecycle state.
    pub status: TicketStatus,

    /// Set when redeemed.
    pub used_at: Option<DateTime<Utc>>,

    /// Verifier who redeemed it.
    pub used_by: Option<UserId>,
}

impl Ticket {
    /// Create a fresh, unused ticket.
    #[must_use]
    pub fn new(event_id: EventId, owner_id: UserId) -> Self {
        Self {
            id: TicketId::new(),
            event_id,
            owner_id,
            status: TicketStatus::Unused,
            used_at: None,
            used_by: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Scans
// ═══════════════════════════════════════════════════════════════════════

/// Outcome class of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanResult {
    /// The ticket was admitted.
    Success,

    /// The ticket was rejected; see the reason code.
    Failure,
}

/// Why a scan was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// No ticket with the scanned id exists.
    TicketNotFound,

    /// The ticket exists but belongs to a different event.
    WrongEvent,

    /// The ticket was already redeemed.
    AlreadyUsed,
}

impl RejectReason {
    /// Stable wire/reporting code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TicketNotFound => "TICKET_NOT_FOUND",
            Self::WrongEvent => "WRONG_EVENT",
            Self::AlreadyUsed => "ALREADY_USED",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Append-only audit record of one scan attempt, success or failure.
///
/// Immutable once written. This doubles as the value returned to the
/// scanning device, so the audit trail and the reported outcome can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationScan {
    /// Scanned ticket id.
    pub ticket_id: TicketId,

    /// Event the verifier is scanning for.
    pub event_id: EventId,

    /// Scanning verifier.
    pub verifier_id: UserId,

    /// Outcome class.
    pub result: ScanResult,

    /// Reject reason; `None` on success.
    pub reason: Option<RejectReason>,

    /// When the scan was decided.
    pub timestamp: DateTime<Utc>,
}

impl VerificationScan {
    /// Successful scan record.
    #[must_use]
    pub fn admitted(ticket_id: TicketId, event_id: EventId, verifier_id: UserId) -> Self {
        Self {
            ticket_id,
            event_id,
            verifier_id,
            result: ScanResult::Success,
            reason: None,
            timestamp: Utc::now(),
        }
    }

    /// Rejected scan record.
    #[must_use]
    pub fn rejected(
        ticket_id: TicketId,
        event_id: EventId,
        verifier_id: UserId,
        reason: RejectReason,
    ) -> Self {
        Self {
            ticket_id,
            event_id,
            verifier_id,
            result: ScanResult::Failure,
            reason: Some(reason),
            timestamp: Utc::now(),
        }
    }

    /// Whether the ticket was admitted.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.result, ScanResult::Success)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Staff
// ═══════════════════════════════════════════════════════════════════════

/// User role, ordered by privilege.
///
/// This subsystem only ever upgrades roles (attendee → verifier), never
/// downgrades them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Regular ticket buyer.
    Attendee,

    /// May scan tickets for assigned events.
    Verifier,

    /// Runs events.
    Organizer,

    /// Marketplace administrator.
    Admin,

    /// Root administrator.
    SuperAdmin,
}

impl Role {
    /// Monotonic upgrade: the more privileged of the two roles.
    #[must_use]
    pub fn at_least(self, floor: Self) -> Self {
        self.max(floor)
    }

    /// Whether the role may scan tickets.
    #[must_use]
    pub fn can_verify(self) -> bool {
        self >= Self::Verifier
    }
}

/// A user as seen by the verifier directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    /// User id.
    pub user_id: UserId,

    /// Operator-facing login name. Assumed unique; see
    /// [`crate::providers::StaffDirectory::find_by_username`].
    pub username: String,

    /// Contact email.
    pub email: String,

    /// Current role.
    pub role: Role,

    /// Events this user may verify.
    pub assigned_events: BTreeSet<EventId>,
}

impl StaffUser {
    /// Create an attendee with no assignments.
    #[must_use]
    pub fn attendee(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(),
            username: username.into(),
            email: email.into(),
            role: Role::Attendee,
            assigned_events: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_upgrade_is_monotonic() {
        assert_eq!(Role::Attendee.at_least(Role::Verifier), Role::Verifier);
        assert_eq!(Role::Organizer.at_least(Role::Verifier), Role::Organizer);
        assert_eq!(Role::SuperAdmin.at_least(Role::Verifier), Role::SuperAdmin);
    }

    #[test]
    fn verification_privilege() {
        assert!(!Role::Attendee.can_verify());
        assert!(Role::Verifier.can_verify());
        assert!(Role::Admin.can_verify());
    }

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(RejectReason::TicketNotFound.code(), "TICKET_NOT_FOUND");
        assert_eq!(RejectReason::WrongEvent.code(), "WRONG_EVENT");
        assert_eq!(RejectReason::AlreadyUsed.code(), "ALREADY_USED");
    }

    #[test]
    fn ticket_serializes_with_lowercase_status() {
        let ticket = Ticket::new(EventId::new(), UserId::new());
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["status"], "unused");
        assert!(json["used_at"].is_null());
    }

    #[test]
    fn role_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(Role::SuperAdmin).unwrap(),
            serde_json::json!("super-admin")
        );
    }
}
