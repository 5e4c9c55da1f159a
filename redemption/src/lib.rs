//! # Gatekit Ticket Redemption
//!
//! QR-ticket redemption at event doors, verifier role management, and the
//! append-only scan audit trail with its read-side stats rollup.
//!
//! ## The core property
//!
//! Many verifier devices scan concurrently; each ticket is admitted
//! **exactly once**. The unused→used transition runs as a single atomic
//! claim inside the ticket store ([`providers::TicketStore::claim`]): a
//! mutex-guarded check-and-set in memory, a server-side Lua script on
//! Redis, never a read followed by an unguarded write. Under N
//! concurrent scans of one ticket, exactly one observes `Admitted` and N−1
//! observe `AlreadyUsed`, regardless of scheduling.
//!
//! ## Architecture
//!
//! - [`providers`]: store traits (tickets, scans, staff directory).
//! - [`mocks`]: in-memory implementations (default `test-utils` feature).
//! - [`stores`]: Redis-backed implementations.
//! - [`RedemptionEngine`]: the scan decision plus best-effort audit.
//! - [`VerifierDirectory`]: monotonic role elevation and per-event stats.
//! - [`watch`]: observer interfaces replacing live store listeners.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod directory;
pub mod engine;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mocks;
pub mod providers;
pub mod stats;
pub mod stores;
pub mod types;
pub mod watch;

pub use directory::{Assignment, VerifierDirectory};
pub use engine::RedemptionEngine;
pub use error::{RedemptionError, Result};
pub use stats::{EventScanStats, VerifierScanStats};
pub use types::{RejectReason, Role, ScanResult, StaffUser, Ticket, TicketStatus, VerificationScan};
pub use watch::{RoleObserver, ScanObserver, Watchers};
