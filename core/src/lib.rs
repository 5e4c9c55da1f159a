//! # Gatekit Core
//!
//! Shared building blocks for the access-verification and ticket-redemption
//! crates: strongly-typed identifiers and the uniform response envelope
//! returned to callers.
//!
//! Expected failures (not-found, expired, rate-limited, already-used) are
//! ordinary results in this workspace, never faults. The [`ApiResponse`]
//! envelope encodes that contract at the boundary: callers branch on
//! `success`, not on exceptions.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod ids;
pub mod response;

pub use ids::{EventId, SessionId, TicketId, UserId};
pub use response::{ApiResponse, UserFacingError};
