//! # Gatekit Access Verification
//!
//! One-time-passcode issuance and validation for sensitive staff portals,
//! with sliding-window rate limiting and a session-level verification gate.
//!
//! ## Architecture
//!
//! The crate follows a providers/mocks/stores split:
//!
//! - [`providers`]: traits for every external dependency (OTP record store,
//!   rate limiter, email delivery, verified-session flags, settings), plus
//!   production email providers.
//! - [`mocks`]: in-memory implementations for tests and development
//!   (enabled by the default `test-utils` feature).
//! - [`stores`]: Redis-backed implementations for production.
//!
//! The services ([`OtpService`], [`VerificationGate`]) are generic over the
//! provider traits, so auth logic runs at memory speed in tests and against
//! Redis in production.
//!
//! ## Flow
//!
//! ```text
//! issue(subject) ──> RateLimiter ──> OtpStore (supersede + store hash)
//!                                        │
//!                                        └──> EmailProvider (plaintext code)
//!
//! validate(subject, code, session) ──> OtpStore (hash compare, single-use)
//!                                        │
//!                                        └──> VerifiedSessionStore (flag)
//!
//! VerificationGate::check(session) ──> SettingsProvider + verified flag
//! ```
//!
//! Expected failures (rate-limited, expired, mismatch, not-found) are
//! ordinary [`AccessError`] values, never panics; see [`error`] for the
//! taxonomy.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod constants;
pub mod error;
pub mod gate;
#[cfg(feature = "test-utils")]
pub mod mocks;
pub mod otp;
pub mod providers;
pub mod stores;
pub mod utils;

pub use config::{OtpConfig, RateLimitQuota};
pub use error::{AccessError, Result};
pub use gate::{GateDecision, VerificationGate};
pub use otp::{IssuedOtp, OtpService};
pub use providers::{OtpPurpose, OtpRecord};
