//! Mock providers for testing.
//!
//! In-memory implementations of every provider trait. Each store mock can
//! simulate an outage via `set_unavailable(true)`, which makes all
//! operations return `AccessError::StoreUnavailable`, used to test the
//! fail-open/fail-closed call-site policies.

pub mod email;
pub mod otp_store;
pub mod rate_limiter;
pub mod session;
pub mod settings;

pub use email::{MockEmailProvider, SentCode};
pub use otp_store::MockOtpStore;
pub use rate_limiter::MockRateLimiter;
pub use session::MockSessionStore;
pub use settings::MockSettings;
