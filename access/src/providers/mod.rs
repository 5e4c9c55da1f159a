//! Access-verification providers.
//!
//! Traits for every external dependency of the OTP service and the
//! verification gate. Providers are **interfaces**, not implementations:
//! the services depend on these traits, and the application wires in
//! concrete implementations.
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic and fast ([`crate::mocks`])
//! - **Production**: Redis-backed stores ([`crate::stores`]) and SMTP email
//! - **Development**: the console email provider

pub mod console_email;
pub mod email;
pub mod otp_store;
pub mod rate_limiter;
pub mod session;
pub mod settings;
pub mod smtp_email;

pub use console_email::ConsoleEmailProvider;
pub use email::EmailProvider;
pub use otp_store::{OtpId, OtpPurpose, OtpRecord, OtpStore};
pub use rate_limiter::{check_best_effort, RateLimitKey, RateLimiter};
pub use session::VerifiedSessionStore;
pub use settings::{SettingsProvider, StaticSettings};
pub use smtp_email::SmtpEmailProvider;
