//! Production store implementations.
//!
//! Redis-backed providers for the hot paths this subsystem owns: rate-limit
//! counters, OTP records and verified-session flags. All keys are
//! namespaced under `access:` to coexist in shared Redis instances.

pub mod otp_redis;
pub mod rate_limiter_redis;
pub mod session_redis;

pub use otp_redis::RedisOtpStore;
pub use rate_limiter_redis::RedisRateLimiter;
pub use session_redis::RedisSessionStore;
