//! Production store implementations.
//!
//! Redis-backed ticket and scan stores. The staff directory has no store
//! here on purpose: the user collection belongs to the marketplace's user
//! domain and is wired in by the application.

pub mod scan_redis;
pub mod ticket_redis;

pub use scan_redis::RedisScanStore;
pub use ticket_redis::RedisTicketStore;
