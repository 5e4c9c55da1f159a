//! Redemption providers.
//!
//! Store traits for the redemption engine and the verifier directory. The
//! document store behind them only needs three capabilities: point lookup
//! by id, query by indexed field, and an atomic conditional write over a
//! single document. [`TicketStore::claim`] is that conditional write.

pub mod directory;
pub mod scan_store;
pub mod ticket_store;

pub use directory::{AssignmentUpdate, StaffDirectory};
pub use scan_store::ScanStore;
pub use ticket_store::{ClaimOutcome, TicketStore};
