// Service exports
pub mod json;
pub mod memory;
pub mod rounds;
pub mod store;

pub use json::{JsonHistoryStore, JsonRosterStore};
pub use memory::{MemoryHistoryStore, MemoryRosterStore};
pub use rounds::{validate_identity, validate_roster, RoundService, ServiceError};
pub use store::{HistoryStore, RosterStore, StoreError};
