//! Core business logic module
//!
//! This module contains the rental shop's core components:
//! - `traits` - Record store, transaction helper and clock abstractions
//! - `record_store` - In-memory record store with staged transactions
//! - `membership` - Membership registry and rental eligibility checks
//! - `engine` - The rental desk applying rent and return requests
//! - `rental` - Rent workflow
//! - `returns` - Return workflow, late fees and damage handling
//! - `recommendation` - Purchase scoring and budget allocation

pub mod engine;
pub mod membership;
pub mod recommendation;
pub mod record_store;
pub mod rental;
pub mod returns;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use engine::{CommandOutcome, DeskOutcome, RentalDesk};
pub use membership::{MembershipRegistry, MembershipValidator, RentalUsage};
pub use recommendation::{
    allocate, recommend, score, score_inventory, OrderLine, PurchaseOrder, ScoredBicycle,
    MAX_UNITS_PER_MODEL,
};
pub use record_store::InMemoryRecordStore;
pub use rental::RentalConfirmation;
pub use returns::{LateFee, ReturnSummary, LATE_SURCHARGE_PER_DAY};
pub use traits::{atomically, Clock, FixedClock, RecordStore, RentalCountScope, SystemClock};
