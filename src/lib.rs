//! Bicycle Rental Engine Library
//! # Overview
//!
//! This library runs a bicycle rental shop from CSV records: it rents and
//! returns bicycles under membership rules, charges late fees and damage, and
//! recommends which bicycles to buy within a budget. Commands are processed
//! with either a sync or an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Bicycle, Member, Rental, RentalRate, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - The rental desk routing rent and return commands
//!   - [`core::record_store`] - Record storage with staged transactions
//!   - [`core::membership`] - Membership validity and rental limits
//!   - [`core::recommendation`] - Purchase scoring and budget allocation
//! - [`io`] - CSV reading and writing, data directory loading and saving
//! - [`report`] - Status counts and inventory search
//! - [`strategy`] - Pluggable sync and async processing pipelines
//!
//! # Commands
//!
//! - **Rent**: Hand an Available bicycle to a member with a valid membership
//!   and spare rental allowance
//! - **Return**: Close the open rental, charge a late fee of
//!   `late_days * (daily rate + 5)` plus any damage charge, and mark the
//!   bicycle Available, or Unavailable and Damaged when a damage charge applies
//!
//! # Bicycle Statuses
//!
//! Every bicycle is always in exactly one [`BicycleStatus`]: `Available`,
//! `Rented`, `UnderMaintenance` (written as "Under maintenance") or
//! `Unavailable`.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod report;
pub mod strategy;
pub mod types;

pub use core::{InMemoryRecordStore, RecordStore, RentalDesk};
pub use io::{write_outcomes_csv, DataFiles};
pub use types::{
    Bicycle, BicycleId, BicycleStatus, DeskCommand, Member, MemberId, Rental, RentalError,
    RentalRate,
};
