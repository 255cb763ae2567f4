//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `bicycle`: Bicycle records, type/condition/status enums, search filter
//! - `member`: Member records
//! - `rental`: Rental rows and upsert drafts
//! - `rate`: Daily rental rates and currencies
//! - `dates`: Date parsing and formatting at the record boundary
//! - `command`: Rent and return requests
//! - `error`: Error types for the rental engine

pub mod bicycle;
pub mod command;
pub mod dates;
pub mod error;
pub mod member;
pub mod rate;
pub mod rental;

pub use bicycle::{Bicycle, BicycleFilter, BicycleId, BicycleStatus, BicycleType, Condition};
pub use command::{CommandType, DeskCommand};
pub use dates::{days_between, format_date, parse_date, parse_optional_date, RecordDate};
pub use error::{ErrorKind, RentalError};
pub use member::{Member, MemberId};
pub use rate::{Currency, RentalRate};
pub use rental::{RecordChange, Rental, RentalDraft, RentalId};
