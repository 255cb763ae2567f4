//! Rental records
//!
//! A rental row ties a bicycle to a member for a period. It is opened by a
//! successful rent and closed, never deleted, by a successful return.

use super::bicycle::BicycleId;
use super::dates::RecordDate;
use super::member::MemberId;
use chrono::NaiveDate;

/// Rental identifier
pub type RentalId = u32;

/// A rental row as held by the record store
///
/// Imported dates that failed to parse are kept as [`RecordDate::Malformed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    pub id: RentalId,
    pub bicycle_id: BicycleId,
    pub member_id: MemberId,
    pub rental_date: RecordDate,
    pub expected_return_date: RecordDate,

    /// Set when the bicycle comes back; `None` while the rental is open
    pub returned_on: Option<RecordDate>,
}

impl Rental {
    /// Whether the bicycle is still out on this rental
    pub fn is_open(&self) -> bool {
        self.returned_on.is_none()
    }
}

/// Rental details written by a rent transaction
///
/// The store decides whether this reuses the bicycle's existing row or
/// inserts a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalDraft {
    pub bicycle_id: BicycleId,
    pub member_id: MemberId,
    pub rental_date: NaiveDate,
    pub expected_return_date: NaiveDate,
}

/// How an upsert landed in the rental table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordChange {
    Inserted,
    Updated,
}

impl RecordChange {
    pub fn describe(self) -> &'static str {
        match self {
            RecordChange::Inserted => "Rental details added successfully.",
            RecordChange::Updated => "Rental details updated successfully.",
        }
    }
}
