//! Core traits for record storage and time
//!
//! This module defines the record store contract the rental and return
//! engines depend on, the all-or-nothing transaction helper built on it, and
//! the clock abstraction that supplies "today".

use crate::types::{
    Bicycle, BicycleFilter, BicycleId, BicycleStatus, Condition, Member, MemberId,
    RecordChange, Rental, RentalDraft, RentalError, RentalId,
};
use chrono::NaiveDate;
use tracing::warn;

/// Which rental rows count against a member's rental limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RentalCountScope {
    /// Every rental row associated with the member, open or closed
    #[default]
    AllHistory,
    /// Only rentals that have not been returned
    OpenOnly,
}

/// Storage for bicycles, members and rentals
///
/// Reads observe pending writes of the current transaction. Writes are only
/// accepted between [`RecordStore::begin`] and [`RecordStore::commit`]; a
/// [`RecordStore::rollback`] discards them.
pub trait RecordStore {
    fn get_bicycle(&self, id: BicycleId) -> Option<Bicycle>;

    fn get_member(&self, id: MemberId) -> Option<Member>;

    /// The bicycle's most recent rental row, open or closed
    fn get_rental(&self, bicycle_id: BicycleId) -> Option<Rental>;

    /// The bicycle's open rental row, if it is out
    fn get_open_rental(&self, bicycle_id: BicycleId) -> Option<Rental>;

    /// Reuse the bicycle's rental row or insert a new one
    ///
    /// A reused row takes the draft's member and dates and is reopened.
    fn upsert_rental(&mut self, draft: RentalDraft) -> Result<RecordChange, RentalError>;

    /// Record the actual return date on a rental row
    fn close_rental(&mut self, id: RentalId, returned_on: NaiveDate) -> Result<(), RentalError>;

    /// Set a bicycle's status, and its condition when one is given
    fn set_bicycle_status(
        &mut self,
        id: BicycleId,
        status: BicycleStatus,
        condition: Option<Condition>,
    ) -> Result<(), RentalError>;

    fn count_rentals_for_member(&self, member_id: MemberId, scope: RentalCountScope) -> usize;

    /// All bicycles ordered by id
    fn list_bicycles(&self) -> Vec<Bicycle>;

    /// All members ordered by id
    fn list_members(&self) -> Vec<Member>;

    /// All rental rows ordered by id
    fn list_rentals(&self) -> Vec<Rental>;

    /// Bicycle id of every open rental row, duplicates included
    fn list_open_rental_bicycle_ids(&self) -> Vec<BicycleId>;

    /// Bicycles matching the filter, ordered by id
    fn search_bicycles(&self, filter: &BicycleFilter) -> Vec<Bicycle> {
        self.list_bicycles()
            .into_iter()
            .filter(|bicycle| filter.matches(bicycle))
            .collect()
    }

    fn begin(&mut self) -> Result<(), RentalError>;

    fn commit(&mut self) -> Result<(), RentalError>;

    fn rollback(&mut self);
}

/// Run `f` inside a store transaction
///
/// Commits when `f` succeeds. When `f` or the commit fails, the transaction is
/// rolled back and the error returned, so the store is left at its previous
/// committed state.
pub fn atomically<S, T, F>(store: &mut S, operation: &str, f: F) -> Result<T, RentalError>
where
    S: RecordStore + ?Sized,
    F: FnOnce(&mut S) -> Result<T, RentalError>,
{
    store.begin()?;

    let value = match f(store) {
        Ok(value) => value,
        Err(e) => {
            warn!(operation, error = %e, "rolling back transaction");
            store.rollback();
            return Err(e);
        }
    };

    if let Err(e) = store.commit() {
        warn!(operation, error = %e, "commit failed, rolling back");
        store.rollback();
        return Err(e);
    }

    Ok(value)
}

/// Source of the current date
pub trait Clock: std::fmt::Debug {
    fn today(&self) -> NaiveDate;
}

/// Reads the local system date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
