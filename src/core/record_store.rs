//! In-memory record store
//!
//! This module provides `InMemoryRecordStore`, the record store used by the
//! CLI. It keeps a committed copy of the bicycle, member and rental tables and,
//! while a transaction is open, a pending copy that receives every write.
//! Commit swaps the pending tables in; rollback drops them.
//!
//! # Seeding
//!
//! Stores are built from already-parsed records with [`InMemoryRecordStore::seed`].
//! If a duplicate id is encountered, only the first occurrence is kept.

use crate::core::traits::{RecordStore, RentalCountScope};
use crate::types::{
    Bicycle, BicycleId, BicycleStatus, Condition, Member, MemberId, RecordChange, Rental,
    RentalDraft, RentalError, RentalId,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
struct Tables {
    bicycles: BTreeMap<BicycleId, Bicycle>,
    members: BTreeMap<MemberId, Member>,
    rentals: BTreeMap<RentalId, Rental>,
    next_rental_id: RentalId,
}

/// Record store holding every table in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    committed: Tables,

    /// Working copy of the tables while a transaction is open
    pending: Option<Tables>,
}

impl InMemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from imported records
    ///
    /// Duplicate ids keep their first occurrence. A bicycle with more than one
    /// open rental row is logged, since renting and returning only ever touch
    /// its most recent row.
    pub fn seed(
        bicycles: impl IntoIterator<Item = Bicycle>,
        members: impl IntoIterator<Item = Member>,
        rentals: impl IntoIterator<Item = Rental>,
    ) -> Self {
        let mut tables = Tables::default();

        for bicycle in bicycles {
            if tables.bicycles.contains_key(&bicycle.id) {
                warn!(bicycle = bicycle.id, "duplicate bicycle id ignored");
                continue;
            }
            tables.bicycles.insert(bicycle.id, bicycle);
        }

        for member in members {
            if tables.members.contains_key(&member.id) {
                warn!(member = member.id, "duplicate member id ignored");
                continue;
            }
            tables.members.insert(member.id, member);
        }

        let mut open_per_bicycle: HashMap<BicycleId, usize> = HashMap::new();
        for rental in rentals {
            if tables.rentals.contains_key(&rental.id) {
                warn!(rental = rental.id, "duplicate rental id ignored");
                continue;
            }
            if rental.is_open() {
                *open_per_bicycle.entry(rental.bicycle_id).or_default() += 1;
            }
            tables.rentals.insert(rental.id, rental);
        }

        for (bicycle, open) in open_per_bicycle {
            if open > 1 {
                warn!(bicycle, open, "bicycle has more than one open rental row");
            }
        }

        tables.next_rental_id = tables
            .rentals
            .keys()
            .next_back()
            .map_or(1, |last| last.saturating_add(1));

        Self {
            committed: tables,
            pending: None,
        }
    }

    /// Whether a transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }

    fn tables(&self) -> &Tables {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    fn tables_mut(&mut self, operation: &str) -> Result<&mut Tables, RentalError> {
        self.pending
            .as_mut()
            .ok_or_else(|| RentalError::store_failure(operation, "write outside of a transaction"))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get_bicycle(&self, id: BicycleId) -> Option<Bicycle> {
        self.tables().bicycles.get(&id).cloned()
    }

    fn get_member(&self, id: MemberId) -> Option<Member> {
        self.tables().members.get(&id).cloned()
    }

    fn get_rental(&self, bicycle_id: BicycleId) -> Option<Rental> {
        self.tables()
            .rentals
            .values()
            .rev()
            .find(|rental| rental.bicycle_id == bicycle_id)
            .cloned()
    }

    fn get_open_rental(&self, bicycle_id: BicycleId) -> Option<Rental> {
        self.tables()
            .rentals
            .values()
            .rev()
            .find(|rental| rental.bicycle_id == bicycle_id && rental.is_open())
            .cloned()
    }

    fn upsert_rental(&mut self, draft: RentalDraft) -> Result<RecordChange, RentalError> {
        let tables = self.tables_mut("upsert_rental")?;

        let existing = tables
            .rentals
            .values_mut()
            .rev()
            .find(|rental| rental.bicycle_id == draft.bicycle_id);

        if let Some(rental) = existing {
            debug!(rental = rental.id, bicycle = draft.bicycle_id, "reusing rental row");
            rental.member_id = draft.member_id;
            rental.rental_date = draft.rental_date.into();
            rental.expected_return_date = draft.expected_return_date.into();
            rental.returned_on = None;
            return Ok(RecordChange::Updated);
        }

        let id = tables.next_rental_id;
        tables.next_rental_id = id
            .checked_add(1)
            .ok_or_else(|| RentalError::store_failure("upsert_rental", "rental ids exhausted"))?;

        debug!(rental = id, bicycle = draft.bicycle_id, "inserting rental row");
        tables.rentals.insert(
            id,
            Rental {
                id,
                bicycle_id: draft.bicycle_id,
                member_id: draft.member_id,
                rental_date: draft.rental_date.into(),
                expected_return_date: draft.expected_return_date.into(),
                returned_on: None,
            },
        );
        Ok(RecordChange::Inserted)
    }

    fn close_rental(&mut self, id: RentalId, returned_on: NaiveDate) -> Result<(), RentalError> {
        let rental = self
            .tables_mut("close_rental")?
            .rentals
            .get_mut(&id)
            .ok_or_else(|| RentalError::store_failure("close_rental", format!("rental {} missing", id)))?;
        rental.returned_on = Some(returned_on.into());
        Ok(())
    }

    fn set_bicycle_status(
        &mut self,
        id: BicycleId,
        status: BicycleStatus,
        condition: Option<Condition>,
    ) -> Result<(), RentalError> {
        let bicycle = self
            .tables_mut("set_bicycle_status")?
            .bicycles
            .get_mut(&id)
            .ok_or_else(|| {
                RentalError::store_failure("set_bicycle_status", format!("bicycle {} missing", id))
            })?;
        bicycle.status = status;
        if let Some(condition) = condition {
            bicycle.condition = condition;
        }
        Ok(())
    }

    fn count_rentals_for_member(&self, member_id: MemberId, scope: RentalCountScope) -> usize {
        self.tables()
            .rentals
            .values()
            .filter(|rental| rental.member_id == member_id)
            .filter(|rental| match scope {
                RentalCountScope::AllHistory => true,
                RentalCountScope::OpenOnly => rental.is_open(),
            })
            .count()
    }

    fn list_bicycles(&self) -> Vec<Bicycle> {
        self.tables().bicycles.values().cloned().collect()
    }

    fn list_members(&self) -> Vec<Member> {
        self.tables().members.values().cloned().collect()
    }

    fn list_rentals(&self) -> Vec<Rental> {
        self.tables().rentals.values().cloned().collect()
    }

    fn list_open_rental_bicycle_ids(&self) -> Vec<BicycleId> {
        self.tables()
            .rentals
            .values()
            .filter(|rental| rental.is_open())
            .map(|rental| rental.bicycle_id)
            .collect()
    }

    fn begin(&mut self) -> Result<(), RentalError> {
        if self.pending.is_some() {
            return Err(RentalError::store_failure(
                "begin",
                "a transaction is already in progress",
            ));
        }
        self.pending = Some(self.committed.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), RentalError> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| RentalError::store_failure("commit", "no transaction in progress"))?;
        self.committed = pending;
        Ok(())
    }

    fn rollback(&mut self) {
        if self.pending.take().is_some() {
            debug!("pending writes discarded");
        }
    }
}
