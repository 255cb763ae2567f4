//! Inventory reports
//!
//! Read-only views over a snapshot of the record store: bicycle counts per
//! status and inventory search. Purchase recommendations are computed over the
//! same snapshot (see `core::recommendation`).

use crate::core::traits::RecordStore;
use crate::types::{Bicycle, BicycleFilter, BicycleId, BicycleStatus};
use chrono::NaiveDate;

/// Inventory and open rentals as of a given date
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    /// Every bicycle, ordered by id
    pub bicycles: Vec<Bicycle>,

    /// Bicycle id of every open rental row
    pub open_rental_ids: Vec<BicycleId>,

    pub taken_on: NaiveDate,
}

/// Number of bicycles holding a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: BicycleStatus,
    pub count: usize,
}

impl InventorySnapshot {
    /// Copy the store's bicycles and open rentals
    pub fn capture<S: RecordStore + ?Sized>(store: &S, taken_on: NaiveDate) -> Self {
        InventorySnapshot {
            bicycles: store.list_bicycles(),
            open_rental_ids: store.list_open_rental_bicycle_ids(),
            taken_on,
        }
    }

    /// Bicycle count for every status, in canonical status order
    ///
    /// Statuses no bicycle holds are reported with a count of zero.
    pub fn status_counts(&self) -> Vec<StatusCount> {
        BicycleStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: self
                    .bicycles
                    .iter()
                    .filter(|bicycle| bicycle.status == *status)
                    .count(),
            })
            .collect()
    }

    /// Bicycles matching the filter, ordered by id
    pub fn search(&self, filter: &BicycleFilter) -> Vec<&Bicycle> {
        self.bicycles
            .iter()
            .filter(|bicycle| filter.matches(bicycle))
            .collect()
    }
}
