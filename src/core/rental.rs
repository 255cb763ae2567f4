//! Rent workflow
//!
//! Validates a member and a bicycle, then opens a rental and marks the bicycle
//! as rented in one store transaction.

use crate::core::engine::RentalDesk;
use crate::core::traits::{atomically, RecordStore};
use crate::types::{
    BicycleId, BicycleStatus, BicycleType, MemberId, RecordChange, RentalDraft, RentalError,
    RentalRate,
};
use chrono::{Days, NaiveDate};
use tracing::info;

/// Details of a successful rental
#[derive(Debug, Clone, PartialEq)]
pub struct RentalConfirmation {
    pub bicycle_id: BicycleId,
    pub member_id: MemberId,
    pub brand: String,
    pub bicycle_type: BicycleType,
    pub rate: RentalRate,
    pub rental_date: NaiveDate,
    pub expected_return_date: NaiveDate,

    /// Whether the bicycle's rental row was newly inserted or reused
    pub change: RecordChange,
}

impl<S: RecordStore> RentalDesk<S> {
    /// Rent a bicycle to a member for a number of days
    ///
    /// Checks run in a fixed order: membership, bicycle existence and status,
    /// rental duration, then the member's rental limit. The first failing
    /// check decides the error and nothing is written.
    ///
    /// # Arguments
    ///
    /// * `member_id` - Member renting the bicycle
    /// * `bicycle_id` - Bicycle to rent
    /// * `rental_days` - Rental duration, at least 1
    ///
    /// # Returns
    ///
    /// * `Ok(RentalConfirmation)` once the rental row and bicycle status are committed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The member is unknown, has no end date, or has expired
    /// - The bicycle is unknown, under maintenance, already rented or unavailable
    /// - `rental_days` is below 1
    /// - The member has reached their rental limit
    /// - The store fails; the transaction is rolled back
    pub fn rent(
        &mut self,
        member_id: MemberId,
        bicycle_id: BicycleId,
        rental_days: i64,
    ) -> Result<RentalConfirmation, RentalError> {
        let today = self.today();

        self.validator.is_member_valid(member_id, today)?;

        let bicycle = self
            .store
            .get_bicycle(bicycle_id)
            .ok_or_else(|| RentalError::bicycle_not_found(bicycle_id))?;

        match bicycle.status {
            BicycleStatus::Available => {}
            BicycleStatus::UnderMaintenance => {
                return Err(RentalError::UnderMaintenance { bicycle: bicycle_id })
            }
            BicycleStatus::Rented => return Err(RentalError::AlreadyRented { bicycle: bicycle_id }),
            BicycleStatus::Unavailable => {
                return Err(RentalError::BicycleUnavailable { bicycle: bicycle_id })
            }
        }

        let expected_return_date = expected_return(today, rental_days)?;

        let usage = self.validator.rental_usage(&self.store, member_id);
        if usage.limit_reached() {
            return Err(RentalError::rental_limit_reached(
                member_id,
                usage.counted,
                usage.limit,
            ));
        }

        let draft = RentalDraft {
            bicycle_id,
            member_id,
            rental_date: today,
            expected_return_date,
        };

        let change = atomically(&mut self.store, "rent", |store| {
            let change = store.upsert_rental(draft)?;
            store.set_bicycle_status(bicycle_id, BicycleStatus::Rented, None)?;
            Ok(change)
        })?;

        info!(
            member = member_id,
            bicycle = bicycle_id,
            due = %expected_return_date,
            "bicycle rented"
        );

        Ok(RentalConfirmation {
            bicycle_id,
            member_id,
            brand: bicycle.brand,
            bicycle_type: bicycle.bicycle_type,
            rate: bicycle.rental_rate,
            rental_date: today,
            expected_return_date,
            change,
        })
    }
}

/// `today + rental_days`, for durations of at least one day
fn expected_return(today: NaiveDate, rental_days: i64) -> Result<NaiveDate, RentalError> {
    let invalid = || RentalError::InvalidRentalDays { days: rental_days };

    if rental_days < 1 {
        return Err(invalid());
    }

    let days = u64::try_from(rental_days).map_err(|_| invalid())?;
    today.checked_add_days(Days::new(days)).ok_or_else(invalid)
}
