//! Return workflow
//!
//! Closes a bicycle's rental, charges late fees and any damage, and puts the
//! bicycle back into circulation or, when damaged, out of it.
//!
//! # Late fees
//!
//! A bicycle returned after its expected return date is charged, per late day,
//! its daily rate plus a flat surcharge:
//!
//! ```text
//! late_fee = late_days * rate + late_days * 5
//! ```

use crate::core::engine::RentalDesk;
use crate::core::traits::{atomically, RecordStore};
use crate::types::{
    days_between, BicycleId, BicycleStatus, Condition, MemberId, RentalError, RentalRate,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

/// Flat charge added for each late day, on top of the daily rate
pub const LATE_SURCHARGE_PER_DAY: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Breakdown of the fee for a late return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LateFee {
    pub late_days: i64,

    /// `late_days * rate`
    pub rate_fee: Decimal,

    /// `late_days * LATE_SURCHARGE_PER_DAY`
    pub surcharge: Decimal,
}

impl LateFee {
    /// Compute the late fee for a bicycle returned on `returned_on`
    ///
    /// Returns on or before the expected date owe nothing.
    pub fn compute(rate: &RentalRate, expected: NaiveDate, returned_on: NaiveDate) -> Self {
        let late_days = days_between(returned_on, expected).max(0);
        let days = Decimal::from(late_days);

        LateFee {
            late_days,
            rate_fee: days * rate.per_day(),
            surcharge: days * LATE_SURCHARGE_PER_DAY,
        }
    }

    pub fn total(&self) -> Decimal {
        self.rate_fee + self.surcharge
    }
}

/// Details of a successful return
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSummary {
    pub bicycle_id: BicycleId,
    pub member_id: MemberId,
    pub rate: RentalRate,
    pub rental_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub returned_on: NaiveDate,
    pub late_fee: LateFee,
    pub damage_charge: Decimal,

    /// Late fee plus damage charge
    pub total_charge: Decimal,

    /// Bicycle status after the return
    pub status: BicycleStatus,
}

impl<S: RecordStore> RentalDesk<S> {
    /// Return a rented bicycle
    ///
    /// Closes the bicycle's rental row with today's date and makes the bicycle
    /// available again. A positive `damage_charge` instead leaves it
    /// unavailable with its condition set to damaged. All writes are committed
    /// together.
    ///
    /// # Arguments
    ///
    /// * `bicycle_id` - Bicycle being returned
    /// * `damage_charge` - Charge for damage, zero when undamaged
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `damage_charge` is negative
    /// - The bicycle is unknown or not currently rented
    /// - The bicycle has no open rental row
    /// - The open row's rental or expected return date is malformed
    /// - The store fails; the transaction is rolled back
    pub fn return_bicycle(
        &mut self,
        bicycle_id: BicycleId,
        damage_charge: Decimal,
    ) -> Result<ReturnSummary, RentalError> {
        if damage_charge.is_sign_negative() && !damage_charge.is_zero() {
            return Err(RentalError::invalid_amount(
                "damage charge",
                &damage_charge.to_string(),
            ));
        }

        let bicycle = self
            .store
            .get_bicycle(bicycle_id)
            .ok_or_else(|| RentalError::bicycle_not_found(bicycle_id))?;

        if bicycle.status != BicycleStatus::Rented {
            return Err(RentalError::not_rented(bicycle_id));
        }

        let rental = self
            .store
            .get_open_rental(bicycle_id)
            .ok_or_else(|| RentalError::no_rental_record(bicycle_id))?;

        let rental_date = rental.rental_date.date()?;
        let expected_return_date = rental.expected_return_date.date()?;

        let returned_on = self.today();
        let late_fee = LateFee::compute(&bicycle.rental_rate, expected_return_date, returned_on);
        let damaged = damage_charge > Decimal::ZERO;

        let status = atomically(&mut self.store, "return", |store| {
            store.close_rental(rental.id, returned_on)?;
            store.set_bicycle_status(bicycle_id, BicycleStatus::Available, None)?;

            if damaged {
                store.set_bicycle_status(
                    bicycle_id,
                    BicycleStatus::Unavailable,
                    Some(Condition::Damaged),
                )?;
                return Ok(BicycleStatus::Unavailable);
            }

            Ok(BicycleStatus::Available)
        })?;

        let total_charge = late_fee.total() + damage_charge;

        info!(
            bicycle = bicycle_id,
            member = rental.member_id,
            late_days = late_fee.late_days,
            total = %total_charge,
            %status,
            "bicycle returned"
        );

        Ok(ReturnSummary {
            bicycle_id,
            member_id: rental.member_id,
            rate: bicycle.rental_rate,
            rental_date,
            expected_return_date,
            returned_on,
            late_fee,
            damage_charge,
            total_charge,
            status,
        })
    }
}
