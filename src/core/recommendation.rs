//! Purchase recommendations
//!
//! Scores every bicycle in the inventory and greedily spends a purchase budget
//! on the best scoring models.
//!
//! # Scoring
//!
//! ```text
//! score = 3 * rental_frequency
//!       + 2 * type_popularity
//!       - 1.5 * age_months
//!       - 1 if the bicycle is in poor condition
//! ```
//!
//! `rental_frequency` counts the bicycle's id among open rentals and
//! `age_months` is whole 30-day periods since purchase.
//!
//! # Allocation
//!
//! Bicycles are visited by descending score (ties keep inventory order). Each
//! gets as many units as the remaining budget buys at its daily rate, capped at
//! `MAX_UNITS_PER_MODEL`. Allocation stops once the budget is spent.

use crate::report::InventorySnapshot;
use crate::types::{Bicycle, BicycleId, BicycleType, Condition};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Most units of a single model bought in one order
pub const MAX_UNITS_PER_MODEL: u32 = 5;

const FREQUENCY_WEIGHT: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const POPULARITY_WEIGHT: Decimal = Decimal::from_parts(2, 0, 0, false, 0);
const AGE_WEIGHT: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
const POOR_CONDITION_PENALTY: Decimal = Decimal::ONE;

/// Score a bicycle for repurchase
///
/// # Arguments
///
/// * `bicycle` - Bicycle to score
/// * `rented_ids` - Bicycle id of every open rental, duplicates included
/// * `today` - Date the age is measured at
pub fn score(bicycle: &Bicycle, rented_ids: &[BicycleId], today: NaiveDate) -> Decimal {
    let frequency = rented_ids.iter().filter(|id| **id == bicycle.id).count();
    let popularity = bicycle.bicycle_type.popularity();
    let age_months = bicycle.age_months(today);

    let mut score = FREQUENCY_WEIGHT * Decimal::from(frequency)
        + POPULARITY_WEIGHT * Decimal::from(popularity)
        - AGE_WEIGHT * Decimal::from(age_months);

    if bicycle.condition == Condition::Poor {
        score -= POOR_CONDITION_PENALTY;
    }

    score
}

/// A bicycle paired with its score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredBicycle {
    pub bicycle: Bicycle,
    pub score: Decimal,
}

/// Score every bicycle, keeping inventory order
pub fn score_inventory(
    bicycles: &[Bicycle],
    rented_ids: &[BicycleId],
    today: NaiveDate,
) -> Vec<ScoredBicycle> {
    bicycles
        .iter()
        .map(|bicycle| ScoredBicycle {
            score: score(bicycle, rented_ids, today),
            bicycle: bicycle.clone(),
        })
        .collect()
}

/// One model in a purchase order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub bicycle_id: BicycleId,
    pub brand: String,
    pub bicycle_type: BicycleType,
    pub score: Decimal,
    pub quantity: u32,
    pub unit_cost: Decimal,

    /// `quantity * unit_cost`
    pub cost: Decimal,
}

/// Bicycles to buy, in allocation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseOrder {
    pub lines: Vec<OrderLine>,
    pub total_cost: Decimal,
}

impl PurchaseOrder {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines
    pub fn units(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

/// Greedily spend `budget` on the highest scoring bicycles
///
/// The unit cost of a model is its daily rental rate. Bicycles without a
/// positive rate are skipped.
pub fn allocate(mut scored: Vec<ScoredBicycle>, budget: Decimal) -> PurchaseOrder {
    // sort_by is stable, so equal scores keep their inventory order
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    let cap = Decimal::from(MAX_UNITS_PER_MODEL);
    let mut order = PurchaseOrder::default();

    for candidate in scored {
        if order.total_cost >= budget {
            break;
        }

        let unit_cost = candidate.bicycle.rental_rate.per_day();
        if unit_cost <= Decimal::ZERO {
            debug!(bicycle = candidate.bicycle.id, "skipping bicycle without a rate");
            continue;
        }

        let remaining = budget - order.total_cost;
        let units = remaining
            .checked_div(unit_cost)
            .map_or(cap, |units| units.floor().min(cap));
        let quantity = units.to_u32().unwrap_or(0);

        if quantity == 0 {
            continue;
        }

        let cost = unit_cost * Decimal::from(quantity);
        order.total_cost += cost;
        order.lines.push(OrderLine {
            bicycle_id: candidate.bicycle.id,
            brand: candidate.bicycle.brand,
            bicycle_type: candidate.bicycle.bicycle_type,
            score: candidate.score,
            quantity,
            unit_cost,
            cost,
        });
    }

    order
}

/// Score the snapshot's inventory and allocate `budget` over it
pub fn recommend(snapshot: &InventorySnapshot, budget: Decimal) -> PurchaseOrder {
    let scored = score_inventory(
        &snapshot.bicycles,
        &snapshot.open_rental_ids,
        snapshot.taken_on,
    );
    allocate(scored, budget)
}
