//! Bicycle inventory types
//!
//! This module defines the Bicycle record together with its type, condition
//! and status enums, and the filter used for inventory search.

use super::error::RentalError;
use super::rate::RentalRate;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Bicycle identifier
pub type BicycleId = u32;

/// Kind of bicycle
///
/// Known kinds carry a fixed popularity weight used by purchase
/// recommendations; anything else is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BicycleType {
    Mountain,
    Road,
    Hybrid,
    Electric,
    City,
    SingleGear,
    Other(String),
}

impl BicycleType {
    /// Display name as used in inventory files, e.g. `Mountain Bike`
    pub fn as_str(&self) -> &str {
        match self {
            BicycleType::Mountain => "Mountain Bike",
            BicycleType::Road => "Road Bike",
            BicycleType::Hybrid => "Hybrid Bike",
            BicycleType::Electric => "Electric Bike",
            BicycleType::City => "City Bike",
            BicycleType::SingleGear => "Single Gear Bike",
            BicycleType::Other(name) => name,
        }
    }

    /// Popularity weight of this kind of bicycle (unknown kinds weigh 0)
    pub fn popularity(&self) -> u32 {
        match self {
            BicycleType::Mountain => 3,
            BicycleType::Road => 2,
            BicycleType::Hybrid => 1,
            BicycleType::Electric => 4,
            BicycleType::City => 5,
            BicycleType::SingleGear => 6,
            BicycleType::Other(_) => 0,
        }
    }
}

impl From<&str> for BicycleType {
    /// Case-insensitive; the trailing "Bike" is optional
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        let lowered = trimmed.to_lowercase();
        let name = lowered.strip_suffix(" bike").unwrap_or(&lowered);
        match name {
            "mountain" => BicycleType::Mountain,
            "road" => BicycleType::Road,
            "hybrid" => BicycleType::Hybrid,
            "electric" => BicycleType::Electric,
            "city" => BicycleType::City,
            "single gear" | "single-gear" | "singlegear" => BicycleType::SingleGear,
            _ => BicycleType::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for BicycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical condition of a bicycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Good,
    Poor,
    Damaged,
    Other(String),
}

impl Condition {
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Good => "Good",
            Condition::Poor => "Poor",
            Condition::Damaged => "Damaged",
            Condition::Other(name) => name,
        }
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "good" => Condition::Good,
            "poor" => Condition::Poor,
            "damaged" => Condition::Damaged,
            _ => Condition::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rental status of a bicycle
///
/// A bicycle is always in exactly one of these four states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BicycleStatus {
    Available,
    Rented,
    UnderMaintenance,
    Unavailable,
}

impl BicycleStatus {
    /// All statuses in reporting order
    pub const ALL: [BicycleStatus; 4] = [
        BicycleStatus::Available,
        BicycleStatus::Rented,
        BicycleStatus::UnderMaintenance,
        BicycleStatus::Unavailable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BicycleStatus::Available => "Available",
            BicycleStatus::Rented => "Rented",
            BicycleStatus::UnderMaintenance => "Under maintenance",
            BicycleStatus::Unavailable => "Unavailable",
        }
    }
}

impl FromStr for BicycleStatus {
    type Err = RentalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match normalized.as_str() {
            "available" => Ok(BicycleStatus::Available),
            "rented" => Ok(BicycleStatus::Rented),
            "undermaintenance" => Ok(BicycleStatus::UnderMaintenance),
            "unavailable" => Ok(BicycleStatus::Unavailable),
            _ => Err(RentalError::invalid_status(value)),
        }
    }
}

impl fmt::Display for BicycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bicycle in the shop's inventory
#[derive(Debug, Clone, PartialEq)]
pub struct Bicycle {
    pub id: BicycleId,
    pub brand: String,
    pub bicycle_type: BicycleType,
    pub frame_size: String,
    pub rental_rate: RentalRate,

    /// Absent when the imported purchase date could not be read
    pub purchase_date: Option<NaiveDate>,

    pub condition: Condition,
    pub status: BicycleStatus,
}

impl Bicycle {
    /// Whole 30-day months since purchase, floored (0 when the date is unknown)
    pub fn age_months(&self, today: NaiveDate) -> i64 {
        self.purchase_date
            .map(|purchased| (today - purchased).num_days().div_euclid(30))
            .unwrap_or(0)
    }
}

/// Inventory search criteria
///
/// Each present field must match exactly, ignoring case and surrounding
/// whitespace. An empty filter matches every bicycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BicycleFilter {
    pub brand: Option<String>,
    pub bicycle_type: Option<String>,
    pub frame_size: Option<String>,
}

impl BicycleFilter {
    pub fn matches(&self, bicycle: &Bicycle) -> bool {
        fn field_matches(wanted: &Option<String>, actual: &str) -> bool {
            wanted
                .as_deref()
                .map_or(true, |w| w.trim().eq_ignore_ascii_case(actual.trim()))
        }

        field_matches(&self.brand, &bicycle.brand)
            && field_matches(&self.bicycle_type, bicycle.bicycle_type.as_str())
            && field_matches(&self.frame_size, &bicycle.frame_size)
    }
}
