//! Record builders shared by the core unit tests

use crate::core::engine::RentalDesk;
use crate::core::record_store::InMemoryRecordStore;
use crate::core::traits::{FixedClock, RentalCountScope};
use crate::types::{
    Bicycle, BicycleId, BicycleStatus, BicycleType, Condition, Member, MemberId, Rental,
    RentalRate,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Date reported by the desk's clock in core tests
pub fn today() -> NaiveDate {
    date(2024, 6, 10)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn bicycle(id: BicycleId, status: BicycleStatus, rate: i64) -> Bicycle {
    Bicycle {
        id,
        brand: format!("Brand{}", id),
        bicycle_type: BicycleType::Road,
        frame_size: "M".to_string(),
        rental_rate: RentalRate::gbp(Decimal::new(rate, 0)).unwrap(),
        purchase_date: Some(date(2023, 1, 1)),
        condition: Condition::Good,
        status,
    }
}

pub fn member(id: MemberId, membership_end: Option<NaiveDate>, rental_limit: u32) -> Member {
    Member {
        id,
        name: format!("Member {}", id),
        email: format!("member{}@example.com", id),
        phone: "07700 900000".to_string(),
        membership_end,
        rental_limit,
    }
}

pub fn desk(
    bicycles: Vec<Bicycle>,
    members: Vec<Member>,
    rentals: Vec<Rental>,
) -> RentalDesk<InMemoryRecordStore> {
    RentalDesk::new(
        InMemoryRecordStore::seed(bicycles, members, rentals),
        Box::new(FixedClock(today())),
        RentalCountScope::AllHistory,
    )
}
