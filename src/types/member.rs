//! Member types for the rental shop

use chrono::NaiveDate;

/// Member identifier
pub type MemberId = u32;

/// A registered shop member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub phone: String,

    /// Last day of the membership; a member without one cannot rent
    pub membership_end: Option<NaiveDate>,

    /// Maximum number of rentals the member may hold
    pub rental_limit: u32,
}
