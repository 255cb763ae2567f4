//! Error types for the bicycle rental engine
//!
//! This module defines every error that can surface while loading records,
//! renting or returning bicycles, and producing reports. None of them are
//! process-fatal inside the engine: each command either succeeds or yields
//! one of these as its outcome.
//!
//! # Error Categories
//!
//! - **Not found**: unknown member, bicycle or rental record
//! - **Invalid state**: bicycle under maintenance, already rented, unavailable, not rented
//! - **Membership**: expired or invalid membership
//! - **Rental limit**: member already holds as many rentals as allowed
//! - **Invalid input**: rental days, dates, rates, statuses, amounts, commands
//! - **Store failure**: record store or transaction failures (always rolled back)
//! - **File I/O and CSV parsing**: boundary errors while importing or exporting

use chrono::NaiveDate;
use thiserror::Error;

use super::bicycle::BicycleId;
use super::member::MemberId;

/// Coarse classification of a [`RentalError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    MembershipExpired,
    MembershipInvalid,
    RentalLimitReached,
    InvalidInput,
    StoreFailure,
    Io,
}

/// Main error type for the rental engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RentalError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped and loading continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError { line: Option<u64>, message: String },

    #[error("Member ID {member} not found or invalid")]
    MemberNotFound { member: MemberId },

    /// The member record exists but cannot be validated
    #[error("Membership for Member ID {member} is invalid: {reason}")]
    MembershipInvalid { member: MemberId, reason: String },

    #[error("Membership for Member ID {member} has expired (ended {ended})")]
    MembershipExpired { member: MemberId, ended: NaiveDate },

    #[error("Bicycle ID {bicycle} not found")]
    BicycleNotFound { bicycle: BicycleId },

    #[error("Bicycle {bicycle} can't be rented because it is under maintenance")]
    UnderMaintenance { bicycle: BicycleId },

    #[error("Bicycle {bicycle} is already rented, please try another")]
    AlreadyRented { bicycle: BicycleId },

    #[error("Bicycle {bicycle} is unavailable, please try another")]
    BicycleUnavailable { bicycle: BicycleId },

    #[error("Bicycle {bicycle} is not currently rented")]
    NotRented { bicycle: BicycleId },

    #[error("No rental record found for bicycle {bicycle}")]
    NoRentalRecord { bicycle: BicycleId },

    /// Member's counted rentals already meet their limit
    #[error("Member {member} has reached their rental limit of {limit} ({counted} rentals counted); return a bicycle before renting another")]
    RentalLimitReached {
        member: MemberId,
        counted: usize,
        limit: u32,
    },

    #[error("Rental duration must be at least 1 day (got {days})")]
    InvalidRentalDays { days: i64 },

    #[error("Invalid date format: '{value}', expected DD/MM/YYYY or YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Invalid rental rate: '{value}'")]
    InvalidRate { value: String },

    #[error("Invalid bicycle status: '{value}'")]
    InvalidStatus { value: String },

    #[error("Invalid {field}: '{value}'")]
    InvalidAmount { field: String, value: String },

    /// A command row could not be turned into a rent or return request
    #[error("Invalid command: {message}")]
    InvalidCommand { message: String },

    /// Record store or transaction failure
    ///
    /// Any pending writes are rolled back before this is reported.
    #[error("Store failure during {operation}: {message}")]
    StoreFailure { operation: String, message: String },
}

impl From<std::io::Error> for RentalError {
    fn from(error: std::io::Error) -> Self {
        RentalError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for RentalError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        RentalError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl RentalError {
    /// Classify the error into the rental taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            RentalError::FileNotFound { .. }
            | RentalError::IoError { .. }
            | RentalError::ParseError { .. } => ErrorKind::Io,
            RentalError::MemberNotFound { .. }
            | RentalError::BicycleNotFound { .. }
            | RentalError::NoRentalRecord { .. } => ErrorKind::NotFound,
            RentalError::UnderMaintenance { .. }
            | RentalError::AlreadyRented { .. }
            | RentalError::BicycleUnavailable { .. }
            | RentalError::NotRented { .. } => ErrorKind::InvalidState,
            RentalError::MembershipExpired { .. } => ErrorKind::MembershipExpired,
            RentalError::MembershipInvalid { .. } => ErrorKind::MembershipInvalid,
            RentalError::RentalLimitReached { .. } => ErrorKind::RentalLimitReached,
            RentalError::InvalidRentalDays { .. }
            | RentalError::InvalidDate { .. }
            | RentalError::InvalidRate { .. }
            | RentalError::InvalidStatus { .. }
            | RentalError::InvalidAmount { .. }
            | RentalError::InvalidCommand { .. } => ErrorKind::InvalidInput,
            RentalError::StoreFailure { .. } => ErrorKind::StoreFailure,
        }
    }

    /// Map a failure to open `path` to `FileNotFound` or `IoError`
    pub fn open_failed(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => RentalError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => RentalError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            },
        }
    }

    pub fn member_not_found(member: MemberId) -> Self {
        RentalError::MemberNotFound { member }
    }

    pub fn membership_invalid(member: MemberId, reason: &str) -> Self {
        RentalError::MembershipInvalid {
            member,
            reason: reason.to_string(),
        }
    }

    pub fn membership_expired(member: MemberId, ended: NaiveDate) -> Self {
        RentalError::MembershipExpired { member, ended }
    }

    pub fn bicycle_not_found(bicycle: BicycleId) -> Self {
        RentalError::BicycleNotFound { bicycle }
    }

    pub fn not_rented(bicycle: BicycleId) -> Self {
        RentalError::NotRented { bicycle }
    }

    pub fn no_rental_record(bicycle: BicycleId) -> Self {
        RentalError::NoRentalRecord { bicycle }
    }

    pub fn rental_limit_reached(member: MemberId, counted: usize, limit: u32) -> Self {
        RentalError::RentalLimitReached {
            member,
            counted,
            limit,
        }
    }

    pub fn invalid_date(value: &str) -> Self {
        RentalError::InvalidDate {
            value: value.to_string(),
        }
    }

    pub fn invalid_rate(value: &str) -> Self {
        RentalError::InvalidRate {
            value: value.to_string(),
        }
    }

    pub fn invalid_status(value: &str) -> Self {
        RentalError::InvalidStatus {
            value: value.to_string(),
        }
    }

    pub fn invalid_amount(field: &str, value: &str) -> Self {
        RentalError::InvalidAmount {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn invalid_command(message: impl Into<String>) -> Self {
        RentalError::InvalidCommand {
            message: message.into(),
        }
    }

    pub fn store_failure(operation: &str, message: impl Into<String>) -> Self {
        RentalError::StoreFailure {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
