//! Date parsing and formatting at the record boundary
//!
//! Dates arrive as either `DD/MM/YYYY` or `YYYY-MM-DD` and are always
//! emitted as `YYYY-MM-DD`.

use super::error::RentalError;
use chrono::NaiveDate;
use std::fmt;

const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a date in `DD/MM/YYYY` or `YYYY-MM-DD` form
///
/// The day-first format is tried first, then the ISO format.
///
/// # Errors
///
/// Returns `RentalError::InvalidDate` when the text is empty or matches
/// neither format.
pub fn parse_date(value: &str) -> Result<NaiveDate, RentalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RentalError::invalid_date(value));
    }

    NaiveDate::parse_from_str(trimmed, DAY_FIRST_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_FORMAT))
        .map_err(|_| RentalError::invalid_date(value))
}

/// Parse an optional date column, treating blank text as absent
pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, RentalError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => parse_date(text).map(Some),
        _ => Ok(None),
    }
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// A date column of a stored record
///
/// Text that fails to parse is kept as written, so the record survives import
/// and is saved back unchanged. The failure surfaces as
/// `RentalError::InvalidDate` when an operation needs the date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDate {
    Parsed(NaiveDate),
    Malformed(String),
}

impl RecordDate {
    /// Parse record text, keeping it verbatim when malformed
    pub fn parse(value: &str) -> Self {
        match parse_date(value) {
            Ok(date) => RecordDate::Parsed(date),
            Err(_) => RecordDate::Malformed(value.trim().to_string()),
        }
    }

    /// The parsed date
    ///
    /// # Errors
    ///
    /// Returns `RentalError::InvalidDate` holding the original text when the
    /// column was malformed.
    pub fn date(&self) -> Result<NaiveDate, RentalError> {
        match self {
            RecordDate::Parsed(date) => Ok(*date),
            RecordDate::Malformed(raw) => Err(RentalError::invalid_date(raw)),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, RecordDate::Malformed(_))
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        RecordDate::Parsed(date)
    }
}

impl PartialEq<NaiveDate> for RecordDate {
    fn eq(&self, other: &NaiveDate) -> bool {
        matches!(self, RecordDate::Parsed(date) if date == other)
    }
}

impl fmt::Display for RecordDate {
    /// `YYYY-MM-DD` when parsed, otherwise the text as imported
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::Parsed(date) => f.write_str(&format_date(*date)),
            RecordDate::Malformed(raw) => f.write_str(raw),
        }
    }
}

/// Whole days from `earlier` to `later` (negative when `later` comes first)
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
