//! Rental rates
//!
//! Rates are held as a numeric daily amount plus a currency. The familiar
//! `£15/day` text is produced and parsed only at the record boundary.

use super::error::RentalError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

const PER_DAY_SUFFIX: &str = "/day";

/// Currency a rate is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Gbp,
    Eur,
    Usd,
}

impl Currency {
    pub fn symbol(self) -> char {
        match self {
            Currency::Gbp => '£',
            Currency::Eur => '€',
            Currency::Usd => '$',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '£' => Some(Currency::Gbp),
            '€' => Some(Currency::Eur),
            '$' => Some(Currency::Usd),
            _ => None,
        }
    }
}

/// Daily rental rate of a bicycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalRate {
    amount: Decimal,
    currency: Currency,
}

impl RentalRate {
    /// Create a rate, rejecting negative amounts
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, RentalError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(RentalError::invalid_rate(&amount.to_string()));
        }
        Ok(Self { amount, currency })
    }

    /// A sterling rate, the shop's default currency
    pub fn gbp(amount: Decimal) -> Result<Self, RentalError> {
        Self::new(amount, Currency::Gbp)
    }

    /// Amount charged per day
    pub fn per_day(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl FromStr for RentalRate {
    type Err = RentalError;

    /// Parse `£15/day`, `15/day`, `£15` or `15`
    ///
    /// The currency symbol and `/day` suffix are stripped; a bare number is
    /// taken as sterling.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let without_suffix = trimmed
            .strip_suffix(PER_DAY_SUFFIX)
            .unwrap_or(trimmed)
            .trim();

        let mut chars = without_suffix.chars();
        let (currency, number) = match chars.next().and_then(Currency::from_symbol) {
            Some(currency) => (currency, chars.as_str().trim()),
            None => (Currency::default(), without_suffix),
        };

        let amount = Decimal::from_str(number).map_err(|_| RentalError::invalid_rate(value))?;
        RentalRate::new(amount, currency).map_err(|_| RentalError::invalid_rate(value))
    }
}

impl fmt::Display for RentalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.currency.symbol(),
            self.amount.normalize(),
            PER_DAY_SUFFIX
        )
    }
}
