//! Rental rate representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`DailyRate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DailyRateError {
    /// The input is not a decimal number.
    #[error("rate must be a decimal number")]
    NotANumber,
    /// The input is below zero.
    #[error("rate cannot be negative")]
    Negative,
}

/// Price charged per rental day, in the fleet's currency.
///
/// Serialized as a JSON number, which is what the `vehicles.price_per_day`
/// numeric column expects from the REST layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyRate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl DailyRate {
    /// Create a rate from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`DailyRateError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, DailyRateError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DailyRateError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a rate from user-entered text such as `"50"` or `"49.99"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a decimal or is negative.
    pub fn parse(s: &str) -> Result<Self, DailyRateError> {
        let amount: Decimal = s.trim().parse().map_err(|_| DailyRateError::NotANumber)?;
        Self::new(amount)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for DailyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl std::str::FromStr for DailyRate {
    type Err = DailyRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
