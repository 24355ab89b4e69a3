//! Type-safe price representation using decimal arithmetic.
//!
//! Prices never go through binary floating point: amounts are
//! [`rust_decimal::Decimal`] so that summing many cart lines stays exact to
//! the minor unit.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors from price arithmetic.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// Two prices in different currencies were combined.
    #[error("cannot combine {left:?} and {right:?} amounts")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: CurrencyCode,
        /// Currency of the right operand.
        right: CurrencyCode,
    },
    /// The result does not fit in a `Decimal`.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// A price with currency information.
///
/// ```
/// use blockshop_core::{CurrencyCode, Price};
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(350, 2), CurrencyCode::EUR);
/// assert_eq!(price.display(), "€3.50");
/// assert_eq!(price.times(3).unwrap().display(), "€10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Number of decimal places shown for display.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an amount in minor units (cents).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, 2), currency_code)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Multiply by a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the product does not fit.
    pub fn times(&self, quantity: u32) -> Result<Self, PriceError> {
        let amount = self
            .amount
            .checked_mul(Decimal::from(quantity))
            .ok_or(PriceError::Overflow)?;
        Ok(Self::new(amount, self.currency_code))
    }

    /// Add another price in the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::CurrencyMismatch`] if the currencies differ, or
    /// [`PriceError::Overflow`] if the sum does not fit.
    pub fn checked_add(&self, other: &Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch {
                left: self.currency_code,
                right: other.currency_code,
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(PriceError::Overflow)?;
        Ok(Self::new(amount, self.currency_code))
    }

    /// Format for display (e.g., "€19.99").
    ///
    /// Rounds half away from zero to two places, like a shop till would.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    USD,
    #[default]
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}
