use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Gateway amounts are expressed in the currency's minor unit (paise for INR).
pub const MINOR_UNITS_PER_MAJOR: Decimal = dec!(100);

/// Represents a positive monetary amount in major currency units.
///
/// Ensures that payment amounts are always positive and representable in the
/// gateway's minor-unit convention (at most two decimal places).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(CheckoutError::ValidationError(
                "Amount must be positive".to_string(),
            ));
        }
        if value.normalize().scale() > 2 {
            return Err(CheckoutError::ValidationError(
                "Amount cannot have more than two decimal places".to_string(),
            ));
        }
        let amount = Self(value);
        amount.to_minor_units()?;
        Ok(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Converts the amount to the gateway's minor units (multiply by 100).
    pub fn to_minor_units(&self) -> Result<i64> {
        self.0
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .and_then(|minor| minor.to_i64())
            .ok_or_else(|| CheckoutError::ValidationError("Amount is too large".to_string()))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Merchant-side order reference. Always a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub fn new(value: u64) -> Result<Self> {
        if value == 0 {
            return Err(CheckoutError::ValidationError(
                "Order ID is required".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
