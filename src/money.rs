//! Money
//!
//! Amounts are carried as [`Money`] in integer minor units. The storefront API speaks in
//! major-unit decimals, so conversions happen once at the edge and never mid-calculation.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Monetary amount used throughout the storefront.
pub type Amount = Money<'static, Currency>;

/// Decimal places carried by storefront currencies.
const MINOR_SCALE: u32 = 2;

/// Errors converting between decimal major units and [`Amount`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyConversionError {
    /// The amount does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    OutOfRange(Decimal),
}

/// Currency the storefront prices in.
pub fn store_currency() -> &'static Currency {
    iso::INR
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Amount {
    Money::from_minor(0, currency)
}

/// Convert a major-unit decimal (e.g. `499.00`) into an [`Amount`].
///
/// Fractions of a minor unit round half away from zero.
///
/// # Errors
///
/// Returns [`MoneyConversionError::OutOfRange`] if the value overflows `i64` minor units.
pub fn from_major(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Amount, MoneyConversionError> {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MoneyConversionError::OutOfRange(amount))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(MoneyConversionError::OutOfRange(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Convert an [`Amount`] into a major-unit decimal with two decimal places.
pub fn to_major(amount: &Amount) -> Decimal {
    let mut major = amount
        .amount()
        .round_dp_with_strategy(MINOR_SCALE, RoundingStrategy::MidpointAwayFromZero);

    major.rescale(MINOR_SCALE);
    major
}

/// Multiply an amount by a quantity, returning `None` on overflow.
pub fn times(amount: &Amount, quantity: u32) -> Option<Amount> {
    amount
        .try_to_minor_units()
        .ok()?
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, amount.currency()))
}
