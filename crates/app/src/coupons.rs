//! Coupon Definitions
//!
//! Checks a coupon definition written in YAML before it is handed to the admin panel, and
//! previews what it would take off a cart:
//!
//! ```yaml
//! code: luxe20
//! discount_type: percentage
//! discount_value: 20
//! min_order_amount: 999
//! applicable_skus: [sku-robe]
//! user_type: luxe
//! expiry_date: 2030-01-01T00:00:00Z
//! ```

use std::{fs, path::Path};

use jiff::Timestamp;
use rust_decimal::Decimal;
use silk::{
    coupons::{Coupon, CouponError, NewCoupon},
    money::{self, Amount, MoneyConversionError},
};
use thiserror::Error;

/// Coupon definition errors
#[derive(Debug, Error)]
pub enum CouponCheckError {
    /// IO error reading the definition
    #[error("failed to read coupon file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The definition is invalid
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// The cart total does not fit in minor units
    #[error(transparent)]
    Amount(#[from] MoneyConversionError),
}

/// A checked coupon and, when a cart total was given, its preview.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponCheck {
    /// The coupon as the store would hold it
    pub coupon: Coupon,

    /// Cart total previewed against
    pub cart_total: Option<Amount>,

    /// Discount on `cart_total`; `None` below the minimum or without a cart total
    pub discount: Option<Amount>,
}

/// Load a coupon definition.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<NewCoupon, CouponCheckError> {
    from_yaml(&fs::read_to_string(path)?)
}

/// Parse a coupon definition.
///
/// # Errors
///
/// Returns [`CouponCheckError::Yaml`] if the YAML does not describe a coupon.
pub fn from_yaml(yaml: &str) -> Result<NewCoupon, CouponCheckError> {
    Ok(serde_norway::from_str(yaml)?)
}

/// Validate `definition` at `now` and preview it against `cart_total` (major units).
///
/// # Errors
///
/// Returns an error if the definition is invalid or the cart total is out of range.
pub fn check(
    definition: NewCoupon,
    cart_total: Option<Decimal>,
    now: Timestamp,
) -> Result<CouponCheck, CouponCheckError> {
    let coupon = definition.into_coupon(now, money::store_currency())?;

    let cart_total = cart_total
        .map(|total| money::from_major(total, money::store_currency()))
        .transpose()?;

    let discount = match cart_total {
        Some(total) => coupon.preview(total, now)?,
        None => None,
    };

    Ok(CouponCheck {
        coupon,
        cart_total,
        discount,
    })
}
