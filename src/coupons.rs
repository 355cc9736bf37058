//! Coupons
//!
//! Redemption is decided by the coupon service. The client only normalises codes, keeps at
//! most one applied coupon, and (for the admin panel) checks coupon definitions and previews
//! their value.

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{self, Amount};

/// Errors related to coupon codes and definitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The code was empty after trimming.
    #[error("coupon code cannot be empty")]
    EmptyCode,

    /// Discount value must be above zero.
    #[error("discount value must be greater than zero")]
    NonPositiveValue,

    /// Percentage discounts cannot exceed 100%.
    #[error("percentage discount cannot exceed 100")]
    PercentageTooLarge,

    /// Minimum order amount cannot be negative.
    #[error("minimum order amount cannot be negative")]
    NegativeMinimum,

    /// Expiry date is not in the future.
    #[error("coupon expiry must be in the future")]
    AlreadyExpired,

    /// Minimum order amount does not fit in minor units.
    #[error("minimum order amount {0} is out of range")]
    MinimumOutOfRange(Decimal),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed")]
    PercentConversion,
}

/// A coupon code: trimmed, case-insensitive, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalise a user-entered code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptyCode`] if nothing is left after trimming.
    pub fn new(code: &str) -> Result<Self, CouponError> {
        let code = code.trim();

        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }

        Ok(Self(code.to_uppercase()))
    }

    /// The normalised code
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CouponCode {
    type Err = CouponError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CouponCode> for String {
    fn from(value: CouponCode) -> Self {
        value.0
    }
}

/// How a coupon's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `discount_value` percent of the cart total
    Percentage,

    /// `discount_value` off in major units
    Fixed,
}

/// Who may redeem a coupon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponAudience {
    /// Any signed-in customer
    #[default]
    All,

    /// Luxe members only
    Luxe,
}

/// A coupon as authored in the admin panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    /// Unique code
    pub code: CouponCode,

    /// Percentage or fixed
    pub discount_type: DiscountType,

    /// Percent points for percentage coupons, major units for fixed ones
    pub discount_value: Decimal,

    /// Minimum cart total before the coupon applies
    pub min_order_amount: Amount,

    /// SKUs the coupon is limited to; empty means every SKU
    pub applicable_skus: Vec<String>,

    /// Customer group allowed to redeem
    pub user_type: CouponAudience,

    /// When the coupon stops working
    pub expiry_date: Timestamp,
}

impl Coupon {
    /// Whether the coupon is limited to `sku`'s product set (or open to all).
    pub fn covers_sku(&self, sku: &str) -> bool {
        self.applicable_skus.is_empty() || self.applicable_skus.iter().any(|s| s == sku)
    }

    /// Whether the coupon has expired at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiry_date <= now
    }

    /// Preview what the coupon takes off `cart_total`, never more than the total itself.
    ///
    /// This is for display in the admin review listing; the coupon service remains the
    /// authority on what a shopper actually receives.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::PercentConversion`] if the percentage cannot be applied.
    pub fn face_value(&self, cart_total: Amount) -> Result<Amount, CouponError> {
        let currency = cart_total.currency();
        let total_minor = cart_total
            .try_to_minor_units()
            .ok()
            .ok_or(CouponError::PercentConversion)?
            .max(0);

        let discount_minor = match self.discount_type {
            DiscountType::Percentage => {
                let percent = Percentage::from(self.discount_value / Decimal::ONE_HUNDRED);

                percent_of_minor(&percent, total_minor)?
            }
            DiscountType::Fixed => (self.discount_value * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .ok_or(CouponError::PercentConversion)?,
        };

        Ok(Money::from_minor(discount_minor.min(total_minor), currency))
    }

    /// What the coupon would take off `cart_total` at `now`, or `None` when it has expired or
    /// the cart is below the minimum order amount.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::PercentConversion`] if the value cannot be computed.
    pub fn preview(
        &self,
        cart_total: Amount,
        now: Timestamp,
    ) -> Result<Option<Amount>, CouponError> {
        if self.is_expired(now) || cart_total.amount() < self.min_order_amount.amount() {
            return Ok(None);
        }

        self.face_value(cart_total).map(Some)
    }
}

/// A coupon definition submitted from the admin panel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCoupon {
    /// Code as typed; normalised on validation
    pub code: String,

    /// Percentage or fixed
    pub discount_type: DiscountType,

    /// Percent points or major units
    pub discount_value: Decimal,

    /// Minimum cart total in major units
    #[serde(default)]
    pub min_order_amount: Decimal,

    /// SKU restrictions
    #[serde(default)]
    pub applicable_skus: Vec<String>,

    /// Customer group
    #[serde(default)]
    pub user_type: CouponAudience,

    /// Expiry
    pub expiry_date: Timestamp,
}

impl NewCoupon {
    /// Check the definition and return the normalised code.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponError`] found.
    pub fn validate(&self, now: Timestamp) -> Result<CouponCode, CouponError> {
        let code = CouponCode::new(&self.code)?;

        if self.discount_value <= Decimal::ZERO {
            return Err(CouponError::NonPositiveValue);
        }

        if self.discount_type == DiscountType::Percentage
            && self.discount_value > Decimal::ONE_HUNDRED
        {
            return Err(CouponError::PercentageTooLarge);
        }

        if self.min_order_amount < Decimal::ZERO {
            return Err(CouponError::NegativeMinimum);
        }

        if self.expiry_date <= now {
            return Err(CouponError::AlreadyExpired);
        }

        Ok(code)
    }

    /// Validate the definition and price its minimum in `currency`.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponError`] found, or [`CouponError::MinimumOutOfRange`] if the
    /// minimum does not fit in minor units.
    pub fn into_coupon(
        self,
        now: Timestamp,
        currency: &'static Currency,
    ) -> Result<Coupon, CouponError> {
        let code = self.validate(now)?;
        let min_order_amount = money::from_major(self.min_order_amount, currency)
            .ok()
            .ok_or(CouponError::MinimumOutOfRange(self.min_order_amount))?;

        Ok(Coupon {
            code,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            min_order_amount,
            applicable_skus: self.applicable_skus,
            user_type: self.user_type,
            expiry_date: self.expiry_date,
        })
    }
}

/// The coupon currently applied to a checkout.
///
/// A checkout holds at most one; applying another replaces it rather than stacking.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    /// Redeemed code
    pub code: CouponCode,

    /// Discount granted by the coupon service
    pub discount: Amount,
}

fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, CouponError> {
    let minor = Decimal::from_i64(minor).ok_or(CouponError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(CouponError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(CouponError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;

    fn coupon(discount_type: DiscountType, value: Decimal) -> Result<Coupon, CouponError> {
        Ok(Coupon {
            code: CouponCode::new("silk10")?,
            discount_type,
            discount_value: value,
            min_order_amount: Money::from_minor(0, iso::INR),
            applicable_skus: Vec::new(),
            user_type: CouponAudience::All,
            expiry_date: Timestamp::UNIX_EPOCH,
        })
    }

    fn new_coupon(now: Timestamp) -> NewCoupon {
        NewCoupon {
            code: " luxe20 ".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(20),
            min_order_amount: Decimal::from(999),
            applicable_skus: vec!["sku-robe".to_string()],
            user_type: CouponAudience::Luxe,
            expiry_date: now + SignedDuration::from_hours(24),
        }
    }

    #[test]
    fn code_is_trimmed_and_uppercased() -> TestResult {
        let code = CouponCode::new("  welcome50 ")?;

        assert_eq!(code.as_str(), "WELCOME50");
        assert_eq!(code, "WELCOME50".parse::<CouponCode>()?);

        Ok(())
    }

    #[test]
    fn empty_code_is_rejected() {
        assert_eq!(CouponCode::new("   "), Err(CouponError::EmptyCode));
    }

    #[test]
    fn percentage_face_value() -> TestResult {
        let coupon = coupon(DiscountType::Percentage, Decimal::from(10))?;

        assert_eq!(
            coupon.face_value(Money::from_minor(205_000, iso::INR))?,
            Money::from_minor(20_500, iso::INR)
        );

        Ok(())
    }

    #[test]
    fn fixed_face_value_is_capped_at_total() -> TestResult {
        let coupon = coupon(DiscountType::Fixed, Decimal::from(500))?;

        assert_eq!(
            coupon.face_value(Money::from_minor(40_000, iso::INR))?,
            Money::from_minor(40_000, iso::INR)
        );

        assert_eq!(
            coupon.face_value(Money::from_minor(100_000, iso::INR))?,
            Money::from_minor(50_000, iso::INR)
        );

        Ok(())
    }

    #[test]
    fn empty_sku_list_covers_everything() -> TestResult {
        let mut coupon = coupon(DiscountType::Fixed, Decimal::from(100))?;

        assert!(coupon.covers_sku("anything"));

        coupon.applicable_skus = vec!["sku-robe".to_string()];

        assert!(coupon.covers_sku("sku-robe"));
        assert!(!coupon.covers_sku("sku-slip"));

        Ok(())
    }

    #[test]
    fn expiry_is_inclusive_of_now() -> TestResult {
        let coupon = coupon(DiscountType::Fixed, Decimal::from(100))?;

        assert!(coupon.is_expired(Timestamp::UNIX_EPOCH));
        assert!(!coupon.is_expired(Timestamp::UNIX_EPOCH - SignedDuration::from_secs(1)));

        Ok(())
    }

    #[test]
    fn valid_definition_returns_normalised_code() -> TestResult {
        let now = Timestamp::now();

        assert_eq!(new_coupon(now).validate(now)?.as_str(), "LUXE20");

        Ok(())
    }

    #[test]
    fn invalid_definitions_are_rejected() {
        let now = Timestamp::now();

        let zero_value = NewCoupon {
            discount_value: Decimal::ZERO,
            ..new_coupon(now)
        };
        let too_large = NewCoupon {
            discount_value: Decimal::from(101),
            ..new_coupon(now)
        };
        let negative_minimum = NewCoupon {
            min_order_amount: Decimal::from(-1),
            ..new_coupon(now)
        };
        let expired = NewCoupon {
            expiry_date: now,
            ..new_coupon(now)
        };

        assert_eq!(zero_value.validate(now), Err(CouponError::NonPositiveValue));
        assert_eq!(too_large.validate(now), Err(CouponError::PercentageTooLarge));
        assert_eq!(negative_minimum.validate(now), Err(CouponError::NegativeMinimum));
        assert_eq!(expired.validate(now), Err(CouponError::AlreadyExpired));
    }

    #[test]
    fn fixed_value_above_hundred_is_allowed() -> TestResult {
        let now = Timestamp::now();
        let fixed = NewCoupon {
            discount_type: DiscountType::Fixed,
            discount_value: Decimal::from(500),
            ..new_coupon(now)
        };

        fixed.validate(now)?;

        Ok(())
    }

    #[test]
    fn definition_becomes_coupon_with_minor_unit_minimum() -> TestResult {
        let now = Timestamp::now();
        let coupon = new_coupon(now).into_coupon(now, iso::INR)?;

        assert_eq!(coupon.code.as_str(), "LUXE20");
        assert_eq!(coupon.min_order_amount, Money::from_minor(99_900, iso::INR));
        assert_eq!(coupon.user_type, CouponAudience::Luxe);

        Ok(())
    }

    #[test]
    fn invalid_definition_does_not_become_coupon() {
        let now = Timestamp::now();
        let expired = NewCoupon {
            expiry_date: now,
            ..new_coupon(now)
        };

        assert_eq!(
            expired.into_coupon(now, iso::INR),
            Err(CouponError::AlreadyExpired)
        );
    }

    #[test]
    fn preview_respects_minimum_and_expiry() -> TestResult {
        let now = Timestamp::now();
        let coupon = new_coupon(now).into_coupon(now, iso::INR)?;

        assert_eq!(
            coupon.preview(Money::from_minor(200_000, iso::INR), now)?,
            Some(Money::from_minor(40_000, iso::INR))
        );
        assert_eq!(coupon.preview(Money::from_minor(50_000, iso::INR), now)?, None);
        assert_eq!(
            coupon.preview(
                Money::from_minor(200_000, iso::INR),
                now + SignedDuration::from_hours(48)
            )?,
            None
        );

        Ok(())
    }

    #[test]
    fn definition_reads_from_yaml_with_defaults() -> TestResult {
        let yaml = r"
code: welcome
discount_type: fixed
discount_value: 150
expiry_date: 2030-01-01T00:00:00Z
";
        let definition: NewCoupon = serde_norway::from_str(yaml)?;

        assert_eq!(definition.discount_type, DiscountType::Fixed);
        assert_eq!(definition.min_order_amount, Decimal::ZERO);
        assert!(definition.applicable_skus.is_empty());
        assert_eq!(definition.user_type, CouponAudience::All);

        Ok(())
    }

    #[test]
    fn audience_and_type_use_lowercase_wire_names() -> TestResult {
        let decoded: (DiscountType, CouponAudience) =
            serde_norway::from_str("[percentage, luxe]")?;

        assert_eq!(decoded, (DiscountType::Percentage, CouponAudience::Luxe));

        Ok(())
    }
}
