//! Checkout Pricing
//!
//! The single place money is added up. Checkout quotes, order confirmations and order
//! history all go through [`price_checkout`] or [`PriceBreakdown`], so a figure shown on one
//! screen always matches the others.
//!
//! The order of operations is fixed:
//!
//! 1. subtotal is the sum of `price × quantity`
//! 2. product discount is the sum of per-line discounts
//! 3. shipping is waived for COD, for Luxe members, or once the discounted subtotal reaches
//!    the free-shipping threshold
//! 4. COD adds a flat handling charge
//! 5. the gift wrap is free while the Luxe benefit is active
//! 6. the coupon discount comes off last
//!
//! Totals are not clamped at zero; see [`PriceBreakdown::is_negative`].

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    gift_wrap::GiftWrap,
    items::CartItem,
    membership::Membership,
    money::{self, Amount},
    payment::PaymentMethod,
};

/// Errors that can occur while pricing a checkout.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An item is priced in a different currency from the policy.
    #[error("item {index} has currency {actual}, but checkout has currency {expected}")]
    CurrencyMismatch {
        /// Index of the offending item
        index: usize,

        /// Item currency code
        actual: &'static str,

        /// Policy currency code
        expected: &'static str,
    },

    /// The coupon discount supplied was below zero.
    #[error("coupon discount cannot be negative")]
    NegativeCouponDiscount,

    /// A computed figure does not fit in minor units.
    #[error("{figure} is too large to charge")]
    Overflow {
        /// Which figure overflowed
        figure: &'static str,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Store-wide charges and thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// Currency every amount is expressed in
    pub currency: &'static Currency,

    /// Discounted subtotal at or above which shipping is free
    pub free_shipping_threshold: Amount,

    /// Flat shipping charge below the threshold
    pub shipping_charge: Amount,

    /// Flat cash-on-delivery handling charge
    pub cod_charge: Amount,
}

impl PricingPolicy {
    /// Storefront defaults: free shipping from 499.00, 50.00 shipping, 50.00 COD handling.
    pub fn for_currency(currency: &'static Currency) -> Self {
        Self {
            currency,
            free_shipping_threshold: Money::from_minor(49_900, currency),
            shipping_charge: Money::from_minor(5_000, currency),
            cod_charge: Money::from_minor(5_000, currency),
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::for_currency(money::store_currency())
    }
}

/// Everything the calculation reads.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    /// Cart lines
    pub items: &'a [CartItem],

    /// Chosen payment method
    pub payment_method: PaymentMethod,

    /// Membership flags of the shopper
    pub membership: Membership,

    /// Selected gift wrap, if any
    pub gift_wrap: Option<&'a GiftWrap>,

    /// Coupon discount already validated by the coupon service
    pub coupon_discount: Option<Amount>,
}

impl<'a> PricingInput<'a> {
    /// Card payment, standard customer, no wrap and no coupon.
    pub fn new(items: &'a [CartItem]) -> Self {
        Self {
            items,
            payment_method: PaymentMethod::Card,
            membership: Membership::standard(),
            gift_wrap: None,
            coupon_discount: None,
        }
    }

    /// Set the payment method.
    #[must_use]
    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Set the membership flags.
    #[must_use]
    pub fn with_membership(mut self, membership: Membership) -> Self {
        self.membership = membership;
        self
    }

    /// Set the selected gift wrap.
    #[must_use]
    pub fn with_gift_wrap(mut self, gift_wrap: Option<&'a GiftWrap>) -> Self {
        self.gift_wrap = gift_wrap;
        self
    }

    /// Set the coupon discount.
    #[must_use]
    pub fn with_coupon_discount(mut self, coupon_discount: Option<Amount>) -> Self {
        self.coupon_discount = coupon_discount;
        self
    }
}

/// Every figure on the order summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    /// Sum of `price × quantity`
    pub subtotal: Amount,

    /// Sum of per-line discounts
    pub product_discount: Amount,

    /// Shipping charge
    pub shipping: Amount,

    /// Cash-on-delivery handling charge
    pub cod_charge: Amount,

    /// Gift wrap charge
    pub gift_wrap: Amount,

    /// Coupon discount
    pub coupon_discount: Amount,

    /// Amount payable
    pub total: Amount,
}

impl PriceBreakdown {
    /// Subtotal after per-line discounts, before charges and coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] on currency mismatch.
    pub fn discounted_subtotal(&self) -> Result<Amount, MoneyError> {
        self.subtotal.sub(self.product_discount)
    }

    /// Whether shipping was waived.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// A coupon or discount combination larger than the order drives the total below zero.
    ///
    /// Nothing here clamps it; callers decide whether such an order may be submitted.
    pub fn is_negative(&self) -> bool {
        self.total.is_negative()
    }

    /// Currency of the breakdown
    pub fn currency(&self) -> &'static Currency {
        self.total.currency()
    }
}

/// Price a checkout.
///
/// # Errors
///
/// - [`PricingError::CurrencyMismatch`]: an item is not in the policy currency.
/// - [`PricingError::NegativeCouponDiscount`]: the coupon discount is below zero.
/// - [`PricingError::Overflow`]: the subtotal, discounted subtotal or total does not fit in
///   minor units.
/// - [`PricingError::Money`]: a gift wrap or coupon is in another currency.
pub fn price_checkout(
    policy: &PricingPolicy,
    input: &PricingInput<'_>,
) -> Result<PriceBreakdown, PricingError> {
    ensure_currency(policy.currency, input.items)?;

    let zero = money::zero(policy.currency);

    let subtotal = input
        .items
        .iter()
        .try_fold(zero, |acc, item| acc.add(item.line_total()))
        .map_err(PricingError::from)
        .and_then(|subtotal| in_minor_range("subtotal", subtotal))?;

    let product_discount = input
        .items
        .iter()
        .try_fold(zero, |acc, item| acc.add(*item.discount()))?;

    let discounted = in_minor_range("discounted subtotal", subtotal.sub(product_discount)?)?;

    let coupon_discount = input.coupon_discount.unwrap_or(zero);

    if coupon_discount.is_negative() {
        return Err(PricingError::NegativeCouponDiscount);
    }

    let shipping = shipping_charge(policy, input, &discounted)?;
    let cod_charge = if input.payment_method.is_cod() {
        policy.cod_charge
    } else {
        zero
    };
    let gift_wrap = gift_wrap_charge(input, zero);

    let total = discounted
        .add(shipping)?
        .add(cod_charge)?
        .add(gift_wrap)?
        .sub(coupon_discount)?;

    let total = in_minor_range("total", total)?;

    Ok(PriceBreakdown {
        subtotal,
        product_discount,
        shipping,
        cod_charge,
        gift_wrap,
        coupon_discount,
        total,
    })
}

fn ensure_currency(expected: &'static Currency, items: &[CartItem]) -> Result<(), PricingError> {
    items.iter().enumerate().try_for_each(|(index, item)| {
        let actual = item.currency();

        if actual == expected {
            Ok(())
        } else {
            Err(PricingError::CurrencyMismatch {
                index,
                actual: actual.iso_alpha_code,
                expected: expected.iso_alpha_code,
            })
        }
    })
}

fn in_minor_range(figure: &'static str, amount: Amount) -> Result<Amount, PricingError> {
    match amount.try_to_minor_units() {
        Ok(_) => Ok(amount),
        Err(MoneyError::Overflow) => Err(PricingError::Overflow { figure }),
        Err(error) => Err(PricingError::Money(error)),
    }
}

fn shipping_charge(
    policy: &PricingPolicy,
    input: &PricingInput<'_>,
    discounted: &Amount,
) -> Result<Amount, PricingError> {
    let waived = input.payment_method.is_cod()
        || input.membership.is_luxe_member
        || discounted.compare(&policy.free_shipping_threshold)?.is_ge();

    if waived {
        Ok(money::zero(policy.currency))
    } else {
        Ok(policy.shipping_charge)
    }
}

fn gift_wrap_charge(input: &PricingInput<'_>, zero: Amount) -> Amount {
    match input.gift_wrap {
        Some(_) if input.membership.luxe_benefit_active() => zero,
        Some(wrap) => *wrap.price(),
        None => zero,
    }
}
