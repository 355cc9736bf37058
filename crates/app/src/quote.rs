//! Offline Quotes
//!
//! Prices a cart described in YAML, without talking to the storefront:
//!
//! ```yaml
//! payment_method: COD
//! membership:
//!   luxe: true
//!   gift_wraps_left: 2
//! gift_wrap:
//!   name: Velvet Box
//!   price: 99
//! coupon_discount: 200
//! items:
//!   - product_id: sku-robe
//!     name: Silk Robe
//!     price: 1000
//!     quantity: 2
//!     size: M
//!     color: Ivory
//! ```

use std::{fs, path::Path};

use rust_decimal::Decimal;
use serde::Deserialize;
use silk::{
    gift_wrap::{GiftWrap, GiftWrapError},
    items::{CartItem, CartItemError},
    membership::Membership,
    money::{self, MoneyConversionError},
    payment::PaymentMethod,
    pricing::{PriceBreakdown, PricingError, PricingInput, PricingPolicy, price_checkout},
};
use thiserror::Error;

/// Quote file errors
#[derive(Debug, Error)]
pub enum QuoteError {
    /// IO error reading the quote file
    #[error("failed to read quote file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// An amount does not fit in minor units
    #[error(transparent)]
    Amount(#[from] MoneyConversionError),

    /// A cart line is invalid
    #[error(transparent)]
    Item(#[from] CartItemError),

    /// The gift wrap is invalid
    #[error(transparent)]
    GiftWrap(#[from] GiftWrapError),

    /// Pricing failed
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Debug, Default, Deserialize)]
struct MembershipFixture {
    #[serde(default)]
    luxe: bool,

    #[serde(default)]
    gift_wraps_left: u32,
}

#[derive(Debug, Deserialize)]
struct GiftWrapFixture {
    #[serde(default = "default_wrap_id")]
    id: String,

    name: String,

    price: Decimal,
}

fn default_wrap_id() -> String {
    "wrap".to_string()
}

#[derive(Debug, Deserialize)]
struct ItemFixture {
    product_id: String,

    name: String,

    price: Decimal,

    #[serde(default = "default_quantity")]
    quantity: u32,

    #[serde(default)]
    size: Option<String>,

    #[serde(default)]
    color: Option<String>,

    #[serde(default)]
    discount: Decimal,
}

fn default_quantity() -> u32 {
    1
}

/// A cart to price offline.
#[derive(Debug, Deserialize)]
pub struct QuoteFile {
    #[serde(default)]
    payment_method: PaymentMethod,

    #[serde(default)]
    membership: MembershipFixture,

    #[serde(default)]
    gift_wrap: Option<GiftWrapFixture>,

    #[serde(default)]
    coupon_discount: Option<Decimal>,

    items: Vec<ItemFixture>,
}

/// A priced offline cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Cart lines
    pub items: Vec<CartItem>,

    /// Priced summary
    pub breakdown: PriceBreakdown,
}

impl QuoteFile {
    /// Load a quote file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, QuoteError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Parse quote YAML.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Yaml`] if the YAML does not describe a cart.
    pub fn from_yaml(yaml: &str) -> Result<Self, QuoteError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Override the payment method.
    #[must_use]
    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Price the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if a line, the wrap or an amount is invalid, or pricing fails.
    pub fn price(&self, policy: &PricingPolicy) -> Result<Quote, QuoteError> {
        let currency = policy.currency;

        let items = self
            .items
            .iter()
            .map(|fixture| -> Result<CartItem, QuoteError> {
                let mut item = CartItem::new(
                    fixture.product_id.as_str(),
                    fixture.name.as_str(),
                    money::from_major(fixture.price, currency)?,
                    fixture.quantity,
                )?
                .with_discount(money::from_major(fixture.discount, currency)?)?;

                if let Some(size) = &fixture.size {
                    item = item.with_size(size.as_str());
                }

                if let Some(color) = &fixture.color {
                    item = item.with_color(color.as_str());
                }

                Ok(item)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let gift_wrap = self
            .gift_wrap
            .as_ref()
            .map(|wrap| {
                Ok::<_, QuoteError>(GiftWrap::new(
                    wrap.id.as_str(),
                    wrap.name.as_str(),
                    money::from_major(wrap.price, currency)?,
                    None,
                )?)
            })
            .transpose()?;

        let coupon_discount = self
            .coupon_discount
            .map(|discount| money::from_major(discount, currency))
            .transpose()?;

        let membership = Membership {
            is_luxe_member: self.membership.luxe,
            gift_wraps_left: self.membership.gift_wraps_left,
        };

        let input = PricingInput::new(&items)
            .with_payment_method(self.payment_method)
            .with_membership(membership)
            .with_gift_wrap(gift_wrap.as_ref())
            .with_coupon_discount(coupon_discount);

        let breakdown = price_checkout(policy, &input)?;

        Ok(Quote { items, breakdown })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::Money;
    use silk::money::store_currency;
    use testresult::TestResult;

    use super::*;

    const CART: &str = "
payment_method: COD
membership:
  luxe: true
  gift_wraps_left: 2
gift_wrap:
  name: Velvet Box
  price: 99
coupon_discount: 200
items:
  - product_id: sku-robe
    name: Silk Robe
    price: 1000
    quantity: 2
    size: M
    color: Ivory
  - product_id: sku-slip
    name: Satin Slip
    price: 450.50
    discount: 50.5
";

    #[test]
    fn prices_yaml_cart() -> TestResult {
        let quote = QuoteFile::from_yaml(CART)?.price(&PricingPolicy::default())?;
        let inr = |minor| Money::from_minor(minor, store_currency());

        assert_eq!(quote.items.len(), 2);
        assert_eq!(quote.breakdown.subtotal, inr(245_050));
        assert_eq!(quote.breakdown.product_discount, inr(5_050));
        assert_eq!(quote.breakdown.gift_wrap, inr(0));
        assert_eq!(quote.breakdown.cod_charge, inr(5_000));
        assert_eq!(quote.breakdown.total, inr(225_000));

        Ok(())
    }

    #[test]
    fn payment_method_can_be_overridden() -> TestResult {
        let quote = QuoteFile::from_yaml(CART)?
            .with_payment_method(PaymentMethod::Card)
            .price(&PricingPolicy::default())?;

        assert_eq!(quote.breakdown.cod_charge.to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn minimal_cart_defaults_to_card_and_standard_membership() -> TestResult {
        let quote = QuoteFile::from_yaml(
            "items:\n  - product_id: sku-brief\n    name: Lace Brief\n    price: 400\n",
        )?
        .price(&PricingPolicy::default())?;

        assert_eq!(quote.breakdown.shipping.to_minor_units(), 5_000);
        assert_eq!(quote.breakdown.total.to_minor_units(), 45_000);

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() -> TestResult {
        let file = QuoteFile::from_yaml(
            "items:\n  - product_id: sku\n    name: Thong\n    price: 10\n    quantity: 0\n",
        )?;

        assert!(matches!(
            file.price(&PricingPolicy::default()),
            Err(QuoteError::Item(CartItemError::ZeroQuantity(_)))
        ));

        Ok(())
    }
}
