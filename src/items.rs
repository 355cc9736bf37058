//! Cart Items

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::money::{self, Amount};

/// Errors building a cart item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartItemError {
    /// Quantity must be at least one.
    #[error("quantity for {0} must be at least 1")]
    ZeroQuantity(String),

    /// Unit price cannot be negative.
    #[error("unit price for {0} cannot be negative")]
    NegativePrice(String),

    /// Per-line discount cannot be negative.
    #[error("discount for {0} cannot be negative")]
    NegativeDiscount(String),

    /// Discount currency differs from the unit price currency.
    #[error("discount for {0} is in a different currency from its price")]
    DiscountCurrencyMismatch(String),

    /// `price × quantity` does not fit in minor units.
    #[error("line total for {0} overflows")]
    LineTotalOverflow(String),
}

/// A line in the cart, priced for the selected variation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    product_id: String,
    name: String,
    price: Amount,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
    discount: Amount,
    applied_coupon: Option<String>,
}

impl CartItem {
    /// Create a cart line with no discount.
    ///
    /// # Errors
    ///
    /// - [`CartItemError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartItemError::NegativePrice`]: `price` is below zero.
    /// - [`CartItemError::LineTotalOverflow`]: `price × quantity` overflows.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: Amount,
        quantity: u32,
    ) -> Result<Self, CartItemError> {
        let product_id = product_id.into();

        if quantity == 0 {
            return Err(CartItemError::ZeroQuantity(product_id));
        }

        if price.is_negative() {
            return Err(CartItemError::NegativePrice(product_id));
        }

        if money::times(&price, quantity).is_none() {
            return Err(CartItemError::LineTotalOverflow(product_id));
        }

        Ok(Self {
            product_id,
            name: name.into(),
            price,
            quantity,
            size: None,
            color: None,
            discount: money::zero(price.currency()),
            applied_coupon: None,
        })
    }

    /// Set the selected size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Set the selected color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the coupon code recorded against this line.
    #[must_use]
    pub fn with_applied_coupon(mut self, code: impl Into<String>) -> Self {
        self.applied_coupon = Some(code.into());
        self
    }

    /// Set the absolute discount already applied to this line.
    ///
    /// # Errors
    ///
    /// - [`CartItemError::NegativeDiscount`]: `discount` is below zero.
    /// - [`CartItemError::DiscountCurrencyMismatch`]: `discount` is not in the price currency.
    pub fn with_discount(mut self, discount: Amount) -> Result<Self, CartItemError> {
        if discount.currency() != self.price.currency() {
            return Err(CartItemError::DiscountCurrencyMismatch(self.product_id));
        }

        if discount.is_negative() {
            return Err(CartItemError::NegativeDiscount(self.product_id));
        }

        self.discount = discount;

        Ok(self)
    }

    /// Product identifier
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn price(&self) -> &Amount {
        &self.price
    }

    /// Quantity, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Selected size, if any
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Selected color, if any
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Discount already applied to the whole line
    pub fn discount(&self) -> &Amount {
        &self.discount
    }

    /// Coupon code recorded against the line
    pub fn applied_coupon(&self) -> Option<&str> {
        self.applied_coupon.as_deref()
    }

    /// Currency of the line
    pub fn currency(&self) -> &'static Currency {
        self.price.currency()
    }

    /// `price × quantity`, before any discount.
    pub fn line_total(&self) -> Amount {
        // Overflow is rejected in `new`.
        money::times(&self.price, self.quantity).unwrap_or(self.price)
    }

    /// Human readable variation, e.g. `"M / Black"`.
    pub fn variation(&self) -> String {
        match (self.size(), self.color()) {
            (Some(size), Some(color)) => format!("{size} / {color}"),
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => String::new(),
        }
    }
}
