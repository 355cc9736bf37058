//! Orders
//!
//! An order is the server's immutable record of a completed checkout. Only its status changes
//! after creation.

use jiff::Timestamp;
use rusty_money::MoneyError;

use crate::{
    address::Address,
    gift_wrap::GiftWrapSelection,
    items::CartItem,
    money::{self, Amount},
    payment::PaymentMethod,
    pricing::PriceBreakdown,
    status::{OrderStatus, StatusProjection},
};

/// Snapshot of a placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order identifier
    pub id: String,

    /// Lines as they were at checkout
    pub items: Vec<CartItem>,

    /// Delivery address
    pub address: Address,

    /// How the order was paid
    pub payment_method: PaymentMethod,

    /// Product amount after per-line discounts
    pub product_amount: Amount,

    /// Shipping charged
    pub shipping_charge: Amount,

    /// Cash-on-delivery handling charged
    pub cod_charge: Amount,

    /// Gift wrap and message, if one was chosen
    pub gift_wrap: Option<GiftWrapSelection>,

    /// Amount charged for the gift wrap (zero when the Luxe benefit covered it)
    pub gift_wrap_charge: Amount,

    /// Coupon discount granted
    pub coupon_discount: Amount,

    /// Amount payable
    pub order_total: Amount,

    /// Latest reported status
    pub order_status: OrderStatus,

    /// When the order was placed
    pub date: Timestamp,

    /// When the order shipped
    pub shipped_at: Option<Timestamp>,

    /// When the order was delivered
    pub delivered_at: Option<Timestamp>,
}

impl Order {
    /// Summary figures using the amounts stored on the order.
    ///
    /// Subtotal and product discount come from the stored lines; charges, coupon and total are
    /// the recorded values, so the summary matches what the customer paid even if store
    /// policy has changed since.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the stored lines are in mixed currencies.
    pub fn breakdown(&self) -> Result<PriceBreakdown, MoneyError> {
        let zero = money::zero(self.order_total.currency());

        let subtotal = self
            .items
            .iter()
            .try_fold(zero, |acc, item| acc.add(item.line_total()))?;

        let product_discount = self
            .items
            .iter()
            .try_fold(zero, |acc, item| acc.add(*item.discount()))?;

        Ok(PriceBreakdown {
            subtotal,
            product_discount,
            shipping: self.shipping_charge,
            cod_charge: self.cod_charge,
            gift_wrap: self.gift_wrap_charge,
            coupon_discount: self.coupon_discount,
            total: self.order_total,
        })
    }

    /// Whether the stored figures add up to the stored total.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the stored amounts are in mixed currencies.
    pub fn reconciles(&self) -> Result<bool, MoneyError> {
        let expected = self
            .product_amount
            .add(self.shipping_charge)?
            .add(self.cod_charge)?
            .add(self.gift_wrap_charge)?
            .sub(self.coupon_discount)?;

        Ok(expected == self.order_total)
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Status projected onto the progress display.
    pub fn projection(&self) -> StatusProjection {
        self.order_status.project()
    }

    /// Whether polling can stop.
    pub fn is_delivered(&self) -> bool {
        self.order_status.is_delivered()
    }
}
