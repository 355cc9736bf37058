//! Storefront API models.

use jiff::Timestamp;
use silk::{
    address::Address, coupons::CouponCode, gift_wrap::GiftWrapSelection, items::CartItem,
    membership::Membership, money::Amount, payment::PaymentMethod, pricing::PriceBreakdown,
};
use thiserror::Error;

/// Sign-in credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// User identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Luxe membership flags
    pub membership: Membership,

    /// Wishlisted product identifiers
    pub wishlist: Vec<String>,
}

/// Everything the order service needs to record a checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Cart lines
    pub items: Vec<CartItem>,

    /// Delivery address
    pub address: Address,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Figures quoted to the customer
    pub breakdown: PriceBreakdown,

    /// Gift wrap and message
    pub gift_wrap: Option<GiftWrapSelection>,

    /// Redeemed coupon
    pub coupon_code: Option<CouponCode>,
}

/// Payment gateway order handed to the card payment widget.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    /// Gateway order identifier
    pub id: String,

    /// Amount the gateway will collect
    pub amount: Amount,
}

/// Proof of payment returned by the card payment widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerification {
    /// Gateway order identifier
    pub gateway_order_id: String,

    /// Gateway payment identifier
    pub payment_id: String,

    /// Gateway signature over order and payment identifiers
    pub signature: String,
}

/// Errors raised when composing a support ticket.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TicketError {
    /// Subject is empty or whitespace.
    #[error("ticket subject is required")]
    BlankSubject,

    /// Message is empty or whitespace.
    #[error("ticket message is required")]
    BlankMessage,
}

/// A support ticket ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    subject: String,
    message: String,
    order_id: Option<String>,
}

impl NewTicket {
    /// Compose a ticket, optionally about a specific order.
    ///
    /// # Errors
    ///
    /// Returns a [`TicketError`] if the subject or message is blank.
    pub fn new(
        subject: &str,
        message: &str,
        order_id: Option<&str>,
    ) -> Result<Self, TicketError> {
        let subject = subject.trim();
        let message = message.trim();

        if subject.is_empty() {
            return Err(TicketError::BlankSubject);
        }

        if message.is_empty() {
            return Err(TicketError::BlankMessage);
        }

        Ok(Self {
            subject: subject.to_string(),
            message: message.to_string(),
            order_id: order_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        })
    }

    /// Subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Body
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Order the ticket is about
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }
}

/// A support ticket as stored by the ticket service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Ticket identifier
    pub id: String,

    /// Subject line
    pub subject: String,

    /// Body
    pub message: String,

    /// Related order
    pub order_id: Option<String>,

    /// Status label
    pub status: String,

    /// When the ticket was opened
    pub created_at: Option<Timestamp>,
}
