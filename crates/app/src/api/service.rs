//! Storefront API service.

use async_trait::async_trait;
use mockall::automock;
use silk::{coupons::CouponCode, gift_wrap::GiftWrap, items::CartItem, money::Amount, orders::Order};

use crate::api::{
    ApiError, Credentials, GatewayOrder, NewTicket, OrderRequest, PaymentVerification, Profile,
    Ticket,
};

#[automock]
#[async_trait]
/// Operations offered by the storefront REST API.
///
/// Authenticated calls take the session token, which is sent in the `token` header.
pub trait StorefrontApi: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;

    /// Fetch the signed-in user's profile.
    async fn profile(&self, token: &str) -> Result<Profile, ApiError>;

    /// Redeem a coupon against a cart total and return the discount granted.
    async fn apply_coupon(
        &self,
        token: &str,
        code: &CouponCode,
        cart_total: Amount,
    ) -> Result<Amount, ApiError>;

    /// List the gift wraps on offer.
    async fn gift_wraps(&self) -> Result<Vec<GiftWrap>, ApiError>;

    /// Fetch the user's cart.
    async fn cart(&self, token: &str) -> Result<Vec<CartItem>, ApiError>;

    /// Place a cash-on-delivery order and return its identifier.
    async fn place_order(&self, token: &str, order: &OrderRequest) -> Result<String, ApiError>;

    /// Create a payment gateway order for a card checkout.
    async fn create_gateway_order(
        &self,
        token: &str,
        order: &OrderRequest,
    ) -> Result<GatewayOrder, ApiError>;

    /// Submit the gateway's proof of payment and return the identifier of the recorded order.
    async fn verify_payment(
        &self,
        token: &str,
        verification: &PaymentVerification,
        order: &OrderRequest,
    ) -> Result<String, ApiError>;

    /// Fetch one order.
    async fn order(&self, token: &str, order_id: &str) -> Result<Order, ApiError>;

    /// List the user's orders.
    async fn orders(&self, token: &str) -> Result<Vec<Order>, ApiError>;

    /// Add a product to the wishlist.
    async fn add_to_wishlist(&self, token: &str, product_id: &str) -> Result<(), ApiError>;

    /// Remove a product from the wishlist.
    async fn remove_from_wishlist(&self, token: &str, product_id: &str) -> Result<(), ApiError>;

    /// Use one of the Luxe member's free gift wraps.
    async fn decrement_gift_wraps(&self, token: &str) -> Result<(), ApiError>;

    /// Open a support ticket.
    async fn create_ticket(&self, token: &str, ticket: &NewTicket) -> Result<Ticket, ApiError>;

    /// List the user's support tickets.
    async fn tickets(&self, token: &str) -> Result<Vec<Ticket>, ApiError>;
}
