//! Checkout Session
//!
//! Tracks one checkout from cart to placed order: payment method, gift wrap, coupon, and the
//! membership snapshot the quote is priced with. Every figure comes from
//! [`silk::pricing::price_checkout`].

use std::{fmt, sync::Arc};

use silk::{
    address::{Address, AddressError},
    coupons::{AppliedCoupon, CouponCode, CouponError},
    gift_wrap::{GiftWrap, GiftWrapError, GiftWrapSelection},
    items::CartItem,
    membership::Membership,
    money::Amount,
    payment::PaymentMethod,
    pricing::{PriceBreakdown, PricingError, PricingInput, PricingPolicy, price_checkout},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, GatewayOrder, OrderRequest, PaymentVerification, StorefrontApi};

/// Errors raised during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// The delivery address is incomplete.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The coupon code is malformed.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// The gift wrap selection is invalid.
    #[error(transparent)]
    GiftWrap(#[from] GiftWrapError),

    /// The quote could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Discounts exceed the order value.
    #[error("order total {0} is negative")]
    NegativeTotal(Amount),

    /// A card payment was confirmed without a pending gateway order.
    #[error("no card payment is awaiting confirmation")]
    NoPendingPayment,

    /// The storefront API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<rusty_money::MoneyError> for CheckoutError {
    fn from(error: rusty_money::MoneyError) -> Self {
        Self::Pricing(PricingError::Money(error))
    }
}

#[derive(Debug, Clone)]
struct ChosenWrap {
    selection: GiftWrapSelection,

    /// Membership as it stood before the selection used a free wrap.
    priced_with: Membership,
}

/// Result of submitting a checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// Cash-on-delivery order recorded.
    Placed {
        /// Order identifier
        order_id: String,
    },

    /// Card payment must be completed in the payment widget, then confirmed with
    /// [`CheckoutSession::confirm_card_payment`].
    AwaitingPayment(GatewayOrder),
}

/// One in-progress checkout.
pub struct CheckoutSession {
    api: Arc<dyn StorefrontApi>,
    token: String,
    policy: PricingPolicy,
    items: Vec<CartItem>,
    membership: Membership,
    payment_method: PaymentMethod,
    gift_wrap: Option<ChosenWrap>,
    coupon: Option<AppliedCoupon>,
    pending: Option<OrderRequest>,
}

impl fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("items", &self.items)
            .field("membership", &self.membership)
            .field("payment_method", &self.payment_method)
            .field("gift_wrap", &self.gift_wrap)
            .field("coupon", &self.coupon)
            .finish_non_exhaustive()
    }
}

impl CheckoutSession {
    /// Start a card checkout of `items` for a user with `membership`.
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        token: impl Into<String>,
        items: Vec<CartItem>,
        membership: Membership,
    ) -> Self {
        Self {
            api,
            token: token.into(),
            policy: PricingPolicy::default(),
            items,
            membership,
            payment_method: PaymentMethod::Card,
            gift_wrap: None,
            coupon: None,
            pending: None,
        }
    }

    /// Price with a different policy.
    #[must_use]
    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cart lines
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Membership, including free wraps used during this checkout
    pub fn membership(&self) -> Membership {
        self.membership
    }

    /// Chosen payment method
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Chosen gift wrap
    pub fn gift_wrap(&self) -> Option<&GiftWrapSelection> {
        self.gift_wrap.as_ref().map(|chosen| &chosen.selection)
    }

    /// Applied coupon
    pub fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    /// Change how the order will be paid.
    pub fn set_payment_method(&mut self, payment_method: PaymentMethod) {
        self.payment_method = payment_method;
    }

    /// Choose a gift wrap.
    ///
    /// A Luxe member with free wraps left uses one now, at selection time; clearing or
    /// abandoning the checkout afterwards does not give it back. The wrap stays free in the
    /// quote even when it used the last one.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::GiftWrap`] for an over-long message, or the API error if the
    /// free wrap could not be claimed, in which case nothing is selected.
    pub async fn select_gift_wrap(
        &mut self,
        wrap: GiftWrap,
        message: Option<String>,
    ) -> Result<(), CheckoutError> {
        let selection = GiftWrapSelection::new(wrap, message)?;
        let priced_with = self.membership;

        if priced_with.luxe_benefit_active() {
            self.api.decrement_gift_wraps(&self.token).await?;
            self.membership.consume_gift_wrap();

            info!(
                wrap = selection.wrap().id(),
                gift_wraps_left = self.membership.gift_wraps_left,
                "used a free gift wrap"
            );
        }

        self.gift_wrap = Some(ChosenWrap {
            selection,
            priced_with,
        });

        Ok(())
    }

    /// Drop the gift wrap.
    pub fn clear_gift_wrap(&mut self) {
        self.gift_wrap = None;
    }

    /// Redeem a coupon, replacing any coupon already applied.
    ///
    /// On failure no coupon remains applied.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Coupon`] for a blank code, or the API error when the coupon
    /// service refuses it.
    pub async fn apply_coupon(&mut self, code: &str) -> Result<&AppliedCoupon, CheckoutError> {
        self.coupon = None;

        let code = CouponCode::new(code)?;
        let cart_total = self.price(None)?.discounted_subtotal()?;

        match self.api.apply_coupon(&self.token, &code, cart_total).await {
            Ok(discount) => {
                info!(%code, %discount, "coupon applied");

                Ok(self.coupon.insert(AppliedCoupon { code, discount }))
            }
            Err(error) => {
                warn!(%code, %error, "coupon rejected");

                Err(error.into())
            }
        }
    }

    /// Remove the applied coupon.
    pub fn clear_coupon(&mut self) {
        self.coupon = None;
    }

    /// Price the checkout as it stands.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Pricing`] if the cart cannot be priced.
    pub fn quote(&self) -> Result<PriceBreakdown, CheckoutError> {
        self.price(self.coupon.as_ref().map(|coupon| coupon.discount))
    }

    fn price(&self, coupon_discount: Option<Amount>) -> Result<PriceBreakdown, CheckoutError> {
        let membership = self
            .gift_wrap
            .as_ref()
            .map_or(self.membership, |chosen| chosen.priced_with);

        let input = PricingInput::new(&self.items)
            .with_payment_method(self.payment_method)
            .with_membership(membership)
            .with_gift_wrap(self.gift_wrap().map(GiftWrapSelection::wrap))
            .with_coupon_discount(coupon_discount);

        Ok(price_checkout(&self.policy, &input)?)
    }

    /// Submit the checkout.
    ///
    /// Cash-on-delivery orders are recorded straight away. Card checkouts create a gateway
    /// order and wait for [`CheckoutSession::confirm_card_payment`].
    ///
    /// # Errors
    ///
    /// Returns an error if the address is incomplete, the cart is empty, the total is
    /// negative, or the order service refuses the order.
    pub async fn place_order(&mut self, address: Address) -> Result<Placement, CheckoutError> {
        address.validate()?;

        if self.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let breakdown = self.quote()?;

        if breakdown.is_negative() {
            return Err(CheckoutError::NegativeTotal(breakdown.total));
        }

        let request = OrderRequest {
            items: self.items.clone(),
            address,
            payment_method: self.payment_method,
            breakdown,
            gift_wrap: self.gift_wrap().cloned(),
            coupon_code: self.coupon.as_ref().map(|coupon| coupon.code.clone()),
        };

        if self.payment_method.is_cod() {
            let order_id = self.api.place_order(&self.token, &request).await?;

            info!(%order_id, total = %breakdown.total, "cash-on-delivery order placed");

            return Ok(Placement::Placed { order_id });
        }

        let gateway = self.api.create_gateway_order(&self.token, &request).await?;

        info!(gateway_order = %gateway.id, amount = %gateway.amount, "awaiting card payment");

        self.pending = Some(request);

        Ok(Placement::AwaitingPayment(gateway))
    }

    /// Submit the payment widget's proof of payment for the pending card checkout and return
    /// the recorded order's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoPendingPayment`] if no card checkout is waiting, or the API
    /// error if verification fails. A failed verification can be retried.
    pub async fn confirm_card_payment(
        &mut self,
        verification: &PaymentVerification,
    ) -> Result<String, CheckoutError> {
        let request = self.pending.as_ref().ok_or(CheckoutError::NoPendingPayment)?;

        let order_id = self
            .api
            .verify_payment(&self.token, verification, request)
            .await?;

        self.pending = None;

        info!(%order_id, "card payment verified");

        Ok(order_id)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::Money;
    use silk::money::store_currency;
    use testresult::TestResult;

    use crate::api::MockStorefrontApi;

    use super::*;

    fn inr(major: i64) -> Amount {
        Money::from_minor(major * 100, store_currency())
    }

    fn robes() -> TestResult<Vec<CartItem>> {
        Ok(vec![CartItem::new("sku-robe", "Silk Robe", inr(1_000), 2)?])
    }

    fn address() -> Address {
        Address {
            name: "Asha".to_string(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            zip: "411001".to_string(),
            country: "India".to_string(),
            phone: "9999999999".to_string(),
        }
    }

    fn velvet_box() -> TestResult<GiftWrap> {
        Ok(GiftWrap::new("gw-1", "Velvet Box", inr(100), None)?)
    }

    fn session(api: MockStorefrontApi, membership: Membership) -> TestResult<CheckoutSession> {
        Ok(CheckoutSession::new(Arc::new(api), "tok-1", robes()?, membership))
    }

    #[tokio::test]
    async fn coupon_is_priced_against_pre_coupon_total() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_apply_coupon()
            .once()
            .withf(|token, code, total| {
                token == "tok-1" && code.as_str() == "SILK200" && *total == inr(2_000)
            })
            .return_once(|_, _, _| Ok(inr(200)));

        let mut checkout = session(api, Membership::standard())?;
        checkout.set_payment_method(PaymentMethod::Cod);

        assert_eq!(checkout.quote()?.total, inr(2_050));

        let applied = checkout.apply_coupon(" silk200 ").await?;

        assert_eq!(applied.code.as_str(), "SILK200");
        assert_eq!(checkout.quote()?.total, inr(1_850));

        checkout.clear_coupon();

        assert_eq!(checkout.quote()?.total, inr(2_050));

        Ok(())
    }

    #[tokio::test]
    async fn new_coupon_replaces_previous() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let mut discounts = vec![inr(100), inr(200)];

        api.expect_apply_coupon()
            .times(2)
            .returning(move |_, _, _| discounts.pop().ok_or_else(|| ApiError::rejected(None)));

        let mut checkout = session(api, Membership::standard())?;

        checkout.apply_coupon("FIRST").await?;
        checkout.apply_coupon("SECOND").await?;

        assert_eq!(checkout.quote()?.coupon_discount, inr(100));
        assert_eq!(
            checkout.coupon().map(|coupon| coupon.code.as_str()),
            Some("SECOND")
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejected_coupon_clears_previous_discount() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let mut calls = 0;

        api.expect_apply_coupon()
            .times(2)
            .returning(move |_, _, _| {
                calls += 1;

                if calls == 1 {
                    Ok(inr(200))
                } else {
                    Err(ApiError::Rejected {
                        message: "Coupon expired".to_string(),
                    })
                }
            });

        let mut checkout = session(api, Membership::standard())?;

        checkout.apply_coupon("SILK200").await?;

        let result = checkout.apply_coupon("OLD50").await;

        assert!(matches!(
            result,
            Err(CheckoutError::Api(ApiError::Rejected { .. }))
        ));
        assert!(checkout.coupon().is_none());
        assert_eq!(checkout.quote()?.total, inr(2_000));

        Ok(())
    }

    #[tokio::test]
    async fn blank_coupon_code_never_reaches_the_api() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_apply_coupon().never();

        let mut checkout = session(api, Membership::standard())?;

        assert!(matches!(
            checkout.apply_coupon("   ").await,
            Err(CheckoutError::Coupon(CouponError::EmptyCode))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn last_free_wrap_is_used_at_selection_and_stays_free() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_decrement_gift_wraps()
            .once()
            .withf(|token| token == "tok-1")
            .return_once(|_| Ok(()));

        let mut checkout = session(api, Membership::luxe(1))?;

        checkout
            .select_gift_wrap(velvet_box()?, Some("Happy birthday".to_string()))
            .await?;

        assert_eq!(checkout.membership(), Membership::luxe(0));
        assert_eq!(checkout.quote()?.gift_wrap, inr(0));
        assert_eq!(
            checkout.gift_wrap().and_then(GiftWrapSelection::message),
            Some("Happy birthday")
        );

        Ok(())
    }

    #[tokio::test]
    async fn reselecting_after_last_free_wrap_is_charged() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_decrement_gift_wraps()
            .once()
            .return_once(|_| Ok(()));

        let mut checkout = session(api, Membership::luxe(1))?;

        checkout.select_gift_wrap(velvet_box()?, None).await?;
        checkout.clear_gift_wrap();

        assert_eq!(checkout.membership(), Membership::luxe(0));

        checkout.select_gift_wrap(velvet_box()?, None).await?;

        assert_eq!(checkout.quote()?.gift_wrap, inr(100));

        Ok(())
    }

    #[tokio::test]
    async fn standard_customer_pays_for_wrap() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_decrement_gift_wraps().never();

        let mut checkout = session(api, Membership::standard())?;

        checkout.select_gift_wrap(velvet_box()?, None).await?;

        assert_eq!(checkout.quote()?.gift_wrap, inr(100));
        assert_eq!(checkout.quote()?.total, inr(2_100));

        Ok(())
    }

    #[tokio::test]
    async fn failed_wrap_claim_selects_nothing() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_decrement_gift_wraps()
            .once()
            .return_once(|_| Err(ApiError::UnexpectedResponse("502".to_string())));

        let mut checkout = session(api, Membership::luxe(3))?;

        assert!(checkout.select_gift_wrap(velvet_box()?, None).await.is_err());
        assert!(checkout.gift_wrap().is_none());
        assert_eq!(checkout.membership(), Membership::luxe(3));

        Ok(())
    }

    #[tokio::test]
    async fn over_long_gift_message_is_rejected_before_claiming() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_decrement_gift_wraps().never();

        let mut checkout = session(api, Membership::luxe(3))?;
        let message = "x".repeat(201);

        assert!(matches!(
            checkout.select_gift_wrap(velvet_box()?, Some(message)).await,
            Err(CheckoutError::GiftWrap(GiftWrapError::MessageTooLong(201)))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn cod_order_is_placed_with_quoted_figures() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_place_order()
            .once()
            .withf(|token, order| {
                token == "tok-1"
                    && order.payment_method == PaymentMethod::Cod
                    && order.breakdown.total == inr(2_050)
                    && order.address.city == "Pune"
            })
            .return_once(|_, _| Ok("ord-1".to_string()));

        api.expect_create_gateway_order().never();

        let mut checkout = session(api, Membership::standard())?;
        checkout.set_payment_method(PaymentMethod::Cod);

        assert_eq!(
            checkout.place_order(address()).await?,
            Placement::Placed {
                order_id: "ord-1".to_string()
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn card_order_waits_for_verified_payment() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_place_order().never();

        api.expect_create_gateway_order()
            .once()
            .return_once(|_, order| {
                Ok(GatewayOrder {
                    id: "order_Nx1".to_string(),
                    amount: order.breakdown.total,
                })
            });

        api.expect_verify_payment()
            .once()
            .withf(|_, verification, order| {
                verification.gateway_order_id == "order_Nx1"
                    && order.payment_method == PaymentMethod::Card
            })
            .return_once(|_, _, _| Ok("ord-2".to_string()));

        let mut checkout = session(api, Membership::standard())?;

        let Placement::AwaitingPayment(gateway) = checkout.place_order(address()).await? else {
            panic!("card checkout should await payment");
        };

        assert_eq!(gateway.amount, inr(2_000));

        let verification = PaymentVerification {
            gateway_order_id: gateway.id,
            payment_id: "pay_1".to_string(),
            signature: "sig".to_string(),
        };

        assert_eq!(checkout.confirm_card_payment(&verification).await?, "ord-2");
        assert!(matches!(
            checkout.confirm_card_payment(&verification).await,
            Err(CheckoutError::NoPendingPayment)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn negative_total_is_refused() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_apply_coupon()
            .once()
            .return_once(|_, _, _| Ok(inr(5_000)));
        api.expect_place_order().never();
        api.expect_create_gateway_order().never();

        let mut checkout = session(api, Membership::standard())?;

        checkout.apply_coupon("TOOGOOD").await?;

        assert!(matches!(
            checkout.place_order(address()).await,
            Err(CheckoutError::NegativeTotal(total)) if total == inr(-3_000)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn incomplete_address_or_empty_cart_is_refused() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_place_order().never();
        api.expect_create_gateway_order().never();

        let api: Arc<dyn StorefrontApi> = Arc::new(api);
        let mut checkout =
            CheckoutSession::new(Arc::clone(&api), "tok-1", robes()?, Membership::standard());

        let mut missing_zip = address();
        missing_zip.zip = " ".to_string();

        assert!(matches!(
            checkout.place_order(missing_zip).await,
            Err(CheckoutError::Address(AddressError::MissingField("zip")))
        ));

        let mut empty = CheckoutSession::new(api, "tok-1", Vec::new(), Membership::standard());

        assert!(matches!(
            empty.place_order(address()).await,
            Err(CheckoutError::EmptyCart)
        ));

        Ok(())
    }
}
