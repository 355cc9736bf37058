//! HTTP client for the storefront REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use silk::{
    coupons::CouponCode,
    gift_wrap::GiftWrap,
    items::CartItem,
    money::{self, Amount},
    orders::Order,
};
use tracing::debug;

use crate::api::{
    ApiError, Credentials, GatewayOrder, NewTicket, OrderRequest, PaymentVerification, Profile,
    StorefrontApi, Ticket,
    wire::{
        ApiStatus, CartBody, CouponBody, CouponRequest, GatewayBody, GiftWrapsBody, LoginBody,
        LoginRequest, OrderBody, OrderRequestBody, OrdersBody, PlacedBody, ProfileBody,
        TicketBody, TicketRequest, TicketsBody, VerifyRequest, WishlistRequest,
    },
};

/// Header carrying the session token.
const TOKEN_HEADER: &str = "token";

/// [`StorefrontApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    base_url: Url,
    http: Client,
}

impl HttpStorefrontApi {
    /// Create a client for the API at `base_url`, e.g. `"http://localhost:4000"`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = Url::parse(base_url).map_err(|error| invalid(error.to_string()))?;

        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot have a path".to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: parsed,
            http,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as a single path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();

        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(segments);

        debug!(%url, "GET");

        let request = with_token(self.http.get(url), token);

        read(request.send().await?).await
    }

    async fn post<B, T>(
        &self,
        segments: &[&str],
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(segments);

        debug!(%url, "POST");

        let request = with_token(self.http.post(url), token).json(body);

        read(request.send().await?).await
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header(TOKEN_HEADER, token),
        None => request,
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    decode(status, &bytes)
}

/// Decode a response body, treating `success: false` the same as a failed status.
fn decode<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ApiError> {
    let api_status = serde_json::from_slice::<ApiStatus>(bytes);

    if !status.is_success() {
        return Err(match api_status {
            Ok(api_status) if api_status.message.is_some() => {
                ApiError::rejected(api_status.message)
            }
            _ => ApiError::UnexpectedResponse(format!(
                "request failed with status {status}: {}",
                String::from_utf8_lossy(bytes)
            )),
        });
    }

    let api_status = api_status?;

    if !api_status.success {
        return Err(ApiError::rejected(api_status.message));
    }

    Ok(serde_json::from_slice(bytes)?)
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let body: LoginBody = self
            .post(
                &["api", "user", "login"],
                None,
                &LoginRequest {
                    email: &credentials.email,
                    password: &credentials.password,
                },
            )
            .await?;

        Ok(body.token)
    }

    async fn profile(&self, token: &str) -> Result<Profile, ApiError> {
        let body: ProfileBody = self.get(&["api", "user", "profile"], Some(token)).await?;

        Ok(body.user.into())
    }

    async fn apply_coupon(
        &self,
        token: &str,
        code: &CouponCode,
        cart_total: Amount,
    ) -> Result<Amount, ApiError> {
        let body: CouponBody = self
            .post(
                &["api", "coupon", "apply"],
                Some(token),
                &CouponRequest {
                    code: code.as_str(),
                    cart_total: money::to_major(&cart_total),
                },
            )
            .await?;

        body.discount()
    }

    async fn gift_wraps(&self) -> Result<Vec<GiftWrap>, ApiError> {
        let body: GiftWrapsBody = self.get(&["api", "giftwrap", "list"], None).await?;

        body.gift_wraps
            .into_iter()
            .map(GiftWrap::try_from)
            .collect()
    }

    async fn cart(&self, token: &str) -> Result<Vec<CartItem>, ApiError> {
        let body: CartBody = self.get(&["api", "cart", "get"], Some(token)).await?;

        body.cart_items
            .into_iter()
            .map(CartItem::try_from)
            .collect()
    }

    async fn place_order(&self, token: &str, order: &OrderRequest) -> Result<String, ApiError> {
        let request = OrderRequestBody::try_from(order)?;
        let body: PlacedBody = self
            .post(&["api", "order", "place"], Some(token), &request)
            .await?;

        Ok(body.order_id)
    }

    async fn create_gateway_order(
        &self,
        token: &str,
        order: &OrderRequest,
    ) -> Result<GatewayOrder, ApiError> {
        let request = OrderRequestBody::try_from(order)?;
        let body: GatewayBody = self
            .post(&["api", "order", "razorpay"], Some(token), &request)
            .await?;

        body.order.try_into()
    }

    async fn verify_payment(
        &self,
        token: &str,
        verification: &PaymentVerification,
        order: &OrderRequest,
    ) -> Result<String, ApiError> {
        let request = VerifyRequest {
            razorpay_order_id: &verification.gateway_order_id,
            razorpay_payment_id: &verification.payment_id,
            razorpay_signature: &verification.signature,
            order_data: OrderRequestBody::try_from(order)?,
        };

        let body: PlacedBody = self
            .post(&["api", "order", "verifyRazorpay"], Some(token), &request)
            .await?;

        Ok(body.order_id)
    }

    async fn order(&self, token: &str, order_id: &str) -> Result<Order, ApiError> {
        if matches!(order_id.trim(), "" | "." | "..") {
            return Err(ApiError::InvalidPayload(format!(
                "invalid order id {order_id:?}"
            )));
        }

        let body: OrderBody = self.get(&["api", "order", order_id], Some(token)).await?;

        body.order.try_into()
    }

    async fn orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        let body: OrdersBody = self
            .post(&["api", "order", "userorders"], Some(token), &serde_json::json!({}))
            .await?;

        body.orders.into_iter().map(Order::try_from).collect()
    }

    async fn add_to_wishlist(&self, token: &str, product_id: &str) -> Result<(), ApiError> {
        let _status: ApiStatus = self
            .post(
                &["api", "user", "wishlist", "add"],
                Some(token),
                &WishlistRequest { product_id },
            )
            .await?;

        Ok(())
    }

    async fn remove_from_wishlist(&self, token: &str, product_id: &str) -> Result<(), ApiError> {
        let _status: ApiStatus = self
            .post(
                &["api", "user", "wishlist", "remove"],
                Some(token),
                &WishlistRequest { product_id },
            )
            .await?;

        Ok(())
    }

    async fn decrement_gift_wraps(&self, token: &str) -> Result<(), ApiError> {
        let _status: ApiStatus = self
            .post(
                &["api", "user", "giftwrap", "decrement"],
                Some(token),
                &serde_json::json!({}),
            )
            .await?;

        Ok(())
    }

    async fn create_ticket(&self, token: &str, ticket: &NewTicket) -> Result<Ticket, ApiError> {
        let body: TicketBody = self
            .post(
                &["api", "ticket", "create"],
                Some(token),
                &TicketRequest {
                    subject: ticket.subject(),
                    message: ticket.message(),
                    order_id: ticket.order_id(),
                },
            )
            .await?;

        body.ticket.try_into()
    }

    async fn tickets(&self, token: &str) -> Result<Vec<Ticket>, ApiError> {
        let body: TicketsBody = self.get(&["api", "ticket", "user"], Some(token)).await?;

        body.tickets.into_iter().map(Ticket::try_from).collect()
    }
}
