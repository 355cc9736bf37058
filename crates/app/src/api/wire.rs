//! JSON shapes exchanged with the storefront API.
//!
//! Amounts travel as major-unit numbers and are converted to [`Amount`] here, at the edge.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::Money;
use serde::{Deserialize, Serialize};
use silk::{
    address::Address,
    coupons::CouponCode,
    gift_wrap::{GiftWrap, GiftWrapSelection},
    items::CartItem,
    membership::Membership,
    money::{self, Amount},
    orders::Order,
    payment::PaymentMethod,
    status::OrderStatus,
};

use crate::api::{ApiError, GatewayOrder, OrderRequest, Profile, Ticket};

/// Fields present on every response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    pub(crate) success: bool,

    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// Either epoch milliseconds or an RFC 3339 string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireTime {
    Millis(i64),
    Text(Timestamp),
}

impl WireTime {
    fn into_timestamp(self) -> Result<Timestamp, ApiError> {
        match self {
            Self::Millis(millis) => Timestamp::from_millisecond(millis)
                .map_err(|error| ApiError::InvalidPayload(error.to_string())),
            Self::Text(timestamp) => Ok(timestamp),
        }
    }
}

fn amount(value: Decimal) -> Result<Amount, ApiError> {
    Ok(money::from_major(value, money::store_currency())?)
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginBody {
    pub(crate) token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileBody {
    pub(crate) user: UserDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    #[serde(rename = "_id")]
    id: String,

    #[serde(default)]
    name: String,

    #[serde(default)]
    email: String,

    #[serde(default)]
    is_luxe_member: bool,

    #[serde(default)]
    gift_wraps_left: u32,

    #[serde(default)]
    wishlist: Vec<String>,
}

impl From<UserDto> for Profile {
    fn from(user: UserDto) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            membership: Membership {
                is_luxe_member: user.is_luxe_member,
                gift_wraps_left: user.gift_wraps_left,
            },
            wishlist: user.wishlist,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponRequest<'a> {
    pub(crate) code: &'a str,

    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) cart_total: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponBody {
    #[serde(with = "rust_decimal::serde::float")]
    discount_amount: Decimal,
}

impl CouponBody {
    pub(crate) fn discount(self) -> Result<Amount, ApiError> {
        let discount = amount(self.discount_amount)?;

        if discount.is_negative() {
            return Err(ApiError::InvalidPayload(format!(
                "coupon discount {} is negative",
                self.discount_amount
            )));
        }

        Ok(discount)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GiftWrapsBody {
    pub(crate) gift_wraps: Vec<GiftWrapDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GiftWrapDto {
    #[serde(rename = "_id")]
    id: String,

    name: String,

    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,

    #[serde(default)]
    image: Option<String>,
}

impl TryFrom<GiftWrapDto> for GiftWrap {
    type Error = ApiError;

    fn try_from(dto: GiftWrapDto) -> Result<Self, Self::Error> {
        Ok(GiftWrap::new(dto.id, dto.name, amount(dto.price)?, dto.image)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartBody {
    pub(crate) cart_items: Vec<CartItemDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemDto {
    product_id: String,

    name: String,

    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,

    quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float")]
    discount_amount: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    applied_coupon: Option<String>,
}

impl TryFrom<CartItemDto> for CartItem {
    type Error = ApiError;

    fn try_from(dto: CartItemDto) -> Result<Self, Self::Error> {
        let mut item = CartItem::new(dto.product_id, dto.name, amount(dto.price)?, dto.quantity)?
            .with_discount(amount(dto.discount_amount)?)?;

        if let Some(size) = dto.size.filter(|size| !size.is_empty()) {
            item = item.with_size(size);
        }

        if let Some(color) = dto.color.filter(|color| !color.is_empty()) {
            item = item.with_color(color);
        }

        if let Some(code) = dto.applied_coupon.filter(|code| !code.is_empty()) {
            item = item.with_applied_coupon(code);
        }

        Ok(item)
    }
}

impl From<&CartItem> for CartItemDto {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id().to_string(),
            name: item.name().to_string(),
            price: money::to_major(item.price()),
            quantity: item.quantity(),
            size: item.size().map(str::to_string),
            color: item.color().map(str::to_string),
            discount_amount: money::to_major(item.discount()),
            applied_coupon: item.applied_coupon().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderGiftWrapDto {
    #[serde(alias = "_id")]
    wrap_id: String,

    name: String,

    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl TryFrom<OrderGiftWrapDto> for GiftWrapSelection {
    type Error = ApiError;

    fn try_from(dto: OrderGiftWrapDto) -> Result<Self, Self::Error> {
        let wrap = GiftWrap::new(dto.wrap_id, dto.name, amount(dto.price)?, dto.image)?;

        Ok(GiftWrapSelection::new(wrap, dto.message)?)
    }
}

impl From<&GiftWrapSelection> for OrderGiftWrapDto {
    fn from(selection: &GiftWrapSelection) -> Self {
        let wrap = selection.wrap();

        Self {
            wrap_id: wrap.id().to_string(),
            name: wrap.name().to_string(),
            price: money::to_major(wrap.price()),
            image: wrap.image().map(str::to_string),
            message: selection.message().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderRequestBody<'a> {
    items: Vec<CartItemDto>,

    address: &'a Address,

    payment_method: PaymentMethod,

    #[serde(with = "rust_decimal::serde::float")]
    product_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    shipping_charge: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    cod_charge: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    gift_wrap: Option<OrderGiftWrapDto>,

    #[serde(with = "rust_decimal::serde::float")]
    gift_wrap_charge: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    coupon_discount: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    coupon_code: Option<&'a str>,

    #[serde(with = "rust_decimal::serde::float")]
    order_total: Decimal,
}

impl<'a> TryFrom<&'a OrderRequest> for OrderRequestBody<'a> {
    type Error = ApiError;

    fn try_from(order: &'a OrderRequest) -> Result<Self, Self::Error> {
        let breakdown = &order.breakdown;

        Ok(Self {
            items: order.items.iter().map(CartItemDto::from).collect(),
            address: &order.address,
            payment_method: order.payment_method,
            product_amount: money::to_major(&breakdown.discounted_subtotal()?),
            shipping_charge: money::to_major(&breakdown.shipping),
            cod_charge: money::to_major(&breakdown.cod_charge),
            gift_wrap: order.gift_wrap.as_ref().map(OrderGiftWrapDto::from),
            gift_wrap_charge: money::to_major(&breakdown.gift_wrap),
            coupon_discount: money::to_major(&breakdown.coupon_discount),
            coupon_code: order.coupon_code.as_ref().map(CouponCode::as_str),
            order_total: money::to_major(&breakdown.total),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    pub(crate) razorpay_order_id: &'a str,
    pub(crate) razorpay_payment_id: &'a str,
    pub(crate) razorpay_signature: &'a str,

    #[serde(rename = "orderData")]
    pub(crate) order_data: OrderRequestBody<'a>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlacedBody {
    pub(crate) order_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GatewayBody {
    pub(crate) order: GatewayOrderDto,
}

/// Gateway orders are denominated in minor units.
#[derive(Debug, Deserialize)]
pub(crate) struct GatewayOrderDto {
    id: String,
    amount: i64,
    currency: String,
}

impl TryFrom<GatewayOrderDto> for GatewayOrder {
    type Error = ApiError;

    fn try_from(dto: GatewayOrderDto) -> Result<Self, Self::Error> {
        let currency = money::store_currency();

        if !dto.currency.eq_ignore_ascii_case(currency.iso_alpha_code) {
            return Err(ApiError::InvalidPayload(format!(
                "gateway order {} is in {}, expected {}",
                dto.id, dto.currency, currency.iso_alpha_code
            )));
        }

        Ok(Self {
            id: dto.id,
            amount: Money::from_minor(dto.amount, currency),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderBody {
    pub(crate) order: OrderDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersBody {
    pub(crate) orders: Vec<OrderDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderDto {
    #[serde(rename = "_id")]
    id: String,

    items: Vec<CartItemDto>,

    address: Address,

    payment_method: PaymentMethod,

    #[serde(with = "rust_decimal::serde::float")]
    product_amount: Decimal,

    #[serde(default, with = "rust_decimal::serde::float")]
    shipping_charge: Decimal,

    #[serde(default, with = "rust_decimal::serde::float")]
    cod_charge: Decimal,

    #[serde(default)]
    gift_wrap: Option<OrderGiftWrapDto>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    gift_wrap_charge: Option<Decimal>,

    #[serde(default, with = "rust_decimal::serde::float")]
    coupon_discount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    order_total: Decimal,

    order_status: OrderStatus,

    date: WireTime,

    #[serde(default)]
    shipped_at: Option<WireTime>,

    #[serde(default)]
    delivered_at: Option<WireTime>,
}

impl TryFrom<OrderDto> for Order {
    type Error = ApiError;

    fn try_from(dto: OrderDto) -> Result<Self, Self::Error> {
        let items = dto
            .items
            .into_iter()
            .map(CartItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let product_amount = amount(dto.product_amount)?;
        let shipping_charge = amount(dto.shipping_charge)?;
        let cod_charge = amount(dto.cod_charge)?;
        let coupon_discount = amount(dto.coupon_discount)?;
        let order_total = amount(dto.order_total)?;

        let gift_wrap = dto
            .gift_wrap
            .map(GiftWrapSelection::try_from)
            .transpose()?;

        // Older orders only carry the wrap itself; whatever the other figures don't account
        // for is what the wrap cost.
        let gift_wrap_charge = match (dto.gift_wrap_charge, &gift_wrap) {
            (Some(charge), _) => amount(charge)?,
            (None, Some(_)) => {
                let residual = order_total
                    .sub(product_amount)?
                    .sub(shipping_charge)?
                    .sub(cod_charge)?
                    .add(coupon_discount)?;

                if residual.is_negative() {
                    money::zero(residual.currency())
                } else {
                    residual
                }
            }
            (None, None) => money::zero(order_total.currency()),
        };

        Ok(Self {
            id: dto.id,
            items,
            address: dto.address,
            payment_method: dto.payment_method,
            product_amount,
            shipping_charge,
            cod_charge,
            gift_wrap,
            gift_wrap_charge,
            coupon_discount,
            order_total,
            order_status: dto.order_status,
            date: dto.date.into_timestamp()?,
            shipped_at: dto.shipped_at.map(WireTime::into_timestamp).transpose()?,
            delivered_at: dto.delivered_at.map(WireTime::into_timestamp).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistRequest<'a> {
    pub(crate) product_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TicketRequest<'a> {
    pub(crate) subject: &'a str,
    pub(crate) message: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) order_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TicketBody {
    pub(crate) ticket: TicketDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TicketsBody {
    pub(crate) tickets: Vec<TicketDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TicketDto {
    #[serde(rename = "_id")]
    id: String,

    subject: String,

    message: String,

    #[serde(default)]
    order_id: Option<String>,

    #[serde(default = "open_status")]
    status: String,

    #[serde(default)]
    created_at: Option<WireTime>,
}

fn open_status() -> String {
    "Open".to_string()
}

impl TryFrom<TicketDto> for Ticket {
    type Error = ApiError;

    fn try_from(dto: TicketDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id,
            subject: dto.subject,
            message: dto.message,
            order_id: dto.order_id.filter(|id| !id.is_empty()),
            status: dto.status,
            created_at: dto.created_at.map(WireTime::into_timestamp).transpose()?,
        })
    }
}
