//! Silk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    address::{Address, AddressError},
    coupons::{
        AppliedCoupon, Coupon, CouponAudience, CouponCode, CouponError, DiscountType, NewCoupon,
    },
    gift_wrap::{GiftWrap, GiftWrapError, GiftWrapSelection, MAX_GIFT_MESSAGE_CHARS},
    items::{CartItem, CartItemError},
    membership::Membership,
    money::{Amount, MoneyConversionError, store_currency},
    orders::Order,
    payment::{PaymentMethod, UnknownPaymentMethod},
    pricing::{PriceBreakdown, PricingError, PricingInput, PricingPolicy, price_checkout},
    receipt::{CheckoutSummary, ReceiptError},
    search_history::{SEARCH_HISTORY_LIMIT, SearchHistory},
    status::{
        HaltedStatus, OrderStatus, ProgressLevel, Stage, StatusBadge, StatusIcon,
        StatusProjection,
    },
};
