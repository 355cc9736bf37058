//! Silk
//!
//! Domain library for the Silk lingerie storefront: cart lines, pricing, coupons, gift wraps,
//! Luxe membership, orders and their status timeline. Everything here is pure; the storefront
//! client in `silk-app` does the talking to the API.

pub mod address;
pub mod coupons;
pub mod gift_wrap;
pub mod items;
pub mod membership;
pub mod money;
pub mod orders;
pub mod payment;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod search_history;
pub mod status;
