//! Silk storefront client: API access, session, checkout and order tracking.

pub mod api;
pub mod checkout;
pub mod config;
pub mod context;
pub mod coupons;
pub mod notice;
pub mod observability;
pub mod orders;
pub mod quote;
pub mod session;
pub mod storage;
