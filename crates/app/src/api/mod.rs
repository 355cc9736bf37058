//! Storefront REST API

mod client;
mod errors;
mod models;
mod service;
mod wire;

pub use client::HttpStorefrontApi;
pub use errors::*;
pub use models::*;
pub use service::*;
