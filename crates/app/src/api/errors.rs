//! Storefront API errors.

use silk::{gift_wrap::GiftWrapError, items::CartItemError, money::MoneyConversionError};
use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `success: false`.
    #[error("{message}")]
    Rejected {
        /// Message supplied by the API
        message: String,
    },

    /// The API returned a non-2xx response without an explanation.
    #[error("unexpected response from storefront API: {0}")]
    UnexpectedResponse(String),

    /// The response body was not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but holds values the storefront cannot represent.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The configured base URL is unusable.
    #[error("invalid API base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// URL as configured
        url: String,

        /// Parser message
        reason: String,
    },
}

impl ApiError {
    pub(crate) fn rejected(message: Option<String>) -> Self {
        Self::Rejected {
            message: message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "request was rejected".to_string()),
        }
    }
}

impl From<MoneyConversionError> for ApiError {
    fn from(error: MoneyConversionError) -> Self {
        Self::InvalidPayload(error.to_string())
    }
}

impl From<CartItemError> for ApiError {
    fn from(error: CartItemError) -> Self {
        Self::InvalidPayload(error.to_string())
    }
}

impl From<GiftWrapError> for ApiError {
    fn from(error: GiftWrapError) -> Self {
        Self::InvalidPayload(error.to_string())
    }
}

impl From<rusty_money::MoneyError> for ApiError {
    fn from(error: rusty_money::MoneyError) -> Self {
        Self::InvalidPayload(error.to_string())
    }
}
