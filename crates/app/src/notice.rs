//! Notices
//!
//! One short, user-facing message per outcome. A transport failure and an API refusal both
//! surface as an error notice; only the wording differs.

use std::fmt;

use crate::{
    api::{ApiError, TicketError},
    checkout::CheckoutError,
    session::SessionError,
    storage::StorageError,
};

const UNREACHABLE: &str = "Could not reach the store. Please try again.";
const SOMETHING_WRONG: &str = "Something went wrong. Please try again.";
const SIGN_IN: &str = "Please sign in to continue.";

/// Kind of notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Completed
    Success,

    /// For information
    Info,

    /// Failed
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Kind of notice
    pub level: NoticeLevel,

    /// Message text
    pub message: String,
}

impl Notice {
    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Whether this reports a failure.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&ApiError> for Notice {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::Rejected { message } => Self::error(message.clone()),
            ApiError::Http(_) | ApiError::UnexpectedResponse(_) => Self::error(UNREACHABLE),
            ApiError::Decode(_) | ApiError::InvalidPayload(_) | ApiError::InvalidBaseUrl { .. } => {
                Self::error(SOMETHING_WRONG)
            }
        }
    }
}

impl From<&StorageError> for Notice {
    fn from(error: &StorageError) -> Self {
        Self::error(format!("Could not save local state: {error}"))
    }
}

impl From<&SessionError> for Notice {
    fn from(error: &SessionError) -> Self {
        match error {
            SessionError::NotSignedIn => Self::error(SIGN_IN),
            SessionError::Api(error) => error.into(),
            SessionError::Storage(error) => error.into(),
        }
    }
}

impl From<&CheckoutError> for Notice {
    fn from(error: &CheckoutError) -> Self {
        match error {
            CheckoutError::Api(error) => error.into(),
            CheckoutError::Pricing(_) => Self::error(SOMETHING_WRONG),
            CheckoutError::NegativeTotal(_) => {
                Self::error("Discounts exceed the order value. Remove the coupon to continue.")
            }
            CheckoutError::EmptyCart
            | CheckoutError::Address(_)
            | CheckoutError::Coupon(_)
            | CheckoutError::GiftWrap(_)
            | CheckoutError::NoPendingPayment => Self::error(capitalise(&error.to_string())),
        }
    }
}

impl From<&TicketError> for Notice {
    fn from(error: &TicketError) -> Self {
        Self::error(capitalise(&error.to_string()))
    }
}

fn capitalise(message: &str) -> String {
    let mut chars = message.chars();

    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use silk::address::AddressError;

    use super::*;

    #[test]
    fn rejection_message_is_shown_verbatim() {
        let notice = Notice::from(&ApiError::Rejected {
            message: "Coupon has expired".to_string(),
        });

        assert!(notice.is_error());
        assert_eq!(notice.to_string(), "Coupon has expired");
    }

    #[test]
    fn transport_failures_share_one_message() {
        let notice = Notice::from(&ApiError::UnexpectedResponse("502".to_string()));

        assert_eq!(notice, Notice::error(UNREACHABLE));
    }

    #[test]
    fn missing_session_asks_to_sign_in() {
        assert_eq!(Notice::from(&SessionError::NotSignedIn).message, SIGN_IN);
    }

    #[test]
    fn checkout_validation_is_capitalised() {
        let notice = Notice::from(&CheckoutError::Address(AddressError::MissingField("zip")));

        assert_eq!(notice.message, "Zip is required");
    }

    #[test]
    fn nested_api_error_keeps_its_message() {
        let error = CheckoutError::Api(ApiError::Rejected {
            message: "Out of stock".to_string(),
        });

        assert_eq!(Notice::from(&error).message, "Out of stock");
    }
}
