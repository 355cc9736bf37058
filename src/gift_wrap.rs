//! Gift Wrap Add-ons

use thiserror::Error;

use crate::money::Amount;

/// Longest gift message accepted, in characters.
pub const MAX_GIFT_MESSAGE_CHARS: usize = 200;

/// Errors building a gift wrap or selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GiftWrapError {
    /// Wrap price cannot be negative.
    #[error("gift wrap {0} has a negative price")]
    NegativePrice(String),

    /// Message exceeds [`MAX_GIFT_MESSAGE_CHARS`].
    #[error("gift message is {0} characters; the limit is {MAX_GIFT_MESSAGE_CHARS}")]
    MessageTooLong(usize),
}

/// A gift wrap option offered at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftWrap {
    id: String,
    name: String,
    price: Amount,
    image: Option<String>,
}

impl GiftWrap {
    /// Create a gift wrap option.
    ///
    /// # Errors
    ///
    /// Returns [`GiftWrapError::NegativePrice`] if `price` is below zero.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Amount,
        image: Option<String>,
    ) -> Result<Self, GiftWrapError> {
        let id = id.into();

        if price.is_negative() {
            return Err(GiftWrapError::NegativePrice(id));
        }

        Ok(Self {
            id,
            name: name.into(),
            price,
            image,
        })
    }

    /// Wrap identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List price, charged unless the Luxe benefit covers it
    pub fn price(&self) -> &Amount {
        &self.price
    }

    /// Image URL
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// A chosen gift wrap with an optional message for the recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftWrapSelection {
    wrap: GiftWrap,
    message: Option<String>,
}

impl GiftWrapSelection {
    /// Select a wrap. Blank messages are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GiftWrapError::MessageTooLong`] if the message is over the limit.
    pub fn new(wrap: GiftWrap, message: Option<String>) -> Result<Self, GiftWrapError> {
        let message = message.filter(|message| !message.trim().is_empty());

        if let Some(message) = &message {
            let len = message.chars().count();

            if len > MAX_GIFT_MESSAGE_CHARS {
                return Err(GiftWrapError::MessageTooLong(len));
            }
        }

        Ok(Self { wrap, message })
    }

    /// The selected wrap
    pub fn wrap(&self) -> &GiftWrap {
        &self.wrap
    }

    /// The gift message
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
