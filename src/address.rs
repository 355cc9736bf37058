//! Shipping Address

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors validating an address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// A required field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Delivery address. Every field is required before an order can be placed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Recipient name
    pub name: String,

    /// Street line
    pub address: String,

    /// City
    pub city: String,

    /// State or province
    pub state: String,

    /// Postal code
    pub zip: String,

    /// Country
    pub country: String,

    /// Contact phone number
    pub phone: String,
}

impl Address {
    /// Check every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let fields = [
            ("name", &self.name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
            ("country", &self.country),
            ("phone", &self.phone),
        ];

        fields
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map_or(Ok(()), |(field, _)| Err(AddressError::MissingField(field)))
    }
}
