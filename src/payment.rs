//! Payment Methods

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unrecognised payment method string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery, carries a handling surcharge.
    #[serde(rename = "COD", alias = "cod")]
    Cod,

    /// Card payment through the payment gateway.
    #[default]
    #[serde(rename = "card", alias = "Card")]
    Card,
}

impl PaymentMethod {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "COD",
            Self::Card => "card",
        }
    }

    /// Whether this is cash on delivery.
    pub const fn is_cod(self) -> bool {
        matches!(self, Self::Cod)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();

        if trimmed.eq_ignore_ascii_case("cod") {
            Ok(Self::Cod)
        } else if trimmed.eq_ignore_ascii_case("card") {
            Ok(Self::Card)
        } else {
            Err(UnknownPaymentMethod(value.to_string()))
        }
    }
}
