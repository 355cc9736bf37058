//! Order Status
//!
//! Maps whatever status string the order service reports onto the progress display. There is
//! no transition checking here: the server is trusted, and a status is projected on its own.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Order status as reported by the order service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Order Placed
    Placed,

    /// Processing
    Processing,

    /// Confirmed
    Confirmed,

    /// Shipped
    Shipped,

    /// Out for delivery
    OutForDelivery,

    /// Delivered
    Delivered,

    /// Cancelled
    Cancelled,

    /// Returned
    Returned,

    /// Refund Initiated
    RefundInitiated,

    /// Refunded
    Refunded,

    /// Anything else, kept verbatim
    Other(String),
}

impl OrderStatus {
    /// Label as shown to customers and sent by the order service.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Placed => "Order Placed",
            Self::Processing => "Processing",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Returned => "Returned",
            Self::RefundInitiated => "Refund Initiated",
            Self::Refunded => "Refunded",
            Self::Other(raw) => raw,
        }
    }

    /// Polling stops once an order is delivered.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Project onto the progress display.
    pub fn project(&self) -> StatusProjection {
        project(self)
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        const KNOWN: [OrderStatus; 10] = [
            OrderStatus::Placed,
            OrderStatus::Processing,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Returned,
            OrderStatus::RefundInitiated,
            OrderStatus::Refunded,
        ];

        let trimmed = raw.trim();

        KNOWN
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| Self::Other(raw.to_string()))
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for OrderStatus {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(raw))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress along the delivery timeline, counted in half steps so that the in-between
/// stages (2.5 and 3.5) are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgressLevel(u8);

impl ProgressLevel {
    /// Level 1, just placed
    pub const PLACED: Self = Self(2);

    /// Level 4, delivered
    pub const DELIVERED: Self = Self(8);

    /// Number of half steps
    pub const fn half_steps(self) -> u8 {
        self.0
    }

    /// Level as displayed, e.g. `2.5`.
    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / 2.0
    }

    /// Whether progress-bar step `step` (1 to 4) is filled.
    pub const fn reaches(self, step: u8) -> bool {
        self.0 >= step.saturating_mul(2)
    }
}

impl fmt::Display for ProgressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

/// A stage on the normal delivery timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Level 1
    Placed,

    /// Level 2
    Processing,

    /// Level 2.5
    Confirmed,

    /// Level 3
    Shipped,

    /// Level 3.5
    OutForDelivery,

    /// Level 4
    Delivered,
}

impl Stage {
    /// Position on the progress bar.
    pub const fn level(self) -> ProgressLevel {
        match self {
            Self::Placed => ProgressLevel::PLACED,
            Self::Processing => ProgressLevel(4),
            Self::Confirmed => ProgressLevel(5),
            Self::Shipped => ProgressLevel(6),
            Self::OutForDelivery => ProgressLevel(7),
            Self::Delivered => ProgressLevel::DELIVERED,
        }
    }

    /// Badge for the stage.
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Placed => StatusBadge::new(StatusIcon::Receipt, "#6b7280"),
            Self::Processing => StatusBadge::new(StatusIcon::Gear, "#d97706"),
            Self::Confirmed => StatusBadge::new(StatusIcon::CheckCircle, "#2563eb"),
            Self::Shipped => StatusBadge::new(StatusIcon::Box, "#4f46e5"),
            Self::OutForDelivery => StatusBadge::new(StatusIcon::Truck, "#7c3aed"),
            Self::Delivered => StatusBadge::new(StatusIcon::House, "#16a34a"),
        }
    }
}

/// Statuses that leave the normal timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaltedStatus {
    /// Cancelled
    Cancelled,

    /// Returned
    Returned,

    /// Refund Initiated
    RefundInitiated,

    /// Refunded
    Refunded,
}

impl HaltedStatus {
    /// Badge for the halted status.
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Cancelled => StatusBadge::new(StatusIcon::Cross, "#dc2626"),
            Self::Returned => StatusBadge::new(StatusIcon::Undo, "#ea580c"),
            Self::RefundInitiated => StatusBadge::new(StatusIcon::Hourglass, "#ca8a04"),
            Self::Refunded => StatusBadge::new(StatusIcon::Wallet, "#0d9488"),
        }
    }
}

/// Icon shown next to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusIcon {
    /// Order placed
    Receipt,

    /// Processing
    Gear,

    /// Confirmed
    CheckCircle,

    /// Shipped
    Box,

    /// Out for delivery
    Truck,

    /// Delivered
    House,

    /// Cancelled
    Cross,

    /// Returned
    Undo,

    /// Refund initiated
    Hourglass,

    /// Refunded
    Wallet,
}

/// Icon and color for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusBadge {
    /// Icon
    pub icon: StatusIcon,

    /// CSS hex color
    pub color: &'static str,
}

impl StatusBadge {
    const fn new(icon: StatusIcon, color: &'static str) -> Self {
        Self { icon, color }
    }
}

/// How an order status is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusProjection {
    /// On the delivery timeline
    Progress(Stage),

    /// Off the timeline; no progress bar
    Halted(HaltedStatus),
}

impl StatusProjection {
    /// Progress level, if on the timeline.
    pub const fn level(self) -> Option<ProgressLevel> {
        match self {
            Self::Progress(stage) => Some(stage.level()),
            Self::Halted(_) => None,
        }
    }

    /// Icon and color.
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Progress(stage) => stage.badge(),
            Self::Halted(halted) => halted.badge(),
        }
    }
}

/// Project a status. Unrecognised statuses are shown as just placed.
pub fn project(status: &OrderStatus) -> StatusProjection {
    match status {
        OrderStatus::Placed | OrderStatus::Other(_) => StatusProjection::Progress(Stage::Placed),
        OrderStatus::Processing => StatusProjection::Progress(Stage::Processing),
        OrderStatus::Confirmed => StatusProjection::Progress(Stage::Confirmed),
        OrderStatus::Shipped => StatusProjection::Progress(Stage::Shipped),
        OrderStatus::OutForDelivery => StatusProjection::Progress(Stage::OutForDelivery),
        OrderStatus::Delivered => StatusProjection::Progress(Stage::Delivered),
        OrderStatus::Cancelled => StatusProjection::Halted(HaltedStatus::Cancelled),
        OrderStatus::Returned => StatusProjection::Halted(HaltedStatus::Returned),
        OrderStatus::RefundInitiated => StatusProjection::Halted(HaltedStatus::RefundInitiated),
        OrderStatus::Refunded => StatusProjection::Halted(HaltedStatus::Refunded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(OrderStatus::from("Out for delivery"), OrderStatus::OutForDelivery);
        assert_eq!(OrderStatus::from("out for delivery"), OrderStatus::OutForDelivery);
        assert_eq!(OrderStatus::from(" REFUND INITIATED "), OrderStatus::RefundInitiated);
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = OrderStatus::from("Lost in transit");

        assert_eq!(status, OrderStatus::Other("Lost in transit".to_string()));
        assert_eq!(status.as_str(), "Lost in transit");
    }

    #[test]
    fn timeline_levels_include_half_steps() {
        let levels: Vec<String> = [
            Stage::Placed,
            Stage::Processing,
            Stage::Confirmed,
            Stage::Shipped,
            Stage::OutForDelivery,
            Stage::Delivered,
        ]
        .into_iter()
        .map(|stage| stage.level().to_string())
        .collect();

        assert_eq!(levels, ["1", "2", "2.5", "3", "3.5", "4"]);
    }

    #[test]
    fn level_as_f32() {
        assert!((Stage::Confirmed.level().as_f32() - 2.5).abs() < f32::EPSILON);
        assert_eq!(ProgressLevel::DELIVERED.half_steps(), 8);
    }

    #[test]
    fn reaches_fills_steps_up_to_level() {
        let out_for_delivery = Stage::OutForDelivery.level();

        assert!(out_for_delivery.reaches(1));
        assert!(out_for_delivery.reaches(3));
        assert!(!out_for_delivery.reaches(4));
        assert!(Stage::Delivered.level().reaches(4));
    }

    #[test]
    fn halted_statuses_have_no_level() {
        for status in ["Cancelled", "Returned", "Refund Initiated", "Refunded"] {
            let projection = OrderStatus::from(status).project();

            assert!(
                projection.level().is_none(),
                "{status} should not have a level"
            );
        }
    }

    #[test]
    fn halted_badges_differ_from_timeline_badges() {
        let cancelled = HaltedStatus::Cancelled.badge();

        assert_eq!(cancelled.icon, StatusIcon::Cross);
        assert_ne!(cancelled, Stage::Placed.badge());
    }

    #[test]
    fn only_delivered_stops_polling() {
        assert!(OrderStatus::Delivered.is_delivered());
        assert!(!OrderStatus::Cancelled.is_delivered());
        assert!(!OrderStatus::OutForDelivery.is_delivered());
    }
}
