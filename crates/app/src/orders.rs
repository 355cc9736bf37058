//! Orders
//!
//! [`OrderWatch`] keeps an order's status fresh by polling the order service until the order
//! is delivered. The poller is a task owned by the watch: cancelling or dropping the watch
//! stops it.

use std::{fmt, sync::Arc, time::Duration};

use silk::{orders::Order, pricing::PriceBreakdown, status::StatusProjection};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::api::{ApiError, StorefrontApi};

/// Default delay between status refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Live view of one order.
pub struct OrderWatch {
    order_id: String,
    receiver: watch::Receiver<Option<Order>>,
    task: JoinHandle<()>,
}

impl fmt::Debug for OrderWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderWatch")
            .field("order_id", &self.order_id)
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

impl OrderWatch {
    /// Fetch the order now and then every `interval` until it is delivered.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        api: Arc<dyn StorefrontApi>,
        token: impl Into<String>,
        order_id: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let order_id = order_id.into();
        let (sender, receiver) = watch::channel(None);

        let task = tokio::spawn(poll(
            api,
            token.into(),
            order_id.clone(),
            interval,
            sender,
        ));

        Self {
            order_id,
            receiver,
            task,
        }
    }

    /// Order being watched
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Most recent snapshot, if one has arrived.
    pub fn latest(&self) -> Option<Order> {
        self.receiver.borrow().clone()
    }

    /// Another handle on the snapshot channel.
    pub fn subscribe(&self) -> watch::Receiver<Option<Order>> {
        self.receiver.clone()
    }

    /// Wait for the next snapshot. Returns `None` once polling has stopped and every
    /// snapshot has been seen.
    pub async fn changed(&mut self) -> Option<Order> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow_and_update().clone()
    }

    /// Stop polling.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether polling has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for OrderWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll(
    api: Arc<dyn StorefrontApi>,
    token: String,
    order_id: String,
    period: Duration,
    sender: watch::Sender<Option<Order>>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let order = match api.order(&token, &order_id).await {
            Ok(order) => order,
            Err(error) => {
                warn!(%order_id, %error, "failed to refresh order status");
                continue;
            }
        };

        let delivered = order.is_delivered();

        debug!(%order_id, status = %order.order_status, "order status refreshed");

        if sender.send(Some(order)).is_err() {
            break;
        }

        if delivered {
            info!(%order_id, "order delivered; polling stopped");
            break;
        }
    }
}

/// One row of the order history.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    /// The order
    pub order: Order,

    /// Summary figures as charged
    pub breakdown: PriceBreakdown,

    /// Status display
    pub projection: StatusProjection,
}

/// The signed-in user's orders, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderHistory {
    summaries: Vec<OrderSummary>,
}

impl OrderHistory {
    /// Fetch and summarise the user's orders.
    ///
    /// # Errors
    ///
    /// Returns the API error, or [`ApiError::InvalidPayload`] if an order's figures are in
    /// mixed currencies.
    pub async fn fetch(api: &dyn StorefrontApi, token: &str) -> Result<Self, ApiError> {
        Self::from_orders(api.orders(token).await?)
    }

    /// Summarise already fetched orders.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPayload`] if an order's figures are in mixed currencies.
    pub fn from_orders(orders: Vec<Order>) -> Result<Self, ApiError> {
        let mut summaries = orders
            .into_iter()
            .map(|order| -> Result<OrderSummary, ApiError> {
                Ok(OrderSummary {
                    breakdown: order.breakdown()?,
                    projection: order.projection(),
                    order,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        summaries.sort_by(|a, b| b.order.date.cmp(&a.order.date));

        Ok(Self { summaries })
    }

    /// Summaries, newest first
    pub fn summaries(&self) -> &[OrderSummary] {
        &self.summaries
    }

    /// Number of orders
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Whether there are no orders
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
