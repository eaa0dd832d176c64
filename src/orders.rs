//! Orders
//!
//! Placed orders and the order history they are appended to.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::items::LineItem;

/// Errors related to the order history.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderHistoryError {
    /// No order with the given id exists.
    #[error("Order {0} not found")]
    NotFound(OrderId),
}

/// Error parsing an enumerated order field from text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseOrderFieldError {
    kind: &'static str,
    value: String,
}

/// Unique order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a new, time-ordered id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Human-readable order number, `ORD-<last 6 digits of epoch ms>-<3-digit random>`.
///
/// Not guaranteed to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate an order number for an order placed at `timestamp_ms`.
    pub fn generate<R: Rng + ?Sized>(timestamp_ms: i64, rng: &mut R) -> Self {
        let tail = timestamp_ms.rem_euclid(1_000_000);
        let random: u16 = rng.gen_range(0..1000);

        Self(format!("ORD-{tail:06}-{random:03}"))
    }

    /// The order number as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an order was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash
    Cash,

    /// Credit or debit card
    Card,

    /// Mobile wallet
    Mobile,
}

impl PaymentMethod {
    /// All payment methods, in till order.
    pub const ALL: [Self; 3] = [Self::Cash, Self::Card, Self::Mobile];

    /// Stored name, e.g. `cash`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Mobile => "mobile",
        }
    }

    /// Capitalised name as printed on receipts, e.g. `Cash`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Mobile => "Mobile",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseOrderFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseOrderFieldError {
                kind: "payment method",
                value: s.to_string(),
            })
    }
}

/// Order lifecycle status. Only completed orders count towards sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Paid and handed over
    Completed,

    /// Awaiting completion
    Pending,

    /// Voided
    Cancelled,
}

impl OrderStatus {
    /// All statuses.
    pub const ALL: [Self; 3] = [Self::Completed, Self::Pending, Self::Cancelled];

    /// Stored name, e.g. `completed`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseOrderFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseOrderFieldError {
                kind: "order status",
                value: s.to_string(),
            })
    }
}

/// A placed order.
///
/// Orders are snapshots: the line items are copied out of the cart at checkout and only the
/// status changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique id
    pub id: OrderId,

    /// Human-readable order number
    pub order_number: OrderNumber,

    /// Customer name, `Guest` when none was given
    pub customer_name: String,

    /// Line items as they were at checkout
    pub items: Vec<LineItem>,

    /// Subtotal after line discounts
    pub subtotal: Decimal,

    /// Tax charged
    pub tax: Decimal,

    /// Line discounts plus the cart discount, before tax
    pub discount: Decimal,

    /// Amount paid
    pub total: Decimal,

    /// How the order was paid
    pub payment_method: PaymentMethod,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Calendar date as displayed at checkout
    pub date: String,

    /// Clock time as displayed at checkout
    pub time: String,

    /// Checkout time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Order {
    /// Returns true if the order counts towards sales.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Checkout time, if the stored timestamp is representable.
    #[must_use]
    pub fn placed_at(&self) -> Option<Timestamp> {
        Timestamp::from_millisecond(self.timestamp).ok()
    }
}

/// All placed orders, newest first.
///
/// Serializes to the persisted `{ "orders": [...] }` layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderHistory {
    #[serde(default)]
    orders: Vec<Order>,
}

impl OrderHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history from orders, newest first.
    #[must_use]
    pub fn with_orders(orders: impl Into<Vec<Order>>) -> Self {
        Self {
            orders: orders.into(),
        }
    }

    /// Record a newly placed order.
    pub fn add(&mut self, order: Order) {
        info!(
            order = %order.order_number,
            total = %order.total,
            payment_method = %order.payment_method,
            "recorded order"
        );

        self.orders.insert(0, order);
    }

    /// Change the status of an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderHistoryError::NotFound`] if no order has the given id.
    pub fn update_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), OrderHistoryError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(OrderHistoryError::NotFound(id))?;

        info!(
            order = %order.order_number,
            from = %order.status,
            to = %status,
            "changed order status"
        );

        order.status = status;

        Ok(())
    }

    /// Get an order by id.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// Find the most recent order carrying the given order number.
    #[must_use]
    pub fn find_by_number(&self, number: &str) -> Option<&Order> {
        self.orders
            .iter()
            .find(|order| order.order_number.as_str() == number)
    }

    /// Orders placed between `start` and `end`, both inclusive.
    pub fn in_range(&self, start: Timestamp, end: Timestamp) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(move |order| order.placed_at().is_some_and(|at| start <= at && at <= end))
    }

    /// Iterate over all orders, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Number of orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if no orders have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
