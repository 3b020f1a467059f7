//! Order, line items, receipts, and the read-time projections built from
//! them.
//!
//! Invariants carried by this model:
//!
//! - an order's item set is fixed at creation — no add/remove/update after;
//! - `total_amount` and `total_items` are derived once from that item set
//!   and never recomputed on read;
//! - `paid == true` implies `paid_at` is set and `status == Paid`;
//! - item prices are snapshots taken at creation and never re-read from the
//!   Product service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque order identifier, generated by the store at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Order lifecycle status.
///
/// `Paid` is never requested by a caller; the service assigns it itself
/// when a payment event is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
    Paid,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Paid => "PAID",
        };
        f.write_str(s)
    }
}

/// The order header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub total_items: u32,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub stripe_charge_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An immutable line item. `price` is the snapshot taken from the Product
/// service at order creation. The display name is deliberately absent: it
/// is a read-time projection, not persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// An order header together with its item set, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Provider-hosted receipt reference, created exactly once per successful
/// payment and keyed on the provider charge id so event redelivery cannot
/// produce a second row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub stripe_charge_id: String,
    pub receipt_url: String,
    pub created_at: DateTime<Utc>,
}

/// One requested line of a new order: which product, how many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// A line item with the product's display name attached from the latest
/// validator reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedItem {
    pub product_id: String,
    pub quantity: u32,
    pub price: Decimal,
    pub name: String,
}

/// Read model returned to callers: the persisted order plus name-enriched
/// items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    pub order: Order,
    pub items: Vec<EnrichedItem>,
}
