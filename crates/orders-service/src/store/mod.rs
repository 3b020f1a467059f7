//! # Order Store
//!
//! Boundary to the persistence backend. The orchestrator only sees this
//! trait; the backend is expected to give ACID guarantees for writes scoped
//! to a single order (order + items at insert, order + receipt at payment).
//! No cross-order transactions exist.
//!
//! The store owns id generation and the `created_at`/`updated_at`
//! timestamps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::model::{Order, OrderId, OrderItem, OrderReceipt, OrderStatus, OrderWithItems};

pub mod memory;

pub use memory::InMemoryOrderStore;

/// Everything the store needs to persist a freshly validated order.
/// Totals are computed by the orchestrator and stored as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub total_amount: Decimal,
    pub total_items: u32,
    pub items: Vec<OrderItem>,
}

/// Result of applying a payment to an order.
#[derive(Debug)]
pub enum PaymentOutcome {
    /// The payment was recorded and a receipt created.
    Applied(Order),
    /// This charge id was already applied; nothing changed and no second
    /// receipt exists. Redelivered events land here.
    AlreadyApplied(Order),
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the order and its items atomically, with `status = Pending`
    /// and `paid = false`.
    async fn insert(&self, order: NewOrder) -> Result<OrderWithItems, StoreError>;

    async fn get(&self, id: OrderId) -> Result<Option<OrderWithItems>, StoreError>;

    /// Unfiltered order count.
    async fn count(&self) -> Result<u64, StoreError>;

    /// One page of order headers, filtered by `status` if given.
    /// Offset pagination: skips `(page - 1) * limit` rows.
    async fn list(
        &self,
        page: u32,
        limit: u32,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, StoreError>;

    /// Writes the new status and bumps `updated_at`. `None` if the order
    /// does not exist.
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError>;

    /// Marks the order paid and creates its receipt in one transaction.
    /// Must be idempotent per charge id: a second call with a charge id the
    /// order already carries is [`PaymentOutcome::AlreadyApplied`].
    async fn apply_payment(
        &self,
        id: OrderId,
        charge_id: &str,
        receipt_url: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<PaymentOutcome, StoreError>;

    /// Receipts recorded for an order.
    async fn receipts(&self, id: OrderId) -> Result<Vec<OrderReceipt>, StoreError>;
}
