//! In-memory [`OrderStore`] backend.
//!
//! Keeps orders in a `HashMap` behind a single mutex; each write holds the
//! lock for its whole mutation, which is exactly the single-order
//! transaction scope the trait promises. Insertion order is tracked
//! separately so pagination is stable.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{Order, OrderId, OrderItem, OrderReceipt, OrderStatus, OrderWithItems};

use super::{NewOrder, OrderStore, PaymentOutcome, StoreError};

#[derive(Default)]
pub struct InMemoryOrderStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    orders: HashMap<OrderId, StoredOrder>,
    /// Ids in insertion order; the listing order of `list`.
    sequence: Vec<OrderId>,
    receipts: Vec<OrderReceipt>,
}

struct StoredOrder {
    order: Order,
    items: Vec<OrderItem>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("order store lock poisoned".to_string()))
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<OrderWithItems, StoreError> {
        let mut inner = self.lock()?;
        let id = OrderId::new();
        let now = Utc::now();
        let header = Order {
            id,
            status: OrderStatus::Pending,
            total_amount: order.total_amount,
            total_items: order.total_items,
            paid: false,
            paid_at: None,
            stripe_charge_id: None,
            created_at: now,
            updated_at: now,
        };
        let stored = StoredOrder {
            order: header.clone(),
            items: order.items.clone(),
        };
        inner.sequence.push(id);
        inner.orders.insert(id, stored);
        Ok(OrderWithItems {
            order: header,
            items: order.items,
        })
    }

    async fn get(&self, id: OrderId) -> Result<Option<OrderWithItems>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.orders.get(&id).map(|stored| OrderWithItems {
            order: stored.order.clone(),
            items: stored.items.clone(),
        }))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let inner = self.lock()?;
        Ok(inner.sequence.len() as u64)
    }

    async fn list(
        &self,
        page: u32,
        limit: u32,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, StoreError> {
        let inner = self.lock()?;
        let skip = (page.saturating_sub(1) as usize) * limit as usize;
        let orders = inner
            .sequence
            .iter()
            .filter_map(|id| inner.orders.get(id))
            .filter(|stored| status.map_or(true, |s| stored.order.status == s))
            .skip(skip)
            .take(limit as usize)
            .map(|stored| stored.order.clone())
            .collect();
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        let mut inner = self.lock()?;
        Ok(inner.orders.get_mut(&id).map(|stored| {
            stored.order.status = status;
            stored.order.updated_at = Utc::now();
            stored.order.clone()
        }))
    }

    async fn apply_payment(
        &self,
        id: OrderId,
        charge_id: &str,
        receipt_url: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<PaymentOutcome, StoreError> {
        let mut inner = self.lock()?;
        let Some(stored) = inner.orders.get_mut(&id) else {
            return Ok(PaymentOutcome::NotFound);
        };

        if stored.order.stripe_charge_id.as_deref() == Some(charge_id) {
            return Ok(PaymentOutcome::AlreadyApplied(stored.order.clone()));
        }

        stored.order.status = OrderStatus::Paid;
        stored.order.paid = true;
        stored.order.paid_at = Some(paid_at);
        stored.order.stripe_charge_id = Some(charge_id.to_string());
        stored.order.updated_at = paid_at;
        let order = stored.order.clone();

        inner.receipts.push(OrderReceipt {
            order_id: id,
            stripe_charge_id: charge_id.to_string(),
            receipt_url: receipt_url.to_string(),
            created_at: paid_at,
        });
        Ok(PaymentOutcome::Applied(order))
    }

    async fn receipts(&self, id: OrderId) -> Result<Vec<OrderReceipt>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .receipts
            .iter()
            .filter(|receipt| receipt.order_id == id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_order(amount: u32, quantity: u32) -> NewOrder {
        NewOrder {
            total_amount: Decimal::from(amount),
            total_items: quantity,
            items: vec![OrderItem {
                product_id: "p1".to_string(),
                quantity,
                price: Decimal::from(amount) / Decimal::from(quantity),
            }],
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = InMemoryOrderStore::new();
        let created = store.insert(new_order(30, 3)).await.unwrap();

        assert_eq!(created.order.status, OrderStatus::Pending);
        assert!(!created.order.paid);
        assert!(created.order.paid_at.is_none());

        let fetched = store.get(created.order.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.get(OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_paginates_in_insertion_order() {
        let store = InMemoryOrderStore::new();
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(store.insert(new_order(10, 1)).await.unwrap().order.id);
        }

        let page1 = store.list(1, 2, None).await.unwrap();
        let page2 = store.list(2, 2, None).await.unwrap();
        let page3 = store.list(3, 2, None).await.unwrap();

        assert_eq!(
            page1.iter().map(|o| o.id).collect::<Vec<_>>(),
            ids[0..2].to_vec()
        );
        assert_eq!(
            page2.iter().map(|o| o.id).collect::<Vec<_>>(),
            ids[2..4].to_vec()
        );
        assert_eq!(page3.len(), 1);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let store = InMemoryOrderStore::new();
        let a = store.insert(new_order(10, 1)).await.unwrap().order.id;
        let b = store.insert(new_order(10, 1)).await.unwrap().order.id;
        store
            .update_status(a, OrderStatus::Delivered)
            .await
            .unwrap();

        let delivered = store
            .list(1, 10, Some(OrderStatus::Delivered))
            .await
            .unwrap();
        assert_eq!(delivered.iter().map(|o| o.id).collect::<Vec<_>>(), vec![a]);

        let pending = store.list(1, 10, Some(OrderStatus::Pending)).await.unwrap();
        assert_eq!(pending.iter().map(|o| o.id).collect::<Vec<_>>(), vec![b]);
    }

    #[tokio::test]
    async fn update_status_bumps_updated_at() {
        let store = InMemoryOrderStore::new();
        let created = store.insert(new_order(10, 1)).await.unwrap();

        let updated = store
            .update_status(created.order.id, OrderStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Cancelled);
        assert!(updated.updated_at >= created.order.updated_at);

        assert!(store
            .update_status(OrderId::new(), OrderStatus::Cancelled)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn apply_payment_is_idempotent_per_charge_id() {
        let store = InMemoryOrderStore::new();
        let id = store.insert(new_order(10, 1)).await.unwrap().order.id;
        let paid_at = Utc::now();

        let first = store
            .apply_payment(id, "ch_1", "http://r", paid_at)
            .await
            .unwrap();
        let order = match first {
            PaymentOutcome::Applied(order) => order,
            other => panic!("expected Applied, got {other:?}"),
        };
        assert!(order.paid);
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.paid_at, Some(paid_at));
        assert_eq!(order.stripe_charge_id.as_deref(), Some("ch_1"));

        let second = store
            .apply_payment(id, "ch_1", "http://r", Utc::now())
            .await
            .unwrap();
        assert!(matches!(second, PaymentOutcome::AlreadyApplied(_)));

        let receipts = store.receipts(id).await.unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].receipt_url, "http://r");
    }

    #[tokio::test]
    async fn apply_payment_on_missing_order_is_not_found() {
        let store = InMemoryOrderStore::new();
        let outcome = store
            .apply_payment(OrderId::new(), "ch_1", "http://r", Utc::now())
            .await
            .unwrap();
        assert!(matches!(outcome, PaymentOutcome::NotFound));
    }
}
