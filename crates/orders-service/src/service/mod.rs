//! # Order Orchestrator
//!
//! Owns order creation, listing, reads, status transitions, and payment
//! reconciliation, composing the store and the two upstream clients. The
//! orchestrator keeps no state of its own between calls; every unit of work
//! suspends only at RPC boundaries and store I/O.
//!
//! Failure policy for creation: validation failures and validator outages
//! abort before any write. A payment-session failure after the insert is
//! not compensated — the order stays `Pending` with no session, and the
//! error is surfaced to the caller.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::clients::{
    PaymentLineItem, PaymentSession, PaymentSessionClient, PaymentSessionRequest, ProductLookup,
    ProductValidatorClient,
};
use crate::config::OrdersConfig;
use crate::error::OrderError;
use crate::model::{
    EnrichedItem, EnrichedOrder, Order, OrderId, OrderItem, OrderItemRequest, OrderStatus,
    OrderWithItems,
};
use crate::store::{NewOrder, OrderStore, PaymentOutcome};

/// Listing query: 1-based page, page size, optional status filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Unfiltered order count, even when the page content is filtered.
    /// Preserved from the upstream contract; see DESIGN.md.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub last_page: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    pub meta: PageMeta,
    pub data: Vec<Order>,
}

/// Reply to a successful creation: the persisted, name-enriched order plus
/// the checkout handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order: EnrichedOrder,
    pub payment_session: PaymentSession,
}

/// Inbound `payment.succeeded` event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSucceeded {
    pub order_id: OrderId,
    pub stripe_payment_id: String,
    pub receipt_url: String,
}

#[derive(Clone)]
pub struct OrdersService {
    store: Arc<dyn OrderStore>,
    products: ProductValidatorClient,
    payments: PaymentSessionClient,
    config: OrdersConfig,
}

impl OrdersService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        products: ProductValidatorClient,
        payments: PaymentSessionClient,
        config: OrdersConfig,
    ) -> Self {
        Self {
            store,
            products,
            payments,
            config,
        }
    }

    /// Creates an order from a non-empty item sequence.
    ///
    /// One batch validation call covers the distinct product ids; any id
    /// missing from the reply fails the whole creation before anything is
    /// written. Totals are computed over the original sequence, so
    /// duplicate product ids stay separate line items.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn create(&self, items: Vec<OrderItemRequest>) -> Result<CreatedOrder, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }
        if let Some(bad) = items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::Validation(format!(
                "quantity for product {} must be at least 1",
                bad.product_id
            )));
        }

        let lookup = self.products.validate(distinct_ids(&items)).await?;

        let mut rows = Vec::with_capacity(items.len());
        let mut total_amount = Decimal::ZERO;
        let mut total_items = 0u32;
        for item in &items {
            let price = lookup.price_of(&item.product_id)?;
            total_amount += price * Decimal::from(item.quantity);
            total_items += item.quantity;
            rows.push(OrderItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                price,
            });
        }

        let persisted = self
            .store
            .insert(NewOrder {
                total_amount,
                total_items,
                items: rows,
            })
            .await?;
        info!(
            order_id = %persisted.order.id,
            total_amount = %persisted.order.total_amount,
            total_items = persisted.order.total_items,
            "order created"
        );

        let order = enrich(persisted, &lookup)?;

        // The order is already persisted; if this call fails it stays
        // Pending with no session and the error is surfaced as-is.
        let payment_session = self
            .payments
            .create_session(PaymentSessionRequest {
                order_id: order.order.id,
                currency: self.config.currency.clone(),
                items: order
                    .items
                    .iter()
                    .map(|item| PaymentLineItem {
                        name: item.name.clone(),
                        quantity: item.quantity,
                        price: item.price,
                    })
                    .collect(),
            })
            .await?;

        Ok(CreatedOrder {
            order,
            payment_session,
        })
    }

    /// One page of orders plus pagination metadata.
    #[instrument(skip(self))]
    pub async fn find_all(&self, query: PaginationQuery) -> Result<OrderPage, OrderError> {
        if query.page < 1 {
            return Err(OrderError::Validation("page must be at least 1".to_string()));
        }
        if query.limit < 1 {
            return Err(OrderError::Validation(
                "limit must be at least 1".to_string(),
            ));
        }
        if let Some(status) = query.status {
            if !self.config.is_listable(status) {
                return Err(OrderError::Validation(format!(
                    "status {status} cannot be used as a listing filter"
                )));
            }
        }

        let total = self.store.count().await?;
        let data = self
            .store
            .list(query.page, query.limit, query.status)
            .await?;
        Ok(OrderPage {
            meta: PageMeta {
                total,
                page: query.page,
                limit: query.limit,
                last_page: total.div_ceil(query.limit as u64),
            },
            data,
        })
    }

    /// Loads one order and attaches current display names to its items.
    ///
    /// The store lookup comes first: a missing order fails with `NotFound`
    /// without ever calling the validator. An existing order's read then
    /// depends on the Product service, purely for names.
    #[instrument(skip(self))]
    pub async fn find_one(&self, id: OrderId) -> Result<EnrichedOrder, OrderError> {
        let Some(stored) = self.store.get(id).await? else {
            return Err(OrderError::NotFound(id));
        };

        let ids = stored
            .items
            .iter()
            .map(|item| item.product_id.clone())
            .collect::<Vec<_>>();
        let lookup = self.products.validate(dedupe(ids)).await?;
        enrich(stored, &lookup)
    }

    /// Moves an order to `status`. The only guard is the equality check:
    /// asking for the status the order already has is an error and leaves
    /// the row untouched; any other target is written unconditionally.
    #[instrument(skip(self))]
    pub async fn change_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let current = self.find_one(id).await?;
        if current.order.status == status {
            return Err(OrderError::RedundantTransition { id, status });
        }

        match self.store.update_status(id, status).await? {
            Some(order) => {
                info!(order_id = %id, status = %status, "status changed");
                Ok(order)
            }
            None => Err(OrderError::NotFound(id)),
        }
    }

    /// Applies a `payment.succeeded` event: `status = Paid`, `paid = true`,
    /// `paid_at = now`, the provider charge id, and exactly one receipt.
    ///
    /// The bus delivers at-least-once, so a redelivered event (same charge
    /// id) is accepted as a no-op rather than a duplicate receipt.
    #[instrument(skip(self, event), fields(order_id = %event.order_id))]
    pub async fn reconcile_payment(&self, event: PaymentSucceeded) -> Result<Order, OrderError> {
        let outcome = self
            .store
            .apply_payment(
                event.order_id,
                &event.stripe_payment_id,
                &event.receipt_url,
                Utc::now(),
            )
            .await?;
        match outcome {
            PaymentOutcome::Applied(order) => {
                info!(charge_id = %event.stripe_payment_id, "payment reconciled");
                Ok(order)
            }
            PaymentOutcome::AlreadyApplied(order) => {
                warn!(charge_id = %event.stripe_payment_id, "duplicate payment event ignored");
                Ok(order)
            }
            PaymentOutcome::NotFound => Err(OrderError::NotFound(event.order_id)),
        }
    }
}

/// Distinct product ids in first-seen order.
fn distinct_ids(items: &[OrderItemRequest]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for item in items {
        if !ids.contains(&item.product_id) {
            ids.push(item.product_id.clone());
        }
    }
    ids
}

fn dedupe(ids: Vec<String>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for id in ids {
        if !distinct.contains(&id) {
            distinct.push(id);
        }
    }
    distinct
}

fn enrich(stored: OrderWithItems, lookup: &ProductLookup) -> Result<EnrichedOrder, OrderError> {
    let items = stored
        .items
        .iter()
        .map(|item| {
            Ok(EnrichedItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                price: item.price,
                name: lookup.name_of(&item.product_id)?.to_string(),
            })
        })
        .collect::<Result<Vec<_>, OrderError>>()?;
    Ok(EnrichedOrder {
        order: stored.order,
        items,
    })
}
