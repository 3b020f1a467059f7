//! Demo binary: runs the orders service end to end against in-process
//! fixture upstreams.
//!
//! The Product and Payment services are stood in for by
//! [`message_bus::mock::serve_with`] loops; everything else is the real
//! service. Run with `RUST_LOG=info cargo run -p orders-service`.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, Instrument};

use message_bus::mock::serve_with;
use orders_service::clients::PaymentSession;
use orders_service::model::{OrderItemRequest, OrderStatus, ValidatedProduct};
use orders_service::runtime::telemetry::setup_tracing;
use orders_service::runtime::OrdersSystem;
use orders_service::service::{PaginationQuery, PaymentSucceeded};
use orders_service::store::memory::InMemoryOrderStore;
use orders_service::OrdersConfig;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("starting orders service with fixture upstreams");

    let (system, upstreams) = OrdersSystem::start(
        Arc::new(InMemoryOrderStore::new()),
        OrdersConfig::from_env(),
    );

    // Fixture Product service: knows two products.
    serve_with(upstreams.product_validation, |ids: Vec<String>| {
        let catalog = [
            ValidatedProduct {
                id: "p-espresso".to_string(),
                name: "Espresso Machine".to_string(),
                price: Decimal::new(24999, 2),
            },
            ValidatedProduct {
                id: "p-grinder".to_string(),
                name: "Burr Grinder".to_string(),
                price: Decimal::new(8950, 2),
            },
        ];
        catalog
            .iter()
            .filter(|product| ids.contains(&product.id))
            .cloned()
            .collect()
    });

    // Fixture Payment service: answers every session request.
    serve_with(upstreams.payment_sessions, |request| PaymentSession {
        id: format!("cs_{}", request.order_id),
        url: format!("https://pay.example/checkout/{}", request.order_id),
    });

    let span = tracing::info_span!("order_creation");
    let created = async {
        system
            .orders
            .create_order(vec![
                OrderItemRequest {
                    product_id: "p-espresso".to_string(),
                    quantity: 1,
                },
                OrderItemRequest {
                    product_id: "p-grinder".to_string(),
                    quantity: 2,
                },
            ])
            .await
            .map_err(|e| e.message)
    }
    .instrument(span)
    .await?;

    let order_id = created.order.order.id;
    info!(
        order_id = %order_id,
        total = %created.order.order.total_amount,
        session = %created.payment_session.url,
        "order created"
    );

    let page = system
        .orders
        .find_all_orders(PaginationQuery {
            page: 1,
            limit: 10,
            status: Some(OrderStatus::Pending),
        })
        .await
        .map_err(|e| e.message)?;
    info!(total = page.meta.total, listed = page.data.len(), "pending orders");

    // The payment provider confirms out-of-band; simulate its event.
    system
        .payments_in
        .publish(PaymentSucceeded {
            order_id,
            stripe_payment_id: format!("ch_{order_id}"),
            receipt_url: format!("https://pay.example/receipts/{order_id}"),
        })
        .await
        .map_err(|e| e.to_string())?;

    // Give the event loop a moment before reading the order back.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let paid = system.orders.find_one_order(order_id).await.map_err(|e| e.message)?;
    info!(status = %paid.order.status, paid = paid.order.paid, "order after reconciliation");

    let delivered = system
        .orders
        .change_order_status(order_id, OrderStatus::Delivered)
        .await
        .map_err(|e| e.message)?;
    info!(status = %delivered.status, "order delivered");

    system.shutdown().await;
    Ok(())
}
