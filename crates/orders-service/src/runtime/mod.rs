//! # Wiring and Lifecycle
//!
//! [`OrdersSystem::start`] assembles the whole service: it opens the
//! request and event channels, builds the upstream RPC clients, spawns the
//! two handler loops, and hands back the caller-facing handles plus the
//! upstream endpoints for the host to connect to real transports (or to
//! [`message_bus::mock`] fixtures in tests).
//!
//! Shutdown is drop-driven, as everywhere else on the bus: dropping the
//! handles closes the channels, the loops drain what is in flight and
//! return, and [`OrdersSystem::shutdown`] awaits them.

pub mod telemetry;

use std::sync::Arc;

use message_bus::{event_channel, EventPublisher, RpcEndpoint};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::clients::{
    PaymentSession, PaymentSessionClient, PaymentSessionRequest, ProductValidatorClient,
};
use crate::config::OrdersConfig;
use crate::handler::{run_orders, run_payment_events, OrdersClient};
use crate::model::ValidatedProduct;
use crate::service::{OrdersService, PaymentSucceeded};
use crate::store::OrderStore;

/// Server ends of the two upstream request/reply channels. The host wires
/// these to the real Product and Payment services, or to mock fixtures.
pub struct UpstreamEndpoints {
    pub product_validation: RpcEndpoint<Vec<String>, Vec<ValidatedProduct>>,
    pub payment_sessions: RpcEndpoint<PaymentSessionRequest, PaymentSession>,
}

/// A running orders service.
pub struct OrdersSystem {
    /// Request/reply handle for the four order patterns.
    pub orders: OrdersClient,
    /// Publisher for inbound `payment.succeeded` events.
    pub payments_in: EventPublisher<PaymentSucceeded>,
    handles: Vec<JoinHandle<()>>,
}

impl OrdersSystem {
    pub fn start(store: Arc<dyn OrderStore>, config: OrdersConfig) -> (Self, UpstreamEndpoints) {
        let (product_rpc, product_validation) =
            message_bus::channel(config.channel_capacity, config.rpc_timeout);
        let (payment_rpc, payment_sessions) =
            message_bus::channel(config.channel_capacity, config.rpc_timeout);

        let service = OrdersService::new(
            store,
            ProductValidatorClient::new(product_rpc),
            PaymentSessionClient::new(payment_rpc),
            config.clone(),
        );

        let (request_sender, request_receiver) = mpsc::channel(config.channel_capacity);
        let (payments_in, payment_events) = event_channel(config.channel_capacity);

        let handles = vec![
            tokio::spawn(run_orders(service.clone(), request_receiver)),
            tokio::spawn(run_payment_events(service, payment_events)),
        ];
        info!("orders service started");

        (
            Self {
                orders: OrdersClient::new(request_sender),
                payments_in,
                handles,
            },
            UpstreamEndpoints {
                product_validation,
                payment_sessions,
            },
        )
    }

    /// Drops the handles and waits for both loops to drain and stop.
    pub async fn shutdown(self) {
        let Self {
            orders,
            payments_in,
            handles,
        } = self;
        drop(orders);
        drop(payments_in);
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "handler task failed");
            }
        }
        info!("orders service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryOrderStore;

    #[tokio::test]
    async fn start_then_shutdown_stops_both_loops() {
        let (system, endpoints) =
            OrdersSystem::start(Arc::new(InMemoryOrderStore::new()), OrdersConfig::default());
        drop(endpoints);
        system.shutdown().await;
    }
}
