//! # Inbound Dispatch
//!
//! Two loops own the service's inbound traffic. [`run_orders`] serves the
//! request/reply patterns: it drains an mpsc receiver of [`OrderRequest`]
//! envelopes, runs the matching [`OrdersService`] operation, and answers on
//! the envelope's oneshot reply channel. [`run_payment_events`] drains the
//! fire-and-forget `payment.succeeded` stream; there is no reply channel,
//! so failures are logged and the loop moves on.
//!
//! [`OrdersClient`] is the caller-side handle: typed async methods that
//! build an envelope, send it, and await the reply. A closed channel or a
//! dropped reply surfaces as [`ErrorPayload::unavailable`].

use message_bus::EventStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::ErrorPayload;
use crate::model::{EnrichedOrder, Order, OrderId, OrderItemRequest, OrderStatus};
use crate::service::{CreatedOrder, OrderPage, OrdersService, PaginationQuery, PaymentSucceeded};

type Reply<T> = oneshot::Sender<Result<T, ErrorPayload>>;

/// One inbound request/reply envelope.
#[derive(Debug)]
pub enum OrderRequest {
    CreateOrder {
        items: Vec<OrderItemRequest>,
        respond_to: Reply<CreatedOrder>,
    },
    FindAllOrders {
        query: PaginationQuery,
        respond_to: Reply<OrderPage>,
    },
    FindOneOrder {
        id: OrderId,
        respond_to: Reply<EnrichedOrder>,
    },
    ChangeOrderStatus {
        id: OrderId,
        status: OrderStatus,
        respond_to: Reply<Order>,
    },
}

impl OrderRequest {
    fn pattern(&self) -> &'static str {
        match self {
            OrderRequest::CreateOrder { .. } => "create_order",
            OrderRequest::FindAllOrders { .. } => "find_all_orders",
            OrderRequest::FindOneOrder { .. } => "find_one_order",
            OrderRequest::ChangeOrderStatus { .. } => "change_order_status",
        }
    }
}

/// Serves [`OrderRequest`] envelopes until every sender is gone.
///
/// A caller that stopped waiting makes the reply send fail; that is the
/// caller's loss, not ours, so it is logged at debug and ignored.
pub async fn run_orders(service: OrdersService, mut requests: mpsc::Receiver<OrderRequest>) {
    while let Some(request) = requests.recv().await {
        let pattern = request.pattern();
        debug!(pattern, "handling request");
        match request {
            OrderRequest::CreateOrder { items, respond_to } => {
                respond(pattern, respond_to, service.create(items).await);
            }
            OrderRequest::FindAllOrders { query, respond_to } => {
                respond(pattern, respond_to, service.find_all(query).await);
            }
            OrderRequest::FindOneOrder { id, respond_to } => {
                respond(pattern, respond_to, service.find_one(id).await);
            }
            OrderRequest::ChangeOrderStatus {
                id,
                status,
                respond_to,
            } => {
                respond(pattern, respond_to, service.change_status(id, status).await);
            }
        }
    }
    info!("order request channel closed, handler stopping");
}

fn respond<T>(pattern: &str, respond_to: Reply<T>, result: Result<T, crate::error::OrderError>) {
    let reply = match result {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(pattern, error = %e, "request failed");
            Err(ErrorPayload::from(e))
        }
    };
    if respond_to.send(reply).is_err() {
        debug!(pattern, "caller went away before the reply");
    }
}

/// Drains `payment.succeeded` events until the publisher side is gone.
pub async fn run_payment_events(service: OrdersService, mut events: EventStream<PaymentSucceeded>) {
    while let Some(event) = events.next().await {
        if let Err(e) = service.reconcile_payment(event).await {
            warn!(error = %e, "payment event could not be applied");
        }
    }
    info!("payment event stream closed, handler stopping");
}

/// Caller-side handle to the request loop.
#[derive(Clone)]
pub struct OrdersClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrdersClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    pub async fn create_order(
        &self,
        items: Vec<OrderItemRequest>,
    ) -> Result<CreatedOrder, ErrorPayload> {
        let (respond_to, reply) = oneshot::channel();
        self.send(OrderRequest::CreateOrder { items, respond_to }, reply)
            .await
    }

    pub async fn find_all_orders(&self, query: PaginationQuery) -> Result<OrderPage, ErrorPayload> {
        let (respond_to, reply) = oneshot::channel();
        self.send(OrderRequest::FindAllOrders { query, respond_to }, reply)
            .await
    }

    pub async fn find_one_order(&self, id: OrderId) -> Result<EnrichedOrder, ErrorPayload> {
        let (respond_to, reply) = oneshot::channel();
        self.send(OrderRequest::FindOneOrder { id, respond_to }, reply)
            .await
    }

    pub async fn change_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ErrorPayload> {
        let (respond_to, reply) = oneshot::channel();
        self.send(
            OrderRequest::ChangeOrderStatus {
                id,
                status,
                respond_to,
            },
            reply,
        )
        .await
    }

    async fn send<T>(
        &self,
        request: OrderRequest,
        reply: oneshot::Receiver<Result<T, ErrorPayload>>,
    ) -> Result<T, ErrorPayload> {
        if self.sender.send(request).await.is_err() {
            return Err(ErrorPayload::unavailable());
        }
        match reply.await {
            Ok(result) => result,
            Err(_) => Err(ErrorPayload::unavailable()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::clients::{PaymentSessionClient, ProductValidatorClient};
    use crate::config::OrdersConfig;
    use crate::store::memory::InMemoryOrderStore;

    #[tokio::test]
    async fn client_maps_closed_channel_to_unavailable() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);

        let client = OrdersClient::new(sender);
        let err = client.find_one_order(OrderId::new()).await.unwrap_err();
        assert_eq!(err, ErrorPayload::unavailable());
    }

    #[tokio::test]
    async fn loop_answers_on_the_reply_channel() {
        let config = OrdersConfig::default();
        let (product_rpc, product_endpoint) =
            message_bus::channel(4, config.rpc_timeout);
        let (payment_rpc, _payment_endpoint) = message_bus::channel(4, config.rpc_timeout);
        message_bus::mock::serve_with(product_endpoint, |_: Vec<String>| Vec::new());

        let service = OrdersService::new(
            Arc::new(InMemoryOrderStore::new()),
            ProductValidatorClient::new(product_rpc),
            PaymentSessionClient::new(payment_rpc),
            config,
        );
        let (sender, receiver) = mpsc::channel(4);
        let handle = tokio::spawn(run_orders(service, receiver));

        let client = OrdersClient::new(sender);
        let err = client.find_one_order(OrderId::new()).await.unwrap_err();
        assert_eq!(err.status, 404);

        drop(client);
        handle.await.unwrap();
    }
}
