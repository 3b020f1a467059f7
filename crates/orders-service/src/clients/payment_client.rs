//! # Payment Session Client
//!
//! Wraps the `create.payment.session` request/reply pattern: the order id,
//! the currency, and the name-enriched charge lines go out; a session
//! handle the buyer completes out-of-band comes back.

use message_bus::RpcClient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::OrderError;
use crate::model::OrderId;

/// One charge line of a payment session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLineItem {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSessionRequest {
    pub order_id: OrderId,
    pub currency: String,
    pub items: Vec<PaymentLineItem>,
}

/// Handle to a provider-hosted checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub id: String,
    pub url: String,
}

#[derive(Clone)]
pub struct PaymentSessionClient {
    inner: RpcClient<PaymentSessionRequest, PaymentSession>,
}

impl PaymentSessionClient {
    pub fn new(inner: RpcClient<PaymentSessionRequest, PaymentSession>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create_session(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<PaymentSession, OrderError> {
        debug!(items = request.items.len(), "requesting payment session");
        self.inner
            .call(request)
            .await
            .map_err(|source| OrderError::UpstreamUnavailable {
                service: "payment service",
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message_bus::mock::serve_with;
    use message_bus::{channel, BusError};
    use std::time::Duration;

    #[tokio::test]
    async fn create_session_returns_the_handle() {
        let (rpc, endpoint) = channel(8, Duration::from_secs(1));
        serve_with(endpoint, |request: PaymentSessionRequest| {
            assert_eq!(request.currency, "usd");
            PaymentSession {
                id: format!("cs_{}", request.order_id),
                url: "https://pay.example/cs".to_string(),
            }
        });

        let client = PaymentSessionClient::new(rpc);
        let order_id = OrderId::new();
        let session = client
            .create_session(PaymentSessionRequest {
                order_id,
                currency: "usd".to_string(),
                items: vec![PaymentLineItem {
                    name: "A".to_string(),
                    quantity: 2,
                    price: Decimal::from(10),
                }],
            })
            .await
            .unwrap();

        assert_eq!(session.id, format!("cs_{order_id}"));
    }

    #[tokio::test]
    async fn closed_endpoint_maps_to_upstream_unavailable() {
        let (rpc, endpoint) = channel::<PaymentSessionRequest, PaymentSession>(
            8,
            Duration::from_secs(1),
        );
        drop(endpoint);

        let client = PaymentSessionClient::new(rpc);
        match client
            .create_session(PaymentSessionRequest {
                order_id: OrderId::new(),
                currency: "usd".to_string(),
                items: Vec::new(),
            })
            .await
        {
            Err(OrderError::UpstreamUnavailable { service, source }) => {
                assert_eq!(service, "payment service");
                assert!(matches!(source, BusError::Closed));
            }
            other => panic!("expected UpstreamUnavailable, got {other:?}"),
        }
    }
}
