//! Error taxonomy for the orders core.
//!
//! Every core-detected failure carries a machine-checkable kind, a
//! human-readable message, and an HTTP-style status code for the adapter
//! layer to map. Nothing is swallowed; no retries happen here — retry
//! policy belongs to the transport layer.

use serde::{Deserialize, Serialize};

use crate::model::{OrderId, OrderStatus};
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Input that survived shape validation but fails a core rule.
    #[error("{0}")]
    Validation(String),

    /// The Product service's reply did not cover this product id.
    #[error("product with id: {0} is unknown or invalid")]
    UnknownProduct(String),

    #[error("order with id: {0} not found")]
    NotFound(OrderId),

    /// The requested status equals the current one. A no-op transition is
    /// an error, never a silent success.
    #[error("order with id: {id} already has status: {status}")]
    RedundantTransition { id: OrderId, status: OrderStatus },

    /// RPC timeout or transport failure talking to a remote service.
    #[error("{service} unavailable: {source}")]
    UpstreamUnavailable {
        service: &'static str,
        #[source]
        source: message_bus::BusError,
    },

    #[error("order store failure: {0}")]
    Store(String),
}

impl OrderError {
    /// HTTP-style status code for the adapter layer.
    pub fn status_code(&self) -> u16 {
        match self {
            OrderError::Validation(_)
            | OrderError::UnknownProduct(_)
            | OrderError::RedundantTransition { .. } => 400,
            OrderError::NotFound(_) => 404,
            OrderError::UpstreamUnavailable { .. } => 503,
            OrderError::Store(_) => 500,
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(e: StoreError) -> Self {
        OrderError::Store(e.to_string())
    }
}

/// Wire form of an error reply: `{message, status}`, the shape adapter
/// layers forward to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub status: u16,
}

impl ErrorPayload {
    /// Used when the service's own request channel is gone.
    pub fn unavailable() -> Self {
        Self {
            message: "orders service unavailable".to_string(),
            status: 503,
        }
    }
}

impl From<OrderError> for ErrorPayload {
    fn from(e: OrderError) -> Self {
        Self {
            status: e.status_code(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message_bus::BusError;
    use std::time::Duration;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let id = OrderId::new();
        assert_eq!(OrderError::Validation("bad".into()).status_code(), 400);
        assert_eq!(OrderError::UnknownProduct("p9".into()).status_code(), 400);
        assert_eq!(OrderError::NotFound(id).status_code(), 404);
        assert_eq!(
            OrderError::RedundantTransition {
                id,
                status: OrderStatus::Pending
            }
            .status_code(),
            400
        );
        assert_eq!(
            OrderError::UpstreamUnavailable {
                service: "product validator",
                source: BusError::Timeout(Duration::from_secs(1)),
            }
            .status_code(),
            503
        );
    }

    #[test]
    fn payload_carries_message_and_status() {
        let id = OrderId::new();
        let payload = ErrorPayload::from(OrderError::NotFound(id));
        assert_eq!(payload.status, 404);
        assert!(payload.message.contains(&id.to_string()));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], 404);
    }
}
