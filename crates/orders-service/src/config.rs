//! Service configuration.
//!
//! Everything has a sensible default; the environment can override the
//! currency and the RPC timeout (`ORDERS_CURRENCY`,
//! `ORDERS_RPC_TIMEOUT_MS`).

use std::time::Duration;

use crate::model::OrderStatus;

#[derive(Debug, Clone)]
pub struct OrdersConfig {
    /// Currency code passed to the payment service on session creation.
    pub currency: String,
    /// Bound on every outbound RPC (product validation, payment session).
    pub rpc_timeout: Duration,
    /// Capacity of the request and event channels.
    pub channel_capacity: usize,
    /// Statuses accepted as a listing filter. `Paid` is excluded by
    /// default: it is the service-assigned value, not part of the filter
    /// enumeration callers may use.
    pub listable_statuses: Vec<OrderStatus>,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            currency: "usd".to_string(),
            rpc_timeout: Duration::from_secs(5),
            channel_capacity: 32,
            listable_statuses: vec![
                OrderStatus::Pending,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ],
        }
    }
}

impl OrdersConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(currency) = std::env::var("ORDERS_CURRENCY") {
            config.currency = currency;
        }
        if let Ok(ms) = std::env::var("ORDERS_RPC_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.rpc_timeout = Duration::from_millis(ms);
            }
        }
        config
    }

    pub fn is_listable(&self, status: OrderStatus) -> bool {
        self.listable_statuses.contains(&status)
    }
}
