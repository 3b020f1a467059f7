//! Thin, typed clients for the remote services the orchestrator depends
//! on. Each wraps a [`message_bus::RpcClient`] and maps transport failures
//! into [`OrderError::UpstreamUnavailable`](crate::error::OrderError).

pub mod payment_client;
pub mod product_client;

pub use payment_client::{
    PaymentLineItem, PaymentSession, PaymentSessionClient, PaymentSessionRequest,
};
pub use product_client::{ProductLookup, ProductValidatorClient};
