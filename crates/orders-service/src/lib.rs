//! # Orders Service
//!
//! The order-lifecycle core of a small commerce system in which the product
//! catalog and the payment provider live in separate services, reachable
//! only over an asynchronous bus. The hard parts are the orchestration, not
//! the storage: synchronously-shaped remote calls over request/reply
//! channels, price computation from untrusted remote data, a status state
//! machine with a no-op-transition guard, and reconciliation of an order
//! with a payment outcome that arrives later as an independent event.
//!
//! ## Module Tour
//!
//! - [`model`] — pure data: orders, items, receipts, statuses, projections.
//! - [`store`] — the [`OrderStore`](store::OrderStore) trait (single-order
//!   transactional writes) plus an in-memory backend for tests and demos.
//! - [`clients`] — thin wrappers over [`message_bus`] request/reply clients
//!   for the remote Product and Payment services.
//! - [`service`] — the [`OrdersService`](service::OrdersService)
//!   orchestrator: create, list, read, status changes, payment
//!   reconciliation.
//! - [`handler`] — inbound message dispatch: one loop for the request/reply
//!   patterns, one for the fire-and-forget `payment.succeeded` event.
//! - [`runtime`] — wiring and lifecycle: spawns the handler loops and hands
//!   out the client, the event publisher, and the upstream endpoints.
//!
//! ## Concurrency
//!
//! The orchestrator holds no mutable state of its own; everything lives in
//! the store. Each inbound request or event is an independent unit of work
//! that suspends only at RPC boundaries and store I/O. Operations on
//! different orders are fully independent; concurrent writes to the same
//! order serialize at the store.

pub mod clients;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod runtime;
pub mod service;
pub mod store;

pub use config::OrdersConfig;
pub use error::{ErrorPayload, OrderError};
pub use service::OrdersService;
