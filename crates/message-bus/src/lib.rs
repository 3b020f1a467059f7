//! # Message Bus
//!
//! Transport primitives for services that talk to each other over an
//! asynchronous bus but want synchronously-shaped call sites.
//!
//! Two messaging legs are provided:
//!
//! - **Request/reply** ([`RpcClient`] / [`RpcEndpoint`]): every request
//!   carries a correlation id and a oneshot reply handle. The caller's task
//!   suspends on the reply handle until the matching response arrives or a
//!   bounded timeout elapses — it never blocks a worker thread, and it never
//!   waits forever.
//! - **Publish/subscribe** ([`EventPublisher`] / [`EventStream`]): one-way
//!   events with no reply. Delivery is assumed at-least-once, so subscribers
//!   must tolerate duplicates.
//!
//! ## Concurrency model
//!
//! An endpoint drains its channel sequentially; multiple endpoints run in
//! parallel, each in its own task. State lives behind the endpoint, never in
//! the client, so clients are cheap to clone and share across tasks.
//!
//! ## Testing
//!
//! The [`mock`] module answers endpoints with scripted closures so client
//! logic can be exercised without spawning the real upstream service.

pub mod error;
pub mod event;
pub mod mock;
pub mod rpc;

pub use error::BusError;
pub use event::{event_channel, EventPublisher, EventStream};
pub use rpc::{channel, RpcClient, RpcEndpoint, RpcRequest};
