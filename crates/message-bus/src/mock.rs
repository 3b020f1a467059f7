//! # Test Endpoints
//!
//! Helpers for standing in for a remote service in tests and demos.
//!
//! The underlying primitive needs no mocking layer of its own: an
//! [`RpcEndpoint`] obtained from [`channel`](crate::channel) *is* the remote
//! service's inbox, so a test can drive it directly with
//! [`next`](RpcEndpoint::next) and [`respond`](crate::RpcRequest::respond).
//! The helpers here cover the two recurring shapes:
//!
//! - [`serve_with`] answers every request with a closure, for fixtures that
//!   should behave like a healthy upstream.
//! - [`hold_requests`] accepts requests but never answers, for exercising
//!   caller timeouts.
//!
//! For an unreachable upstream, just drop the endpoint: the next `call`
//! fails with [`BusError::Closed`](crate::BusError::Closed).

use tokio::task::JoinHandle;

use crate::rpc::RpcEndpoint;

/// Spawns a loop answering every request with `handler(payload)`.
///
/// The task ends once all clients for the endpoint are dropped.
pub fn serve_with<Req, Resp, F>(mut endpoint: RpcEndpoint<Req, Resp>, mut handler: F) -> JoinHandle<()>
where
    Req: Send + 'static,
    Resp: Send + 'static,
    F: FnMut(Req) -> Resp + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(crate::rpc::RpcRequest { payload, reply, .. }) = endpoint.next().await {
            let response = handler(payload);
            let _ = reply.send(response);
        }
    })
}

/// Spawns a loop that accepts requests and keeps them alive unanswered.
///
/// Keeping the envelopes alive keeps their reply handles open, so callers
/// observe a timeout rather than a dropped reply.
pub fn hold_requests<Req, Resp>(mut endpoint: RpcEndpoint<Req, Resp>) -> JoinHandle<()>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Some(request) = endpoint.next().await {
            held.push(request);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BusError;
    use crate::rpc::channel;
    use std::time::Duration;

    #[tokio::test]
    async fn serve_with_answers_every_request() {
        let (client, endpoint) = channel::<u32, u32>(4, Duration::from_secs(1));
        serve_with(endpoint, |n| n * 2);

        assert_eq!(client.call(4).await.unwrap(), 8);
        assert_eq!(client.call(5).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn hold_requests_produces_timeouts() {
        let (client, endpoint) = channel::<u32, u32>(4, Duration::from_millis(20));
        hold_requests(endpoint);

        assert!(matches!(client.call(1).await, Err(BusError::Timeout(_))));
    }
}
