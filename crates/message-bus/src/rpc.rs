//! # Request/Reply Channel
//!
//! A typed request/reply pair over a Tokio mpsc channel. The client side
//! sends an envelope carrying the payload, a fresh correlation id, and a
//! oneshot reply handle; the endpoint side answers each envelope whenever it
//! is ready. From the caller's point of view the exchange looks like an
//! ordinary async function call, even though the transport underneath is
//! fully asynchronous.
//!
//! Every call is bounded by the timeout configured at channel construction.
//! On timeout the reply handle is dropped, so a late answer from the
//! endpoint is discarded rather than delivered to a caller that already
//! gave up.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::debug;
use uuid::Uuid;

use crate::error::BusError;

/// Envelope delivered to an [`RpcEndpoint`].
#[derive(Debug)]
pub struct RpcRequest<Req, Resp> {
    /// Correlates the reply with the suspended caller; also useful in logs.
    pub correlation_id: Uuid,
    pub payload: Req,
    pub reply: oneshot::Sender<Resp>,
}

impl<Req, Resp> RpcRequest<Req, Resp> {
    /// Answers the request. A caller that timed out already dropped its
    /// receiving half; that is not an error for the endpoint.
    pub fn respond(self, response: Resp) {
        let _ = self.reply.send(response);
    }
}

/// The calling side of a request/reply channel.
///
/// Holds only a sender and the timeout bound, so cloning is cheap and the
/// client can be shared freely across tasks.
pub struct RpcClient<Req, Resp> {
    sender: mpsc::Sender<RpcRequest<Req, Resp>>,
    timeout: Duration,
}

// Manual impl: `#[derive(Clone)]` would demand `Req: Clone + Resp: Clone`.
impl<Req, Resp> Clone for RpcClient<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            timeout: self.timeout,
        }
    }
}

impl<Req, Resp> RpcClient<Req, Resp> {
    /// Sends `payload` and suspends until the reply arrives or the timeout
    /// elapses. No partial results: the outcome is the full response or a
    /// [`BusError`].
    pub async fn call(&self, payload: Req) -> Result<Resp, BusError> {
        let (reply, response) = oneshot::channel();
        let correlation_id = Uuid::new_v4();
        self.sender
            .send(RpcRequest {
                correlation_id,
                payload,
                reply,
            })
            .await
            .map_err(|_| BusError::Closed)?;
        debug!(%correlation_id, "request sent");

        match time::timeout(self.timeout, response).await {
            Ok(Ok(resp)) => {
                debug!(%correlation_id, "reply received");
                Ok(resp)
            }
            Ok(Err(_)) => Err(BusError::Dropped),
            Err(_) => Err(BusError::Timeout(self.timeout)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// The serving side of a request/reply channel.
pub struct RpcEndpoint<Req, Resp> {
    receiver: mpsc::Receiver<RpcRequest<Req, Resp>>,
}

impl<Req, Resp> RpcEndpoint<Req, Resp> {
    /// Waits for the next request. Returns `None` once every client has
    /// been dropped, which is the shutdown signal for endpoint loops.
    pub async fn next(&mut self) -> Option<RpcRequest<Req, Resp>> {
        self.receiver.recv().await
    }
}

/// Creates a connected client/endpoint pair.
///
/// `capacity` bounds the number of in-flight requests; senders wait for
/// space when the channel is full. `timeout` bounds every `call`.
pub fn channel<Req, Resp>(
    capacity: usize,
    timeout: Duration,
) -> (RpcClient<Req, Resp>, RpcEndpoint<Req, Resp>) {
    let (sender, receiver) = mpsc::channel(capacity);
    (RpcClient { sender, timeout }, RpcEndpoint { receiver })
}
