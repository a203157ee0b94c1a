//! # RPC Client
//!
//! Client side of the RPC-over-queue protocol.
//!
//! An [`RpcClient`] owns a private reply inbox on the broker. Each call
//! publishes a request envelope onto a well-known queue subject, carrying
//! a fresh correlation id and the inbox address, then suspends until the
//! matching reply arrives on the inbox or the configured timeout passes.
//!
//! One client instance serves one outstanding call at a time; callers that
//! need concurrency create independent clients, each with its own inbox,
//! so replies cannot cross-match. The inbox subscription is torn down when
//! the client is dropped.
//!
//! # Examples
//!
//! ```ignore
//! use ranked_prices::infrastructure::messaging::rpc_client::RpcClient;
//! use std::time::Duration;
//!
//! let nats = async_nats::connect("nats://localhost:4222").await?;
//! let mut client = RpcClient::new(nats, "ranking_queue", Duration::from_secs(5)).await?;
//! let reply = client.call("10".into()).await?;
//! ```

use crate::domain::value_objects::CorrelationId;
use crate::infrastructure::messaging::correlation::CorrelationStore;
use crate::infrastructure::messaging::error::{RpcError, RpcResult};
use crate::infrastructure::messaging::{CORRELATION_ID_HEADER, REPLY_TO_HEADER};
use async_nats::{Client, HeaderMap, Message};
use bytes::Bytes;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// RPC client bound to one well-known request queue.
#[derive(Debug)]
pub struct RpcClient {
    client: Client,
    queue: String,
    inbox: String,
    store: CorrelationStore,
    timeout: Duration,
    pump: JoinHandle<()>,
}

impl RpcClient {
    /// Creates a client for `queue`, subscribing a fresh private inbox
    /// for replies.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Subscribe`] if the inbox subscription fails.
    pub async fn new(
        client: Client,
        queue: impl Into<String>,
        timeout: Duration,
    ) -> RpcResult<Self> {
        let queue = queue.into();
        let inbox = client.new_inbox();
        let mut subscription = client
            .subscribe(inbox.clone())
            .await
            .map_err(|e| RpcError::subscribe(format!("reply inbox {inbox}: {e}")))?;

        let store = CorrelationStore::new();
        let pump_store = store.clone();
        let pump = tokio::spawn(async move {
            while let Some(message) = subscription.next().await {
                dispatch_reply(&pump_store, message);
            }
        });

        Ok(Self {
            client,
            queue,
            inbox,
            store,
            timeout,
            pump,
        })
    }

    /// Returns the well-known queue this client publishes to.
    #[must_use]
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Returns the private reply address of this client.
    #[must_use]
    pub fn reply_address(&self) -> &str {
        &self.inbox
    }

    /// Publishes `payload` as a request and suspends until the matching
    /// reply arrives.
    ///
    /// The reply payload is returned verbatim; decoding is the caller's
    /// responsibility. Takes `&mut self` so one instance cannot pipeline
    /// calls.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Publish`] if the request cannot be published
    /// and [`RpcError::Timeout`] if no reply arrives within the configured
    /// deadline. Abandoning the returned future deregisters the
    /// correlation id, so a late reply is discarded.
    pub async fn call(&mut self, payload: Bytes) -> RpcResult<Bytes> {
        let id = CorrelationId::new_v4();
        let pending = self.store.register(id);

        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, id.to_string().as_str());
        headers.insert(REPLY_TO_HEADER, self.inbox.as_str());

        debug!(queue = %self.queue, correlation_id = %id, "publishing rpc request");
        self.client
            .publish_with_headers(self.queue.clone(), headers, payload)
            .await
            .map_err(|e| RpcError::publish(format!("request to {}: {e}", self.queue)))?;
        self.client
            .flush()
            .await
            .map_err(|e| RpcError::publish(format!("flush to {}: {e}", self.queue)))?;

        pending.wait(self.timeout).await
    }
}

impl Drop for RpcClient {
    fn drop(&mut self) {
        // Dropping the subscription inside the aborted task closes the
        // inbox; the broker garbage-collects it on disconnect.
        self.pump.abort();
    }
}

/// Routes one inbox message into the correlation store.
fn dispatch_reply(store: &CorrelationStore, message: Message) {
    let Some(id) = reply_correlation_id(&message) else {
        warn!(
            subject = %message.subject,
            "reply without a valid correlation id header, discarding"
        );
        return;
    };
    if !store.resolve(id, message.payload) {
        debug!(correlation_id = %id, "discarding unmatched or late reply");
    }
}

/// Extracts the correlation id header from a reply, if present and valid.
fn reply_correlation_id(message: &Message) -> Option<CorrelationId> {
    message
        .headers
        .as_ref()?
        .get(CORRELATION_ID_HEADER)?
        .as_str()
        .parse()
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn reply_message(headers: Option<HeaderMap>, payload: &'static [u8]) -> Message {
        Message {
            subject: "_INBOX.test".to_string().into(),
            reply: None,
            payload: Bytes::from_static(payload),
            headers,
            status: None,
            description: None,
            length: payload.len(),
        }
    }

    #[tokio::test]
    async fn dispatch_resolves_matching_id() {
        let store = CorrelationStore::new();
        let id = CorrelationId::new_v4();
        let pending = store.register(id);

        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, id.to_string().as_str());
        dispatch_reply(&store, reply_message(Some(headers), b"BTC,ETH"));

        let payload = pending.wait(Duration::from_secs(1)).await.unwrap();
        assert_eq!(payload, Bytes::from_static(b"BTC,ETH"));
    }

    #[tokio::test]
    async fn dispatch_ignores_foreign_id() {
        let store = CorrelationStore::new();
        let pending = store.register(CorrelationId::new_v4());

        let mut headers = HeaderMap::new();
        headers.insert(
            CORRELATION_ID_HEADER,
            CorrelationId::new_v4().to_string().as_str(),
        );
        dispatch_reply(&store, reply_message(Some(headers), b"stale"));

        assert_eq!(store.in_flight(), 1);
        drop(pending);
    }

    #[test]
    fn dispatch_ignores_missing_headers() {
        let store = CorrelationStore::new();
        dispatch_reply(&store, reply_message(None, b"noise"));
        assert_eq!(store.in_flight(), 0);
    }

    #[test]
    fn correlation_id_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, "not-a-uuid");
        let message = reply_message(Some(headers), b"noise");
        assert!(reply_correlation_id(&message).is_none());
    }
}
