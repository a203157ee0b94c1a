//! # RPC Worker
//!
//! Worker side of the RPC-over-queue protocol.
//!
//! An [`RpcWorker`] continuously consumes request envelopes from one
//! durable well-known queue and hands each payload to its [`RpcHandler`].
//! Requests are processed strictly one at a time per worker instance
//! (batches of one message are pulled, and the next pull happens only
//! after the current message is acknowledged). For each request the
//! worker publishes the handler's reply to the reply address named in the
//! envelope, tagged with the original correlation id, and acknowledges the
//! message only after the reply went out. A crash before the
//! acknowledgement causes redelivery, so processing is at-least-once and
//! handlers must be idempotent.
//!
//! Horizontal scaling comes from running several worker processes against
//! the same durable consumer; the broker load-balances requests across
//! them.

use crate::infrastructure::messaging::error::{RpcError, RpcResult};
use crate::infrastructure::messaging::{CORRELATION_ID_HEADER, REPLY_TO_HEADER};
use async_nats::jetstream::consumer::pull;
use async_nats::jetstream::{self, stream};
use async_nats::{Client, HeaderMap};
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, error, info, warn};

/// Durable consumer name shared by all instances of a worker.
const CONSUMER_NAME: &str = "workers";

/// Domain-side handler for one request queue.
///
/// Implementations decode the payload per their service semantics, do the
/// domain work, and return the encoded reply payload. Handler results must
/// be logically idempotent: a redelivered request produces a reply with
/// identical content.
#[async_trait::async_trait]
pub trait RpcHandler: Send + Sync {
    /// Processes one request payload and returns the reply payload.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Malformed`] when the payload cannot be decoded.
    /// Any error suppresses the reply; the caller will observe a timeout.
    async fn handle(&self, payload: &[u8]) -> RpcResult<Bytes>;

    /// Returns the service name, used for logging.
    fn name(&self) -> &'static str;
}

/// Consume loop binding one handler to one durable queue.
#[derive(Debug)]
pub struct RpcWorker<H> {
    client: Client,
    queue: String,
    handler: H,
}

impl<H: RpcHandler> RpcWorker<H> {
    /// Creates a worker for `queue` backed by `handler`.
    #[must_use]
    pub fn new(client: Client, queue: impl Into<String>, handler: H) -> Self {
        Self {
            client,
            queue: queue.into(),
            handler,
        }
    }

    /// Declares the durable queue and consumes requests until the message
    /// stream ends.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Subscribe`] if the queue or its consumer cannot
    /// be set up.
    pub async fn run(self) -> RpcResult<()> {
        let jetstream = jetstream::new(self.client.clone());

        let stream = jetstream
            .get_or_create_stream(stream::Config {
                name: self.queue.clone(),
                subjects: vec![self.queue.clone().into()],
                retention: stream::RetentionPolicy::WorkQueue,
                ..Default::default()
            })
            .await
            .map_err(|e| RpcError::subscribe(format!("declare queue {}: {e}", self.queue)))?;

        let consumer = stream
            .get_or_create_consumer(
                CONSUMER_NAME,
                pull::Config {
                    durable_name: Some(CONSUMER_NAME.to_string()),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| RpcError::subscribe(format!("consumer on {}: {e}", self.queue)))?;

        // Batch size 1 realizes prefetch = 1: the next request is not
        // pulled until the current one is acknowledged.
        let mut messages = consumer
            .stream()
            .max_messages_per_batch(1)
            .messages()
            .await
            .map_err(|e| RpcError::subscribe(format!("message stream on {}: {e}", self.queue)))?;

        info!(
            service = self.handler.name(),
            queue = %self.queue,
            "worker running, waiting for rpc requests"
        );

        while let Some(message) = messages.next().await {
            match message {
                Ok(message) => self.process(message).await,
                Err(error) => warn!(queue = %self.queue, %error, "failed to pull request"),
            }
        }

        Ok(())
    }

    /// Handles one request envelope: reply first, then acknowledge.
    async fn process(&self, message: jetstream::Message) {
        let correlation_id = header_str(&message, CORRELATION_ID_HEADER).map(str::to_string);
        let reply_to = header_str(&message, REPLY_TO_HEADER).map(str::to_string);

        match (correlation_id, reply_to) {
            (Some(correlation_id), Some(reply_to)) => {
                debug!(
                    service = self.handler.name(),
                    %correlation_id,
                    "processing rpc request"
                );
                match self.handler.handle(&message.payload).await {
                    Ok(reply) => {
                        if let Err(error) =
                            self.publish_reply(&reply_to, &correlation_id, reply).await
                        {
                            error!(
                                service = self.handler.name(),
                                %correlation_id,
                                %error,
                                "failed to publish reply"
                            );
                        }
                    }
                    Err(error) => {
                        // No reply is sent for a failed request; the
                        // caller observes this as a timeout.
                        error!(
                            service = self.handler.name(),
                            %correlation_id,
                            %error,
                            "handler failed, suppressing reply"
                        );
                    }
                }
            }
            _ => {
                warn!(
                    service = self.handler.name(),
                    queue = %self.queue,
                    "request without correlation id or reply address, discarding"
                );
            }
        }

        // Acknowledge only after the reply has been published so a crash
        // mid-request leads to redelivery, not a lost request.
        if let Err(error) = message.ack().await {
            warn!(queue = %self.queue, %error, "failed to acknowledge request");
        }
    }

    async fn publish_reply(
        &self,
        reply_to: &str,
        correlation_id: &str,
        payload: Bytes,
    ) -> RpcResult<()> {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, correlation_id);

        self.client
            .publish_with_headers(reply_to.to_string(), headers, payload)
            .await
            .map_err(|e| RpcError::publish(format!("reply to {reply_to}: {e}")))?;
        self.client
            .flush()
            .await
            .map_err(|e| RpcError::publish(format!("flush reply to {reply_to}: {e}")))
    }
}

/// Reads a header value from a consumed request, if present.
fn header_str<'a>(message: &'a jetstream::Message, name: &str) -> Option<&'a str> {
    message.headers.as_ref()?.get(name).map(|v| v.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct EchoHandler;

    #[async_trait::async_trait]
    impl RpcHandler for EchoHandler {
        async fn handle(&self, payload: &[u8]) -> RpcResult<Bytes> {
            Ok(Bytes::copy_from_slice(payload))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn handler_round_trips_payload() {
        let reply = EchoHandler.handle(b"42").await.unwrap();
        assert_eq!(reply, Bytes::from_static(b"42"));
    }

    #[tokio::test]
    async fn redelivery_produces_identical_reply() {
        let first = EchoHandler.handle(b"BTC,ETH").await.unwrap();
        let second = EchoHandler.handle(b"BTC,ETH").await.unwrap();
        assert_eq!(first, second);
    }
}
