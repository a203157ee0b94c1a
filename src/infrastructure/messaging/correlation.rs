//! # Correlation Store
//!
//! Tracks in-flight RPC requests by correlation id and resolves each to
//! its matching reply.
//!
//! The store accepts exactly one reply per correlation id: resolving an id
//! removes it, so a duplicate or late reply for the same id is discarded,
//! as is any reply whose id was never registered. A [`PendingReply`]
//! deregisters its id when dropped, so an abandoned or timed-out call
//! cannot leak an entry or match a stale reply later.
//!
//! # Examples
//!
//! ```
//! use ranked_prices::domain::value_objects::CorrelationId;
//! use ranked_prices::infrastructure::messaging::correlation::CorrelationStore;
//!
//! let store = CorrelationStore::new();
//! let id = CorrelationId::new_v4();
//! let pending = store.register(id);
//!
//! assert!(store.resolve(id, "reply".into()));
//! // Second reply with the same id is a no-op.
//! assert!(!store.resolve(id, "again".into()));
//! # drop(pending);
//! ```

use crate::domain::value_objects::CorrelationId;
use crate::infrastructure::messaging::error::{RpcError, RpcResult};
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Concurrent map from in-flight correlation ids to reply channels.
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct CorrelationStore {
    inner: Arc<DashMap<CorrelationId, oneshot::Sender<Bytes>>>,
}

impl CorrelationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a correlation id and returns the handle to await its reply.
    ///
    /// The id stays registered until it is resolved or the returned
    /// [`PendingReply`] is dropped.
    #[must_use]
    pub fn register(&self, id: CorrelationId) -> PendingReply {
        let (tx, rx) = oneshot::channel();
        self.inner.insert(id, tx);
        PendingReply {
            id,
            rx,
            store: self.clone(),
        }
    }

    /// Delivers a reply payload to the caller awaiting `id`.
    ///
    /// Returns true if the reply was accepted. Returns false for an
    /// unknown or already-resolved id, or when the awaiting caller has
    /// already given up; the payload is dropped in those cases.
    pub fn resolve(&self, id: CorrelationId, payload: Bytes) -> bool {
        match self.inner.remove(&id) {
            Some((_, tx)) => tx.send(payload).is_ok(),
            None => false,
        }
    }

    /// Removes a correlation id without delivering a reply.
    pub fn forget(&self, id: CorrelationId) {
        self.inner.remove(&id);
    }

    /// Returns the number of requests currently awaiting replies.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner.len()
    }
}

/// Handle to one registered request, used to await its reply.
///
/// Dropping the handle deregisters the correlation id, discarding any
/// reply that arrives afterwards.
#[derive(Debug)]
pub struct PendingReply {
    id: CorrelationId,
    rx: oneshot::Receiver<Bytes>,
    store: CorrelationStore,
}

impl PendingReply {
    /// Returns the correlation id this handle is waiting on.
    #[must_use]
    pub fn correlation_id(&self) -> CorrelationId {
        self.id
    }

    /// Suspends until the matching reply arrives or the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Timeout`] if no reply arrived within `timeout`,
    /// or [`RpcError::Cancelled`] if the store side of the channel was
    /// torn down before a reply could be delivered.
    pub async fn wait(mut self, timeout: Duration) -> RpcResult<Bytes> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(_)) => Err(RpcError::cancelled(format!(
                "reply channel for {} closed",
                self.id
            ))),
            Err(_) => Err(RpcError::timeout_with_duration(
                format!("no reply for {} within deadline", self.id),
                timeout.as_millis() as u64,
            )),
        }
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.store.forget(self.id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reply_reaches_registered_caller() {
        let store = CorrelationStore::new();
        let id = CorrelationId::new_v4();
        let pending = store.register(id);

        assert!(store.resolve(id, Bytes::from_static(b"BTC,ETH")));

        let payload = pending.wait(Duration::from_secs(1)).await.unwrap();
        assert_eq!(payload, Bytes::from_static(b"BTC,ETH"));
        assert_eq!(store.in_flight(), 0);
    }

    #[tokio::test]
    async fn foreign_id_is_discarded() {
        let store = CorrelationStore::new();
        let pending = store.register(CorrelationId::new_v4());

        assert!(!store.resolve(CorrelationId::new_v4(), Bytes::from_static(b"stale")));
        assert_eq!(store.in_flight(), 1);
        drop(pending);
    }

    #[tokio::test]
    async fn duplicate_reply_is_discarded() {
        let store = CorrelationStore::new();
        let id = CorrelationId::new_v4();
        let pending = store.register(id);

        assert!(store.resolve(id, Bytes::from_static(b"first")));
        assert!(!store.resolve(id, Bytes::from_static(b"second")));

        // Only the first reply is honored.
        let payload = pending.wait(Duration::from_secs(1)).await.unwrap();
        assert_eq!(payload, Bytes::from_static(b"first"));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_without_reply() {
        let store = CorrelationStore::new();
        let pending = store.register(CorrelationId::new_v4());

        let error = pending.wait(Duration::from_millis(250)).await.unwrap_err();
        assert!(error.is_timeout());
        assert_eq!(error.timeout_ms(), Some(250));
        // The timed-out entry is gone; a late reply would be a no-op.
        assert_eq!(store.in_flight(), 0);
    }

    #[tokio::test]
    async fn dropped_handle_deregisters_id() {
        let store = CorrelationStore::new();
        let id = CorrelationId::new_v4();
        let pending = store.register(id);
        assert_eq!(store.in_flight(), 1);

        drop(pending);
        assert_eq!(store.in_flight(), 0);
        assert!(!store.resolve(id, Bytes::from_static(b"late")));
    }
}
