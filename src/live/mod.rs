//! Live queries
//!
//! Panels get their data through [`LiveQuery`]: a subscription that yields
//! an initial value and then every updated result set. The session object is
//! built once at start-up and handed to whoever needs it.

use crate::consts::cli_consts::SUBSCRIPTION_BUFFER_SIZE;
use crate::database::{Mutation, Query};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};

pub mod binding;
pub mod error;
pub mod local;
pub mod protocol;
pub mod ws;

pub use binding::DataBinding;
pub use error::LiveError;
pub use local::LocalSession;
pub use ws::WsSession;

#[cfg(test)]
use mockall::automock;

/// What to observe and how.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: Query,
    /// Keep pushing result sets after the first one.
    pub changes: bool,
    /// Value reported until the first result set arrives.
    pub initial: Vec<Value>,
}

impl QueryRequest {
    /// A changefeed over `query`, empty while loading.
    pub fn changes(query: Query) -> Self {
        Self {
            query,
            changes: true,
            initial: Vec::new(),
        }
    }

    /// A single evaluation of `query`, empty while loading.
    pub fn once(query: Query) -> Self {
        Self {
            query,
            changes: false,
            initial: Vec::new(),
        }
    }
}

/// Result set pushed to a subscriber.
pub type ResultSet = Result<Vec<Value>, LiveError>;

/// Receiving end of a live query. Dropping it cancels the query.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<ResultSet>,
    _guard: DropGuard,
}

/// Producing end of a live query, held by the session serving it.
#[derive(Debug, Clone)]
pub struct SubscriptionSender {
    sender: mpsc::Sender<ResultSet>,
    cancel: CancellationToken,
}

impl Subscription {
    pub fn channel() -> (SubscriptionSender, Subscription) {
        let (sender, receiver) = mpsc::channel(SUBSCRIPTION_BUFFER_SIZE);
        let cancel = CancellationToken::new();
        (
            SubscriptionSender {
                sender,
                cancel: cancel.clone(),
            },
            Subscription {
                receiver,
                _guard: cancel.drop_guard(),
            },
        )
    }

    /// Next pending result set, without waiting.
    pub fn try_next(&mut self) -> Option<ResultSet> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next result set. `None` once the producer is gone.
    pub async fn next(&mut self) -> Option<ResultSet> {
        self.receiver.recv().await
    }
}

impl SubscriptionSender {
    /// Delivers a result set. Returns `false` once the subscriber is gone.
    pub async fn send(&self, update: ResultSet) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.sender.send(update).await.is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.sender.is_closed()
    }

    /// Resolves when the subscriber drops its [`Subscription`].
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }

    /// The subscriber's cancellation, without keeping the channel open.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Subscribe-with-changefeed and run-once access to the database.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LiveQuery: Send + Sync {
    /// Starts observing `request`. Never blocks; results arrive on the
    /// returned subscription.
    fn subscribe(&self, request: QueryRequest) -> Subscription;

    /// Applies `mutation` once.
    async fn run(&self, mutation: Mutation) -> Result<Value, LiveError>;
}
