//! Live queries against an in-process database

use super::{LiveError, LiveQuery, QueryRequest, Subscription, SubscriptionSender};
use crate::database::{MemoryDatabase, Mutation, Query};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Session serving live queries straight from a [`MemoryDatabase`].
#[derive(Debug, Clone)]
pub struct LocalSession {
    db: Arc<MemoryDatabase>,
}

impl LocalSession {
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl LiveQuery for LocalSession {
    fn subscribe(&self, request: QueryRequest) -> Subscription {
        let (sender, subscription) = Subscription::channel();
        tokio::spawn(feed(
            self.db.clone(),
            request.query,
            request.changes,
            sender,
        ));
        subscription
    }

    async fn run(&self, mutation: Mutation) -> Result<Value, LiveError> {
        Ok(self.db.execute(&mutation)?)
    }
}

/// Pushes the result of `query` to `sender`, then again after every write to
/// one of its tables when `changes` is set. Returns once the subscriber is
/// gone.
pub async fn feed(
    db: Arc<MemoryDatabase>,
    query: Query,
    changes: bool,
    sender: SubscriptionSender,
) {
    // Listen before the first run so no write slips in between.
    let mut writes = db.changes();

    if !sender.send(db.run(&query).map_err(LiveError::from)).await || !changes {
        return;
    }

    let tables: Vec<String> = query.tables().into_iter().map(String::from).collect();
    loop {
        tokio::select! {
            _ = sender.cancelled() => break,
            write = writes.recv() => {
                let rerun = match write {
                    Ok(change) if tables.contains(&change.table) => {
                        log::trace!(
                            "Rerunning {} after write {} to {}",
                            query.table,
                            change.id,
                            change.table
                        );
                        true
                    }
                    Ok(_) => false,
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("Changefeed on {} lagged by {} writes", query.table, skipped);
                        true
                    }
                    Err(RecvError::Closed) => break,
                };
                if rerun && !sender.send(db.run(&query).map_err(LiveError::from)).await {
                    break;
                }
            }
        }
    }
    log::debug!("Changefeed on {} stopped", query.table);
}
