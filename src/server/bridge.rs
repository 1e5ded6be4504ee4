//! The `/db` WebSocket bridge
//!
//! Each connection gets a reader loop and a writer task. Subscriptions run
//! [`feed`] against the shared database and forward result sets, tagged with
//! the client's token, to the writer.

use super::AppState;
use crate::database::{Mutation, Query};
use crate::live::local::feed;
use crate::live::protocol::{ClientMessage, ServerMessage};
use crate::live::Subscription;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Tables a client may touch. `None` lets everything through.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    tables: Option<Vec<String>>,
}

impl AllowList {
    pub fn any() -> Self {
        Self { tables: None }
    }

    pub fn only(tables: Vec<String>) -> Self {
        Self {
            tables: Some(tables),
        }
    }

    pub fn allows(&self, table: &str) -> bool {
        self.tables
            .as_ref()
            .is_none_or(|tables| tables.iter().any(|t| t == table))
    }

    fn check_query(&self, query: &Query) -> Result<(), String> {
        match query.tables().into_iter().find(|t| !self.allows(t)) {
            Some(table) => Err(format!("Query on table `{}` is not allowed", table)),
            None => Ok(()),
        }
    }

    fn check_mutation(&self, mutation: &Mutation) -> Result<(), String> {
        if self.allows(mutation.table()) {
            Ok(())
        } else {
            Err(format!(
                "Mutation on table `{}` is not allowed",
                mutation.table()
            ))
        }
    }
}

pub async fn connection(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (outgoing, mut queue) = mpsc::unbounded_channel::<ServerMessage>();

    let writer = tokio::spawn(async move {
        while let Some(message) = queue.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    log::error!("Failed to encode bridge message: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let connection = CancellationToken::new();
    let mut subscriptions: HashMap<u64, CancellationToken> = HashMap::new();
    log::info!("Bridge client connected");

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                log::warn!("Bridge connection failed: {}", e);
                break;
            }
        };
        let message = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Ignoring malformed client message: {}", e);
                continue;
            }
        };

        match message {
            ClientMessage::Subscribe {
                token,
                query,
                changes,
            } => {
                if let Err(message) = state.allow.check_query(&query) {
                    log::warn!("{}", message);
                    let _ = outgoing.send(ServerMessage::Error { token, message });
                    continue;
                }
                let cancel = connection.child_token();
                if let Some(previous) = subscriptions.insert(token, cancel.clone()) {
                    previous.cancel();
                }
                let (sender, subscription) = Subscription::channel();
                tokio::spawn(feed(state.db.clone(), query, changes, sender));
                tokio::spawn(forward(token, subscription, outgoing.clone(), cancel));
            }
            ClientMessage::Run { token, mutation } => {
                let answer = match state.allow.check_mutation(&mutation) {
                    Ok(()) => match state.db.execute(&mutation) {
                        Ok(value) => ServerMessage::Done { token, value },
                        Err(e) => ServerMessage::Error {
                            token,
                            message: e.to_string(),
                        },
                    },
                    Err(message) => {
                        log::warn!("{}", message);
                        ServerMessage::Error { token, message }
                    }
                };
                let _ = outgoing.send(answer);
            }
            ClientMessage::Stop { token } => {
                if let Some(cancel) = subscriptions.remove(&token) {
                    cancel.cancel();
                }
            }
        }
    }

    connection.cancel();
    drop(outgoing);
    let _ = writer.await;
    log::info!("Bridge client disconnected");
}

/// Relays result sets of one subscription until it ends or is stopped.
/// A subscription that ends on its own is closed with [`ServerMessage::End`].
async fn forward(
    token: u64,
    mut subscription: Subscription,
    outgoing: mpsc::UnboundedSender<ServerMessage>,
    cancel: CancellationToken,
) {
    loop {
        let update = tokio::select! {
            _ = cancel.cancelled() => break,
            update = subscription.next() => update,
        };
        let message = match update {
            Some(Ok(rows)) => ServerMessage::Result { token, rows },
            Some(Err(e)) => ServerMessage::Error {
                token,
                message: e.to_string(),
            },
            None => {
                let _ = outgoing.send(ServerMessage::End { token });
                break;
            }
        };
        if outgoing.send(message).is_err() {
            break;
        }
    }
}
