//! Messages exchanged on the `/db` WebSocket
//!
//! Every request carries a client chosen token; every answer echoes it.

use crate::database::{Mutation, Query};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Run `query` now and, with `changes`, again after every relevant write.
    Subscribe {
        token: u64,
        query: Query,
        #[serde(default)]
        changes: bool,
    },
    /// Apply a mutation once.
    Run { token: u64, mutation: Mutation },
    /// Stop the subscription opened with `token`.
    Stop { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full result set of a subscription.
    Result { token: u64, rows: Vec<Value> },
    /// Outcome of a mutation.
    Done { token: u64, value: Value },
    Error { token: u64, message: String },
    /// A subscription finished on its own. No more result sets follow.
    End { token: u64 },
}

impl ServerMessage {
    pub fn token(&self) -> u64 {
        match self {
            ServerMessage::Result { token, .. }
            | ServerMessage::Done { token, .. }
            | ServerMessage::Error { token, .. }
            | ServerMessage::End { token } => *token,
        }
    }
}
