//! Error handling for live queries

use crate::database::DatabaseError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum LiveError {
    /// The WebSocket connection failed or was interrupted.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// The in-process database rejected the request.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// The server answered a request with an error.
    #[error("Server error: {0}")]
    Server(String),

    /// The peer sent something that is not a valid message.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The session went away before the request completed.
    #[error("Session closed")]
    Closed,
}
