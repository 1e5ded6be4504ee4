//! Error handling for the database module

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The query or mutation names a table that was never created.
    #[error("Table `{0}` does not exist")]
    UnknownTable(String),

    /// The document cannot be stored as given.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}
