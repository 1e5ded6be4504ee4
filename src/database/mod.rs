//! Realtime document database behind the WebSocket bridge

pub mod demo;
pub mod error;
pub mod memory;
pub mod models;
pub mod query;

pub use error::DatabaseError;
pub use memory::MemoryDatabase;
pub use query::{Mutation, Query};
