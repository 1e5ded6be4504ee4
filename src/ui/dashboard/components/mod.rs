//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod footer;
pub mod logs;
pub mod panels;
