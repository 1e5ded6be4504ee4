// Module declarations
mod app;
pub mod dashboard;
pub mod layout;
pub mod panels;
pub mod splash;
pub mod views;
// Re-exports for external use
pub use app::{App, UIConfig, run};
