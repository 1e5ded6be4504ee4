//! Modular dashboard implementation
//!
//! Split into state, key handling, per-tick updates and rendering.

pub mod components;
pub mod input;
pub mod renderer;
pub mod state;
pub mod updaters;
pub mod utils;

pub use input::KeyOutcome;
pub use renderer::render_dashboard;
pub use state::DashboardState;
