//! Panels and the panel stack
//!
//! The stack is the only place that mutates the set of open panels; panels
//! send their intents through [`PanelEvents`].

pub mod id;
pub mod panel;
pub mod stack;

pub use panel::{Panel, PanelControls, PanelEvents, PanelWidth};
pub use stack::PanelStack;
