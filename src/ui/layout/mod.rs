//! Page chrome around the panel stack

pub mod app_bar;
pub mod sidebar;

pub use app_bar::AppBar;
pub use sidebar::{Sidebar, SidebarTarget};
