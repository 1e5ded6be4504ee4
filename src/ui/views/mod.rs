//! Data panels
//!
//! Every view binds one live query and renders it. Selecting an item may
//! produce a child panel, which the dashboard pushes on the stack.

pub mod chart;
pub mod list;
pub mod monitors;
pub mod namespaces;
pub mod turtles;
pub mod variable;
pub mod variables;

use crate::events::Event as ActivityEvent;
use crate::live::LiveQuery;
use crate::ui::panels::{Panel, PanelEvents};
use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::Rect;
use std::sync::Arc;
use tokio::sync::mpsc;

pub use monitors::MonitorsView;
pub use namespaces::NamespacesView;
pub use turtles::TurtlesView;
pub use variable::VariableView;
pub use variables::VariablesView;

/// A panel of the dashboard.
pub type DashboardPanel = Panel<View>;

/// What views need from the dashboard to open panels and issue writes.
#[derive(Clone)]
pub struct ViewContext {
    pub live: Arc<dyn LiveQuery>,
    pub events: PanelEvents,
    pub activity: mpsc::Sender<ActivityEvent>,
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext").finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum View {
    Monitors(MonitorsView),
    Namespaces(NamespacesView),
    Variables(VariablesView),
    Variable(VariableView),
    Turtles(TurtlesView),
}

impl View {
    /// Applies pending live query results. Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        match self {
            View::Monitors(view) => view.list.poll(),
            View::Namespaces(view) => view.list.poll(),
            View::Variables(view) => view.list.poll(),
            View::Variable(view) => view.poll(),
            View::Turtles(view) => view.list.poll(),
        }
    }

    pub fn select_next(&mut self) {
        match self {
            View::Monitors(view) => view.list.select_next(),
            View::Namespaces(view) => view.list.select_next(),
            View::Variables(view) => view.list.select_next(),
            View::Variable(_) => {}
            View::Turtles(view) => view.list.select_next(),
        }
    }

    pub fn select_previous(&mut self) {
        match self {
            View::Monitors(view) => view.list.select_previous(),
            View::Namespaces(view) => view.list.select_previous(),
            View::Variables(view) => view.list.select_previous(),
            View::Variable(_) => {}
            View::Turtles(view) => view.list.select_previous(),
        }
    }

    /// Acts on the selected item. May return a panel to push.
    pub fn activate(&mut self, ctx: &ViewContext) -> Option<DashboardPanel> {
        match self {
            View::Monitors(view) => view.activate(ctx),
            View::Namespaces(view) => view.activate(ctx),
            View::Variables(view) => view.activate(ctx),
            View::Variable(_) => None,
            View::Turtles(view) => {
                view.submit(ctx);
                None
            }
        }
    }

    /// Whether the view currently captures typed characters.
    pub fn is_editing(&self) -> bool {
        matches!(self, View::Turtles(view) if view.is_editing())
    }

    /// Offers a key to the view. Returns whether it was consumed.
    pub fn handle_key(&mut self, code: KeyCode, ctx: &ViewContext) -> bool {
        match self {
            View::Turtles(view) => view.handle_key(code, ctx),
            _ => false,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool) {
        match self {
            View::Monitors(view) => view.list.render(f, area, focused),
            View::Namespaces(view) => view.list.render(f, area, focused),
            View::Variables(view) => view.list.render(f, area, focused),
            View::Variable(view) => view.render(f, area),
            View::Turtles(view) => view.render(f, area, focused),
        }
    }
}
