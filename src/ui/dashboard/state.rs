//! Dashboard state management
//!
//! Contains the main dashboard state struct: the panel stack, the page chrome
//! and the activity log.

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::events::Event as ActivityEvent;
use crate::live::LiveQuery;
use crate::ui::app::UIConfig;
use crate::ui::layout::{AppBar, Sidebar};
use crate::ui::panels::PanelStack;
use crate::ui::views::{TurtlesView, View, ViewContext};

/// Identifier of the panel the dashboard opens with.
pub const HOME_PANEL_ID: &str = "home";

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

pub struct DashboardState {
    /// Open panels, left to right.
    pub stack: PanelStack<View>,
    pub sidebar: Sidebar,
    pub app_bar: AppBar,
    /// Handed to views so they can open panels and issue writes.
    pub ctx: ViewContext,
    /// Where the data comes from, shown in the footer.
    pub target: String,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<ActivityEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<ActivityEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
}

impl std::fmt::Debug for DashboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardState")
            .field("panels", &self.stack.len())
            .field("target", &self.target)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl DashboardState {
    /// Creates the dashboard with a single Turtles panel open.
    pub fn new(
        live: Arc<dyn LiveQuery>,
        activity: mpsc::Sender<ActivityEvent>,
        start_time: Instant,
        ui_config: UIConfig,
    ) -> Self {
        let stack = PanelStack::new();
        let ctx = ViewContext {
            live,
            events: stack.events(),
            activity,
        };
        let mut state = Self {
            stack,
            sidebar: Sidebar::pascani(),
            app_bar: AppBar::new([ui_config.target.as_str()]),
            ctx,
            target: ui_config.target,
            start_time,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
        };
        state
            .stack
            .push(TurtlesView::panel(&state.ctx).with_id(HOME_PANEL_ID));
        state
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: ActivityEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: ActivityEvent) {
        self.pending_events.push_back(event);
    }
}

#[cfg(test)]
impl DashboardState {
    /// A dashboard over an empty in-memory database with every model table.
    pub(crate) fn local_for_tests() -> Self {
        use crate::database::MemoryDatabase;
        use crate::live::LocalSession;

        let db = Arc::new(MemoryDatabase::default());
        for table in ["monitors", "namespaces", "variables", "values", "turtles"] {
            db.table_create(table);
        }
        let (activity, _) = mpsc::channel(8);
        Self::new(
            Arc::new(LocalSession::new(db)),
            activity,
            Instant::now(),
            UIConfig::new(false, "local"),
        )
    }
}
