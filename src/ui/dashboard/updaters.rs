//! Dashboard state update logic
//!
//! Drains queued activity events, applies live query results and settles the
//! panel stack once per tick.

use super::state::DashboardState;

use crate::events::Event as ActivityEvent;
use crate::ui::layout::SidebarTarget;
use crate::ui::views::{DashboardPanel, MonitorsView, NamespacesView};

impl DashboardState {
    /// Advance one tick.
    pub fn update(&mut self) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event);
        }

        for panel in self.stack.panels_mut() {
            panel.content_mut().poll();
        }

        self.settle();
    }

    /// Applies everything panels reported since the last call.
    pub fn settle(&mut self) {
        let handled = self.stack.process_events();
        if handled > 0 {
            log::debug!(
                "Applied {} panel events, active panel {:?}",
                handled,
                self.stack.active_id()
            );
        }
    }

    /// Opens the data panel behind the top sidebar entry at `index`.
    pub fn open_sidebar(&mut self, index: usize) -> bool {
        let Some(target) = self.sidebar.activate(index) else {
            return false;
        };
        let panel = match target {
            SidebarTarget::Monitors => MonitorsView::panel(&self.ctx),
            SidebarTarget::Namespaces => NamespacesView::panel(&self.ctx),
        };
        self.open(panel);
        true
    }

    /// Pushes `panel` and records it in the activity log.
    pub fn open(&mut self, panel: DashboardPanel) {
        let title = panel.title().to_string();
        let id = self.stack.push(panel);
        self.add_to_activity_log(ActivityEvent::panels(format!(
            "Opened {} ({})",
            title, id
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dashboard::state::HOME_PANEL_ID;

    fn dashboard() -> DashboardState {
        DashboardState::local_for_tests()
    }

    #[tokio::test]
    async fn test_starts_with_turtles_panel() {
        let state = dashboard();
        assert_eq!(state.stack.len(), 1);
        assert_eq!(state.stack.panels()[0].title(), "Turtles");
        assert_eq!(
            state.stack.active_id().map(|id| id.as_str()),
            Some(HOME_PANEL_ID)
        );
    }

    #[tokio::test]
    async fn test_sidebar_opens_data_panels() {
        let mut state = dashboard();
        assert!(state.open_sidebar(1));
        assert!(state.open_sidebar(0));
        assert!(!state.open_sidebar(7));

        let titles: Vec<&str> = state.stack.panels().iter().map(|p| p.title()).collect();
        assert_eq!(titles, ["Turtles", "Namespaces", "Monitors"]);
        assert_eq!(state.stack.active_index(), Some(2));
        assert!(state.sidebar.top()[0].active);
        assert_eq!(state.activity_logs.len(), 2);
    }

    #[tokio::test]
    async fn test_update_moves_pending_events_to_log() {
        let mut state = dashboard();
        state.add_event(ActivityEvent::panels("one".into()));
        state.add_event(ActivityEvent::panels("two".into()));
        state.update();
        assert!(state.pending_events.is_empty());
        assert_eq!(state.activity_logs.len(), 2);
        assert_eq!(state.tick, 1);
    }
}
