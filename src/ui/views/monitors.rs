use super::list::ModelList;
use super::namespaces::NamespacesView;
use super::{DashboardPanel, View, ViewContext};
use crate::database::Query;
use crate::database::models::{Model, Monitor};
use crate::live::{LiveQuery, QueryRequest};
use crate::ui::panels::{Panel, PanelWidth};

/// Every monitor, live.
#[derive(Debug)]
pub struct MonitorsView {
    pub list: ModelList<Monitor>,
}

impl MonitorsView {
    pub fn new(live: &dyn LiveQuery) -> Self {
        Self {
            list: ModelList::new(
                live,
                QueryRequest::changes(Query::table(Monitor::TABLE)),
                "▣",
            ),
        }
    }

    pub fn panel(ctx: &ViewContext) -> DashboardPanel {
        Panel::new(
            "Monitors",
            View::Monitors(Self::new(ctx.live.as_ref())),
            ctx.events.clone(),
        )
    }

    /// Opens the namespaces of the selected monitor.
    pub fn activate(&self, ctx: &ViewContext) -> Option<DashboardPanel> {
        let monitor = self.list.selected()?;
        let view = NamespacesView::for_monitor(ctx.live.as_ref(), monitor);
        Some(
            Panel::new(
                format!("Namespaces of {}", monitor.name),
                View::Namespaces(view),
                ctx.events.clone(),
            )
            .with_width(PanelWidth::Wide),
        )
    }
}
