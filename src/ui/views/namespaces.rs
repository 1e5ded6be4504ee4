use super::list::ModelList;
use super::variables::VariablesView;
use super::{DashboardPanel, View, ViewContext};
use crate::database::Query;
use crate::database::models::{Model, Monitor, Namespace};
use crate::live::{LiveQuery, QueryRequest};
use crate::ui::panels::{Panel, PanelControls, PanelWidth};

/// Namespaces, optionally only those of one monitor.
#[derive(Debug)]
pub struct NamespacesView {
    pub list: ModelList<Namespace>,
}

impl NamespacesView {
    pub fn new(live: &dyn LiveQuery) -> Self {
        Self::with_query(live, Query::table(Namespace::TABLE))
    }

    pub fn for_monitor(live: &dyn LiveQuery, monitor: &Monitor) -> Self {
        let query = Monitor::relation("namespaces")
            .map(|relation| relation.query_for(monitor.id()))
            .unwrap_or_else(|| Query::table(Namespace::TABLE).filter("monitorId", monitor.id()));
        Self::with_query(live, query)
    }

    fn with_query(live: &dyn LiveQuery, query: Query) -> Self {
        Self {
            list: ModelList::new(live, QueryRequest::changes(query), "◆"),
        }
    }

    pub fn panel(ctx: &ViewContext) -> DashboardPanel {
        Panel::new(
            "Namespaces",
            View::Namespaces(Self::new(ctx.live.as_ref())),
            ctx.events.clone(),
        )
    }

    /// Opens the variables of the selected namespace.
    pub fn activate(&self, ctx: &ViewContext) -> Option<DashboardPanel> {
        let namespace = self.list.selected()?;
        let view = VariablesView::new(ctx.live.as_ref(), namespace.id());
        Some(
            Panel::new(
                format!("Variables from {}", namespace.name),
                View::Variables(view),
                ctx.events.clone(),
            )
            .with_width(PanelWidth::Narrow)
            .with_controls(PanelControls::close_only()),
        )
    }
}
