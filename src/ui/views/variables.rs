use super::list::ModelList;
use super::variable::VariableView;
use super::{DashboardPanel, View, ViewContext};
use crate::database::Query;
use crate::database::models::{Model, Variable};
use crate::live::{LiveQuery, QueryRequest};
use crate::consts::cli_consts::ui::CHART_PANEL_COLUMNS;
use crate::ui::panels::{Panel, PanelWidth};

/// Variables of one namespace.
#[derive(Debug)]
pub struct VariablesView {
    pub list: ModelList<Variable>,
}

impl VariablesView {
    pub fn new(live: &dyn LiveQuery, namespace: &str) -> Self {
        let query = Query::table(Variable::TABLE).filter("namespace", namespace);
        Self {
            list: ModelList::new(live, QueryRequest::changes(query), "◇"),
        }
    }

    /// Opens the chart of the selected variable.
    pub fn activate(&self, ctx: &ViewContext) -> Option<DashboardPanel> {
        let variable = self.list.selected()?;
        let view = VariableView::new(ctx.live.as_ref(), variable.id());
        Some(
            Panel::new(
                format!("Data from {}", variable.name),
                View::Variable(view),
                ctx.events.clone(),
            )
            .with_width(PanelWidth::Columns(CHART_PANEL_COLUMNS))
            .floating(true),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDatabase;
    use crate::live::LocalSession;
    use crate::ui::panels::PanelEvents;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_selected_variable_opens_floating_chart() {
        let db = Arc::new(MemoryDatabase::default());
        for table in ["variables", "values"] {
            db.table_create(table);
        }
        db.insert("variables", json!({"id": "cpu", "name": "cpu", "namespace": "host"}))
            .unwrap();
        db.insert("variables", json!({"id": "mem", "name": "mem", "namespace": "other"}))
            .unwrap();

        let (events, _) = PanelEvents::channel();
        let (activity, _) = mpsc::channel(8);
        let ctx = ViewContext {
            live: Arc::new(LocalSession::new(db)),
            events,
            activity,
        };
        let mut view = VariablesView::new(ctx.live.as_ref(), "host");
        tokio::time::timeout(Duration::from_secs(2), async {
            while !view.list.poll() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(view.list.items().len(), 1);

        let panel = view.activate(&ctx).unwrap();
        assert_eq!(panel.title(), "Data from cpu");
        assert_eq!(panel.width(), PanelWidth::Columns(CHART_PANEL_COLUMNS));
        assert!(panel.is_floating());
    }
}
