use super::chart::ChartView;
use crate::database::Query;
use crate::database::models::{Model, Value, Variable};
use crate::live::{DataBinding, LiveQuery, QueryRequest};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Paragraph;

/// Samples of one variable, charted over time.
#[derive(Debug)]
pub struct VariableView {
    variable: String,
    values: DataBinding<Value>,
    chart: ChartView,
}

/// Samples of `variable` that still belong to an existing variable, oldest first.
pub fn values_query(variable: &str) -> Query {
    Query::table(Value::TABLE)
        .eq_join("variable", Variable::TABLE)
        .filter("variable", variable)
        .order_by("timestamp")
}

impl VariableView {
    pub fn new(live: &dyn LiveQuery, variable: &str) -> Self {
        Self {
            variable: variable.to_string(),
            values: DataBinding::new(live, QueryRequest::once(values_query(variable))),
            chart: ChartView::mount(format!("chart-{}", variable)),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn chart(&self) -> &ChartView {
        &self.chart
    }

    pub fn poll(&mut self) -> bool {
        let changed = self.values.poll();
        if changed {
            self.chart
                .set_points(self.values.value().iter().filter_map(Value::point));
        }
        changed
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let hint = match self.values.error() {
            Some(error) => Some((error.to_string(), Color::Red)),
            None if self.values.is_loading() => Some(("Loading...".to_string(), Color::DarkGray)),
            None if self.chart.points().is_empty() => {
                Some(("No samples".to_string(), Color::DarkGray))
            }
            None => None,
        };
        match hint {
            Some((text, color)) => {
                f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
            }
            None => self.chart.render(f, area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDatabase;
    use crate::live::LocalSession;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_chart_gets_ordered_points_of_the_variable() {
        let db = MemoryDatabase::default();
        for table in ["variables", "values"] {
            db.table_create(table);
        }
        db.insert("variables", json!({"id": "cpu", "name": "cpu"}))
            .unwrap();
        for row in [
            json!({"timestamp": 3000.0, "value": 0.7, "variable": "cpu"}),
            json!({"timestamp": 1000.0, "value": 0.2, "variable": "cpu"}),
            json!({"timestamp": 2000.0, "value": 0.5, "variable": "mem"}),
            json!({"timestamp": 2000.0, "value": "n/a", "variable": "cpu"}),
        ] {
            db.insert("values", row).unwrap();
        }

        let session = LocalSession::new(Arc::new(db));
        let mut view = VariableView::new(&session, "cpu");
        tokio::time::timeout(Duration::from_secs(2), async {
            while !view.poll() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(view.chart().points(), &[(1000.0, 0.2), (3000.0, 0.7)]);
    }
}
