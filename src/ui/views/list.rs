//! Selectable list over a live query

use crate::database::models::Model;
use crate::live::{DataBinding, LiveQuery, QueryRequest};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

#[derive(Debug)]
pub struct ModelList<T> {
    binding: DataBinding<T>,
    state: ListState,
    icon: &'static str,
}

impl<T: Model> ModelList<T> {
    pub fn new(live: &dyn LiveQuery, request: QueryRequest, icon: &'static str) -> Self {
        Self {
            binding: DataBinding::new(live, request),
            state: ListState::default(),
            icon,
        }
    }

    /// Pulls pending result sets and keeps the selection inside the list.
    pub fn poll(&mut self) -> bool {
        let changed = self.binding.poll();
        if changed {
            let len = self.binding.value().len();
            match self.state.selected() {
                _ if len == 0 => self.state.select(None),
                Some(i) if i >= len => self.state.select(Some(len - 1)),
                None => self.state.select(Some(0)),
                Some(_) => {}
            }
        }
        changed
    }

    pub fn items(&self) -> &[T] {
        self.binding.value()
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items().get(i))
    }

    pub fn select_next(&mut self) {
        let len = self.items().len();
        if len > 0 {
            let next = self.state.selected().map_or(0, |i| (i + 1).min(len - 1));
            self.state.select(Some(next));
        }
    }

    pub fn select_previous(&mut self) {
        if !self.items().is_empty() {
            let previous = self.state.selected().map_or(0, |i| i.saturating_sub(1));
            self.state.select(Some(previous));
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool) {
        if let Some(error) = self.binding.error() {
            if self.items().is_empty() {
                let text = Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red));
                f.render_widget(text, area);
                return;
            }
        }
        if self.items().is_empty() {
            let hint = if self.binding.is_loading() {
                "Loading..."
            } else {
                "Nothing here yet"
            };
            let text = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
            f.render_widget(text, area);
            return;
        }

        let items: Vec<ListItem> = self
            .items()
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", self.icon), Style::default().fg(Color::Cyan)),
                    Span::raw(item.name().to_string()),
                ]))
            })
            .collect();

        let highlight = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let list = List::new(items).highlight_style(highlight);
        f.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Query;
    use crate::database::models::Monitor;
    use crate::live::{MockLiveQuery, Subscription};
    use serde_json::json;

    #[tokio::test]
    async fn test_selection_follows_result_sets() {
        let (sender, subscription) = Subscription::channel();
        let mut live = MockLiveQuery::new();
        live.expect_subscribe().return_once(move |_| subscription);

        let mut list: ModelList<Monitor> =
            ModelList::new(&live, QueryRequest::changes(Query::table("monitors")), "#");
        assert!(list.selected().is_none());

        sender
            .send(Ok(vec![
                json!({"id": "a", "name": "alpha"}),
                json!({"id": "b", "name": "beta"}),
            ]))
            .await;
        assert!(list.poll());
        assert_eq!(list.selected().unwrap().id, "a");

        list.select_next();
        list.select_next();
        assert_eq!(list.selected().unwrap().id, "b");

        sender.send(Ok(vec![json!({"id": "a", "name": "alpha"})])).await;
        list.poll();
        assert_eq!(list.selected().unwrap().id, "a");

        list.select_previous();
        assert_eq!(list.selected().unwrap().id, "a");

        sender.send(Ok(vec![])).await;
        list.poll();
        assert!(list.selected().is_none());
    }
}
