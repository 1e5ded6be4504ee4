use super::list::ModelList;
use super::{DashboardPanel, View, ViewContext};
use crate::database::models::{Model, Turtle};
use crate::database::{Mutation, Query};
use crate::events::{Event, EventType};
use crate::live::{LiveQuery, QueryRequest};
use crate::logging::LogLevel;
use crate::ui::panels::Panel;
use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use serde_json::json;

/// Turtles and a form to add one.
#[derive(Debug)]
pub struct TurtlesView {
    pub list: ModelList<Turtle>,
    input: String,
    editing: bool,
}

impl TurtlesView {
    pub fn new(live: &dyn LiveQuery) -> Self {
        Self {
            list: ModelList::new(
                live,
                QueryRequest::changes(Query::table(Turtle::TABLE)),
                "•",
            ),
            input: String::new(),
            editing: false,
        }
    }

    pub fn panel(ctx: &ViewContext) -> DashboardPanel {
        Panel::new(
            "Turtles",
            View::Turtles(Self::new(ctx.live.as_ref())),
            ctx.events.clone(),
        )
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn handle_key(&mut self, code: KeyCode, ctx: &ViewContext) -> bool {
        if !self.editing {
            if code == KeyCode::Char('i') {
                self.editing = true;
                return true;
            }
            return false;
        }
        match code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.submit(ctx),
            KeyCode::Esc => self.editing = false,
            _ => return false,
        }
        true
    }

    /// Inserts a turtle named after the input, in the background, and
    /// clears the input. Blank names are ignored.
    pub fn submit(&mut self, ctx: &ViewContext) {
        let name = self.input.trim().to_string();
        self.input.clear();
        if name.is_empty() {
            return;
        }

        let live = ctx.live.clone();
        let activity = ctx.activity.clone();
        tokio::spawn(async move {
            let mutation = Mutation::insert(Turtle::TABLE, json!({ "name": name }));
            let event = match live.run(mutation).await {
                Ok(_) => Event::database(
                    format!("Added turtle {}", name),
                    EventType::Success,
                    LogLevel::Info,
                ),
                Err(e) => Event::database(
                    format!("Failed to add turtle {}: {}", name, e),
                    EventType::Error,
                    LogLevel::Error,
                ),
            };
            let _ = activity.send(event).await;
        });
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Fill(1)])
            .split(area);

        let border = if focused && self.editing {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let cursor = if focused && self.editing { "▏" } else { "" };
        let input = Paragraph::new(format!("{}{}", self.input, cursor)).block(
            Block::default()
                .title("Name [Enter] Submit")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(input, chunks[0]);
        self.list.render(f, chunks[1], focused && !self.editing);
    }
}
