//! Panel stack component
//!
//! Lays out the visible window of the stack left to right.

use super::super::state::DashboardState;
use super::super::utils::control_hints;
use crate::ui::panels::PanelWidth;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Flex, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub fn render_panels(f: &mut Frame, area: Rect, state: &mut DashboardState) {
    if state.stack.is_empty() {
        let hint = Paragraph::new("No panels open. Press [1] or [2] to open one.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
        f.render_widget(hint, area);
        return;
    }

    let fits = (area.width / PanelWidth::Regular.columns().max(1)).max(1);
    state.stack.set_viewport(fits as usize);

    let range = state.stack.visible_range();
    let active = state.stack.active_index();
    let constraints: Vec<Constraint> = state.stack.panels()[range.clone()]
        .iter()
        .map(|panel| panel.width().constraint(panel.is_expanded()))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .flex(Flex::Start)
        .split(area);

    let scrolled = (range.start > 0, range.end < state.stack.len());
    for ((index, panel), chunk) in state
        .stack
        .panels_mut()
        .enumerate()
        .skip(range.start)
        .take(range.len())
        .zip(chunks.iter())
    {
        let focused = active == Some(index);
        let (border_type, border_color) = if focused {
            (BorderType::Thick, Color::Cyan)
        } else if panel.is_floating() {
            (BorderType::Double, Color::Gray)
        } else {
            (BorderType::Rounded, Color::DarkGray)
        };

        let mut title = vec![Span::styled(
            format!(" {} ", panel.title()),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if index == range.start && scrolled.0 {
            title.insert(0, Span::raw("◀"));
        }
        if index + 1 == range.end && scrolled.1 {
            title.push(Span::raw("▶"));
        }

        let block = Block::default()
            .title(Line::from(title))
            .title_top(Line::from(control_hints(panel)).right_aligned())
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(*chunk);
        f.render_widget(block, *chunk);
        panel.content_mut().render(f, inner, focused);
    }
}
