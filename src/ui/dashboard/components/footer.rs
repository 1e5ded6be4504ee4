//! Dashboard footer component
//!
//! Renders key hints, the data source and uptime

use super::super::state::DashboardState;
use super::super::utils::format_uptime;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Hints while a text input has the keyboard.
pub const EDITING_HINTS: &str = "[Enter] Submit | [Backspace] Delete | [Esc] Done";

/// Key hints for the current state of the dashboard.
pub fn key_hints(state: &DashboardState) -> String {
    let editing = state
        .stack
        .active()
        .is_some_and(|panel| panel.content().is_editing());
    if editing {
        return EDITING_HINTS.to_string();
    }
    format!(
        "[Q] Quit | [Tab] Focus | [↑↓] Select | [Enter] Open | [1-{}] Sidebar | [A] About",
        state.sidebar.top().len()
    )
}

/// Render footer.
pub fn render_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let footer_text = format!(
        "{} | {} | up {}",
        key_hints(state),
        state.target,
        format_uptime(state.start_time.elapsed())
    );

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[tokio::test]
    async fn test_hints_follow_the_turtles_input() {
        let mut state = DashboardState::local_for_tests();
        assert!(key_hints(&state).contains("[1-2] Sidebar"));

        state.handle_key(KeyCode::Char('i'));
        assert_eq!(key_hints(&state), EDITING_HINTS);

        state.handle_key(KeyCode::Esc);
        assert!(key_hints(&state).starts_with("[Q] Quit"));
    }
}
