//! Top application bar
//!
//! Renders the brand, caller supplied items and the "About" menu.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

pub const BRAND: &str = "PASCANI";

/// Entries of the "About" menu.
pub const ABOUT_LINKS: [(&str, &str); 2] = [
    ("PASCANI", "https://github.com/unicesi/pascani"),
    ("Amelia", "https://github.com/unicesi/amelia"),
];

#[derive(Debug, Clone, Default)]
pub struct AppBar {
    items: Vec<String>,
    about_open: bool,
}

impl AppBar {
    pub fn new(items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            about_open: false,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn toggle_about(&mut self) {
        self.about_open = !self.about_open;
    }

    pub fn is_about_open(&self) -> bool {
        self.about_open
    }

    /// Every item gets the app bar element style.
    fn element_style() -> Style {
        Style::default().fg(Color::White).bg(Color::Rgb(16, 32, 64))
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let style = Self::element_style();
        let mut spans = vec![
            Span::styled(" ☰ ", style),
            Span::styled(
                format!(" {} ", BRAND),
                style.add_modifier(Modifier::BOLD),
            ),
            Span::styled("│", style.fg(Color::Gray)),
        ];
        for item in &self.items {
            spans.push(Span::styled(format!(" {} ", item), style));
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(10)])
            .split(area);

        f.render_widget(Paragraph::new(Line::from(spans)).style(style), chunks[0]);
        let about = if self.about_open { " About ▴ " } else { " About ▾ " };
        f.render_widget(Paragraph::new(about).style(style), chunks[1]);
    }

    /// Draws the open "About" menu below the bar, right aligned in `area`.
    pub fn render_about_menu(&self, f: &mut Frame, area: Rect) {
        if !self.about_open {
            return;
        }
        let width = ABOUT_LINKS
            .iter()
            .map(|(name, url)| (name.len() + url.len() + 3) as u16)
            .max()
            .unwrap_or(0)
            + 2;
        let width = width.min(area.width);
        let height = (ABOUT_LINKS.len() as u16 + 2).min(area.height);
        let menu_area = Rect::new(area.right().saturating_sub(width), area.y, width, height);

        let items: Vec<ListItem> = ABOUT_LINKS
            .iter()
            .map(|(name, url)| {
                ListItem::new(Line::from(vec![
                    Span::styled(*name, Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" "),
                    Span::styled(*url, Style::default().fg(Color::Cyan)),
                ]))
            })
            .collect();
        f.render_widget(Clear, menu_area);
        f.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title("About")),
            menu_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_brand_and_items() {
        let bar = AppBar::new(["Ejemplo 1"]);
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("PASCANI"));
        assert!(text.contains("Ejemplo 1"));
        assert!(text.contains("About"));
    }

    #[test]
    fn test_about_menu_lists_project_links() {
        let mut bar = AppBar::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 6)).unwrap();
        terminal.draw(|f| bar.render_about_menu(f, f.area())).unwrap();
        assert!(!screen(&terminal).contains("Amelia"));

        bar.toggle_about();
        terminal.draw(|f| bar.render_about_menu(f, f.area())).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("https://github.com/unicesi/pascani"));
        assert!(text.contains("Amelia"));
    }
}
