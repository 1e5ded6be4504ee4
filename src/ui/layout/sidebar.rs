//! Navigation sidebar

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem};

/// Data panel a top sidebar entry opens.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum SidebarTarget {
    Monitors,
    Namespaces,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarItem {
    pub icon: Option<&'static str>,
    pub text: String,
    pub link: Option<String>,
    pub target: Option<SidebarTarget>,
    pub active: bool,
}

impl SidebarItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            icon: None,
            text: text.into(),
            link: None,
            target: None,
            active: false,
        }
    }

    pub fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn target(mut self, target: SidebarTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    fn to_list_item(&self) -> ListItem<'_> {
        let style = if self.active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut spans = Vec::new();
        if let Some(icon) = self.icon {
            spans.push(Span::raw(format!("{} ", icon)));
        }
        spans.push(Span::raw(self.text.as_str()));
        let mut lines = vec![Line::from(spans)];
        if let Some(link) = &self.link {
            lines.push(Line::from(Span::styled(
                format!("  {}", link),
                Style::default().fg(Color::DarkGray),
            )));
        }
        ListItem::new(lines).style(style)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    top: Vec<SidebarItem>,
    bottom: Vec<SidebarItem>,
}

impl Sidebar {
    pub fn new(top: Vec<SidebarItem>, bottom: Vec<SidebarItem>) -> Self {
        Self { top, bottom }
    }

    /// The dashboard's navigation: data panels on top, project links below.
    pub fn pascani() -> Self {
        Self::new(
            vec![
                SidebarItem::new("Monitors")
                    .icon("▤")
                    .target(SidebarTarget::Monitors)
                    .active(true),
                SidebarItem::new("Namespaces")
                    .icon("▥")
                    .target(SidebarTarget::Namespaces),
            ],
            vec![
                SidebarItem::new("Issue Management")
                    .icon("?")
                    .link("https://github.com/unicesi/pascani"),
                SidebarItem::new("Documentation")
                    .icon("▯")
                    .link("https://github.com/unicesi/pascani"),
            ],
        )
    }

    pub fn top(&self) -> &[SidebarItem] {
        &self.top
    }

    /// Marks the top item at `index` active and returns what it opens.
    pub fn activate(&mut self, index: usize) -> Option<SidebarTarget> {
        let target = self.top.get(index)?.target;
        for (i, item) in self.top.iter_mut().enumerate() {
            item.active = i == index;
        }
        target
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let bottom_height = self
            .bottom
            .iter()
            .map(|item| if item.link.is_some() { 2 } else { 1 })
            .sum::<u16>()
            + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(bottom_height)])
            .split(area);

        let top: Vec<ListItem> = self.top.iter().map(SidebarItem::to_list_item).collect();
        let top_block = Block::default()
            .title("[1-2] Open")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));
        f.render_widget(List::new(top).block(top_block), chunks[0]);

        let bottom: Vec<ListItem> = self.bottom.iter().map(SidebarItem::to_list_item).collect();
        let bottom_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        f.render_widget(List::new(bottom).block(bottom_block), chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitors_start_active() {
        let sidebar = Sidebar::pascani();
        assert!(sidebar.top()[0].active);
        assert!(!sidebar.top()[1].active);
        assert_eq!(sidebar.bottom.len(), 2);
        assert!(sidebar.bottom.iter().all(|item| item.link.is_some()));
    }

    #[test]
    fn test_activate_moves_active_flag() {
        let mut sidebar = Sidebar::pascani();
        assert_eq!(sidebar.activate(1), Some(SidebarTarget::Namespaces));
        assert!(!sidebar.top()[0].active);
        assert!(sidebar.top()[1].active);
        assert_eq!(sidebar.activate(5), None);
        assert!(sidebar.top()[1].active);
    }
}
