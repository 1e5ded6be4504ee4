//! A single dismissible, expandable panel
//!
//! Panels never touch their siblings. Everything that concerns the stack is
//! reported to the owner as a [`PanelEvent`] on the channel handed over at
//! construction.

use super::id::PanelId;
use ratatui::layout::Constraint;
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc;

/// Intents and lifecycle notifications a panel reports to its owner.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum PanelEvent {
    /// The panel is about to become visible.
    BeforeOpen,
    /// The panel is being torn down.
    BeforeClose,
    /// The user asked to dismiss the panel.
    Close,
    /// The panel expanded and claims the active state.
    Expand,
    /// The panel collapsed and claims the active state.
    Collapse,
    /// The panel wants to become the active one.
    ClaimActive,
}

/// An event tagged with the panel that emitted it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PanelMessage {
    pub panel: PanelId,
    pub event: PanelEvent,
}

/// Handle panels use to talk to their owner.
#[derive(Debug, Clone)]
pub struct PanelEvents {
    sender: mpsc::UnboundedSender<PanelMessage>,
}

impl PanelEvents {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PanelMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn emit(&self, panel: &PanelId, event: PanelEvent) {
        // The owner may already be gone during shutdown.
        let _ = self.sender.send(PanelMessage {
            panel: panel.clone(),
            event,
        });
    }
}

/// Horizontal size class of a panel.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PanelWidth {
    Narrow,
    #[default]
    Regular,
    Wide,
    /// Fixed number of terminal columns.
    Columns(u16),
}

impl Display for PanelWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelWidth::Narrow => write!(f, "narrow"),
            PanelWidth::Regular => write!(f, "regular"),
            PanelWidth::Wide => write!(f, "wide"),
            PanelWidth::Columns(columns) => write!(f, "{}", columns),
        }
    }
}

impl PanelWidth {
    /// Layout constraint for a panel of this width.
    pub fn constraint(&self, expanded: bool) -> Constraint {
        if expanded {
            return Constraint::Fill(1);
        }
        match self {
            PanelWidth::Narrow => Constraint::Length(28),
            PanelWidth::Regular => Constraint::Length(42),
            PanelWidth::Wide => Constraint::Length(64),
            PanelWidth::Columns(columns) => Constraint::Length(*columns),
        }
    }

    /// Width in columns used when deciding how many panels fit on screen.
    pub fn columns(&self) -> u16 {
        match self.constraint(false) {
            Constraint::Length(columns) => columns,
            _ => 0,
        }
    }
}

/// Expansion status of a panel.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, strum::Display)]
pub enum Expansion {
    #[default]
    Collapsed,
    Expanded,
}

/// Which buttons a panel offers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PanelControls {
    pub close: bool,
    pub expand: bool,
    pub collapse: bool,
}

impl Default for PanelControls {
    fn default() -> Self {
        Self {
            close: true,
            expand: true,
            collapse: true,
        }
    }
}

impl PanelControls {
    /// Only the close button, for panels that never change size.
    pub fn close_only() -> Self {
        Self {
            close: true,
            expand: false,
            collapse: false,
        }
    }
}

/// A panel holding caller owned content `C`.
#[derive(Debug)]
pub struct Panel<C> {
    id: Option<PanelId>,
    title: String,
    width: PanelWidth,
    floating: bool,
    controls: PanelControls,
    expansion: Expansion,
    opened: bool,
    events: PanelEvents,
    content: C,
}

impl<C> Panel<C> {
    pub fn new(title: impl Into<String>, content: C, events: PanelEvents) -> Self {
        Self {
            id: None,
            title: title.into(),
            width: PanelWidth::default(),
            floating: false,
            controls: PanelControls::default(),
            expansion: Expansion::default(),
            opened: false,
            events,
            content,
        }
    }

    pub fn with_id(mut self, id: impl Into<PanelId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_width(mut self, width: PanelWidth) -> Self {
        self.width = width;
        self
    }

    pub fn floating(mut self, floating: bool) -> Self {
        self.floating = floating;
        self
    }

    pub fn with_controls(mut self, controls: PanelControls) -> Self {
        self.controls = controls;
        self
    }

    pub fn id(&self) -> Option<&PanelId> {
        self.id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> PanelWidth {
        self.width
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn controls(&self) -> PanelControls {
        self.controls
    }

    pub fn is_expanded(&self) -> bool {
        self.expansion == Expansion::Expanded
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub(super) fn assign_id(&mut self, id: PanelId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    /// Announces the panel to its owner right before it is shown.
    pub(super) fn open(&mut self) {
        if let Some(id) = &self.id {
            self.events.emit(id, PanelEvent::BeforeOpen);
            self.opened = true;
        }
    }

    /// Asks the owner to dismiss this panel.
    pub fn close(&mut self) {
        if let Some(id) = &self.id {
            self.events.emit(id, PanelEvent::Close);
        }
        self.expansion = Expansion::Collapsed;
    }

    pub fn expand(&mut self) {
        self.expansion = Expansion::Expanded;
        if let Some(id) = &self.id {
            self.events.emit(id, PanelEvent::Expand);
        }
    }

    pub fn collapse(&mut self) {
        self.expansion = Expansion::Collapsed;
        if let Some(id) = &self.id {
            self.events.emit(id, PanelEvent::Collapse);
        }
    }

    pub fn claim_active(&self) {
        if let Some(id) = &self.id {
            self.events.emit(id, PanelEvent::ClaimActive);
        }
    }
}

impl<C> Drop for Panel<C> {
    fn drop(&mut self) {
        if !self.opened {
            return;
        }
        if let Some(id) = &self.id {
            self.events.emit(id, PanelEvent::BeforeClose);
        }
    }
}
