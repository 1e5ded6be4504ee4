//! The panel stack
//!
//! Owns the ordered panels plus the pointer to the active one. Display order
//! is insertion order. The active pointer is a position in the sequence, kept
//! in step with every insertion and removal, so panels sharing a caller
//! supplied id still have exactly one active element.

use super::id::PanelId;
use super::panel::{Panel, PanelEvent, PanelEvents, PanelMessage};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelStackError {
    /// The panel is not a member of this stack.
    #[error("panel not found: {0}")]
    NotFound(PanelId),
}

/// Ordered collection of panels with a single active panel.
#[derive(Debug)]
pub struct PanelStack<C> {
    panels: Vec<Panel<C>>,
    active: Option<usize>,
    events: PanelEvents,
    receiver: mpsc::UnboundedReceiver<PanelMessage>,
    /// Index of the first panel on screen.
    scroll: usize,
    /// How many panels fit on screen, updated by the renderer.
    viewport: usize,
}

impl<C> Default for PanelStack<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> PanelStack<C> {
    pub fn new() -> Self {
        let (events, receiver) = PanelEvents::channel();
        Self {
            panels: Vec::new(),
            active: None,
            events,
            receiver,
            scroll: 0,
            viewport: usize::MAX,
        }
    }

    /// Handle to give to panels created for this stack.
    pub fn events(&self) -> PanelEvents {
        self.events.clone()
    }

    pub fn panels(&self) -> &[Panel<C>] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.position(id).is_some()
    }

    pub fn get_mut(&mut self, id: &PanelId) -> Option<&mut Panel<C>> {
        self.position(id).map(|index| &mut self.panels[index])
    }

    pub fn active_id(&self) -> Option<&PanelId> {
        self.active().and_then(|panel| panel.id())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Panel<C>> {
        self.active.and_then(|index| self.panels.get(index))
    }

    pub fn active_mut(&mut self) -> Option<&mut Panel<C>> {
        self.active.and_then(|index| self.panels.get_mut(index))
    }

    /// Appends `panel` and makes it the active one.
    ///
    /// Panels without an identifier get a random one that is unique within
    /// the stack.
    pub fn push(&mut self, mut panel: Panel<C>) -> PanelId {
        let id = match panel.id().cloned() {
            Some(id) => {
                if self.contains(&id) {
                    log::warn!("Pushing panel with duplicate id {}", id);
                }
                id
            }
            None => {
                let mut rng = rand::thread_rng();
                let id = PanelId::random_unique(&mut rng, None, |candidate| {
                    self.contains(candidate)
                });
                panel.assign_id(id.clone());
                id
            }
        };

        panel.open();
        self.panels.push(panel);
        self.active = Some(self.panels.len() - 1);
        self.ensure_active_visible();
        id
    }

    /// Removes the panel with identifier `id`.
    ///
    /// Removing the active panel hands the active state to the panel that
    /// preceded it, or to the new first panel when the first one was removed.
    /// Unknown identifiers leave the stack untouched and return `None`.
    pub fn remove(&mut self, id: &PanelId) -> Option<Panel<C>> {
        let Some(index) = self.position(id) else {
            log::warn!("Ignoring removal of unknown panel {}", id);
            return None;
        };

        let removed = self.panels.remove(index);

        self.active = match self.active {
            _ if self.panels.is_empty() => None,
            Some(active) if active == index => Some(index.saturating_sub(1)),
            Some(active) if active > index => Some(active - 1),
            active => active,
        };
        self.clamp_scroll();
        self.ensure_active_visible();
        Some(removed)
    }

    /// Makes the panel with identifier `id` the active one.
    pub fn claim_active(&mut self, id: &PanelId) -> Result<(), PanelStackError> {
        let Some(index) = self.position(id) else {
            return Err(PanelStackError::NotFound(id.clone()));
        };
        self.active = Some(index);
        self.ensure_active_visible();
        Ok(())
    }

    /// The panel right after the active one, or right before it when
    /// `forward` is false.
    pub fn adjacent(&self, forward: bool) -> Option<&Panel<C>> {
        let index = self.active_index()?;
        let target = if forward {
            index + 1
        } else {
            index.checked_sub(1)?
        };
        self.panels.get(target)
    }

    /// Mutable access to every panel, in display order.
    pub fn panels_mut(&mut self) -> std::slice::IterMut<'_, Panel<C>> {
        self.panels.iter_mut()
    }

    /// Applies every event panels have emitted since the last call.
    ///
    /// Returns the number of events handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.receiver.try_recv() {
            handled += 1;
            match message.event {
                PanelEvent::Close => {
                    // Dropping the removed panel queues its BeforeClose.
                    self.remove(&message.panel);
                }
                PanelEvent::Expand | PanelEvent::Collapse | PanelEvent::ClaimActive => {
                    if let Err(e) = self.claim_active(&message.panel) {
                        log::warn!("{} from detached panel: {}", message.event, e);
                    }
                }
                PanelEvent::BeforeOpen | PanelEvent::BeforeClose => {
                    log::debug!("Panel {}: {}", message.panel, message.event);
                }
            }
        }
        handled
    }

    /// Tells the stack how many panels fit on screen.
    pub fn set_viewport(&mut self, panels: usize) {
        let panels = panels.max(1);
        if self.viewport != panels {
            self.viewport = panels;
            self.clamp_scroll();
            self.ensure_active_visible();
        }
    }

    /// Index range of the panels currently on screen.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let end = self.scroll.saturating_add(self.viewport).min(self.panels.len());
        self.scroll.min(end)..end
    }

    /// Scrolls so the active panel is on screen.
    ///
    /// Scrolling forward aligns the active panel with the end of the viewport.
    pub fn ensure_active_visible(&mut self) {
        let Some(index) = self.active_index() else {
            self.scroll = 0;
            return;
        };
        if index < self.scroll {
            self.scroll = index;
        } else if index >= self.scroll.saturating_add(self.viewport) {
            self.scroll = index + 1 - self.viewport;
        }
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = self.panels.len().saturating_sub(self.viewport.min(self.panels.len()));
        self.scroll = self.scroll.min(max_scroll);
    }

    fn position(&self, id: &PanelId) -> Option<usize> {
        self.panels.iter().position(|panel| panel.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::panels::id::{DEFAULT_ID_LENGTH, ID_ALPHABET};
    use std::collections::HashSet;

    fn panel(stack: &PanelStack<&'static str>, name: &'static str) -> Panel<&'static str> {
        Panel::new(name, name, stack.events()).with_id(name)
    }

    fn stack_of(names: &[&'static str]) -> PanelStack<&'static str> {
        let mut stack = PanelStack::new();
        for name in names {
            let p = panel(&stack, name);
            stack.push(p);
        }
        stack
    }

    fn order(stack: &PanelStack<&'static str>) -> Vec<&'static str> {
        stack.panels().iter().map(|p| *p.content()).collect()
    }

    fn active(stack: &PanelStack<&'static str>) -> Option<&'static str> {
        stack.active().map(|p| *p.content())
    }

    #[test]
    fn test_push_onto_empty_stack() {
        let mut stack = PanelStack::new();
        let p = panel(&stack, "P");
        stack.push(p);
        assert_eq!(order(&stack), vec!["P"]);
        assert_eq!(active(&stack), Some("P"));
    }

    #[test]
    fn test_every_push_is_last_and_active() {
        let mut stack = PanelStack::new();
        for name in ["A", "B", "C", "D", "E"] {
            let p = panel(&stack, name);
            let id = stack.push(p);
            assert_eq!(stack.panels().last().and_then(|p| p.id()), Some(&id));
            assert_eq!(stack.active_id(), Some(&id));
        }
    }

    #[test]
    fn test_remove_active_middle_activates_previous() {
        let mut stack = stack_of(&["A", "B", "C"]);
        stack.claim_active(&PanelId::from("B")).unwrap();

        let removed = stack.remove(&PanelId::from("B"));
        assert!(removed.is_some());
        assert_eq!(order(&stack), vec!["A", "C"]);
        assert_eq!(active(&stack), Some("A"));
    }

    #[test]
    fn test_remove_active_first_activates_second() {
        let mut stack = stack_of(&["A", "B", "C"]);
        stack.claim_active(&PanelId::from("A")).unwrap();

        stack.remove(&PanelId::from("A"));
        assert_eq!(order(&stack), vec!["B", "C"]);
        assert_eq!(active(&stack), Some("B"));
    }

    #[test]
    fn test_remove_active_last_activates_previous() {
        let mut stack = stack_of(&["A", "B", "C"]);
        stack.remove(&PanelId::from("C"));
        assert_eq!(order(&stack), vec!["A", "B"]);
        assert_eq!(active(&stack), Some("B"));
    }

    #[test]
    fn test_remove_only_panel_leaves_no_active() {
        let mut stack = stack_of(&["P"]);
        stack.remove(&PanelId::from("P"));
        assert!(stack.is_empty());
        assert!(stack.active_id().is_none());
        assert!(stack.active().is_none());
    }

    #[test]
    fn test_remove_inactive_keeps_active() {
        let mut stack = stack_of(&["A", "B", "C", "D"]);
        stack.claim_active(&PanelId::from("C")).unwrap();

        stack.remove(&PanelId::from("A"));
        assert_eq!(stack.len(), 3);
        assert_eq!(active(&stack), Some("C"));

        stack.remove(&PanelId::from("D"));
        assert_eq!(stack.len(), 2);
        assert_eq!(active(&stack), Some("C"));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut stack = stack_of(&["A", "B"]);
        assert!(stack.remove(&PanelId::from("Z")).is_none());
        assert_eq!(order(&stack), vec!["A", "B"]);
        assert_eq!(active(&stack), Some("B"));
    }

    #[test]
    fn test_claim_active_requires_membership() {
        let mut stack = stack_of(&["A"]);
        assert_eq!(
            stack.claim_active(&PanelId::from("nope")),
            Err(PanelStackError::NotFound(PanelId::from("nope")))
        );
        assert_eq!(active(&stack), Some("A"));
    }

    #[test]
    fn test_remove_active_at_every_position() {
        let names = ["A", "B", "C", "D", "E"];
        for i in 0..names.len() {
            let mut stack = stack_of(&names);
            stack.claim_active(&PanelId::from(names[i])).unwrap();
            stack.remove(&PanelId::from(names[i]));

            let expected = if i > 0 { names[i - 1] } else { names[1] };
            assert_eq!(active(&stack), Some(expected), "removed index {}", i);
            assert_eq!(stack.len(), names.len() - 1);
        }
    }

    #[test]
    fn test_generated_ids_are_unique_and_well_formed() {
        let mut stack: PanelStack<usize> = PanelStack::new();
        for n in 0..200 {
            let p = Panel::new("anonymous", n, stack.events());
            stack.push(p);
        }
        let ids: HashSet<_> = stack.panels().iter().filter_map(|p| p.id()).collect();
        assert_eq!(ids.len(), 200);
        for id in ids {
            assert_eq!(id.as_str().len(), DEFAULT_ID_LENGTH);
            assert!(id.as_str().bytes().all(|c| ID_ALPHABET.contains(&c)));
        }
    }

    #[test]
    fn test_explicit_id_is_kept() {
        let mut stack: PanelStack<()> = PanelStack::new();
        let p = Panel::new("named", (), stack.events()).with_id("monitors");
        assert_eq!(stack.push(p), PanelId::from("monitors"));
    }

    #[test]
    fn test_process_events_applies_panel_intents() {
        let mut stack = stack_of(&["A", "B", "C"]);
        stack.process_events();

        stack.get_mut(&PanelId::from("A")).unwrap().expand();
        stack.process_events();
        assert_eq!(active(&stack), Some("A"));

        stack.get_mut(&PanelId::from("A")).unwrap().close();
        stack.process_events();
        assert_eq!(order(&stack), vec!["B", "C"]);
        assert_eq!(active(&stack), Some("B"));

        // The removed panel's BeforeClose was drained in the same pass.
        assert_eq!(stack.process_events(), 0);
    }

    #[test]
    fn test_focus_moves_through_claims() {
        let mut stack = stack_of(&["A", "B", "C"]);
        assert!(stack.adjacent(true).is_none());

        stack.adjacent(false).unwrap().claim_active();
        stack.process_events();
        assert_eq!(active(&stack), Some("B"));

        stack.adjacent(false).unwrap().claim_active();
        stack.process_events();
        assert_eq!(active(&stack), Some("A"));
        assert!(stack.adjacent(false).is_none());
        assert_eq!(stack.adjacent(true).and_then(|p| p.id()), Some(&PanelId::from("B")));
    }

    #[test]
    fn test_active_panel_stays_visible() {
        let mut stack = stack_of(&["A", "B", "C", "D", "E"]);
        stack.set_viewport(2);
        assert_eq!(stack.visible_range(), 3..5);

        stack.claim_active(&PanelId::from("A")).unwrap();
        assert_eq!(stack.visible_range(), 0..2);

        stack.claim_active(&PanelId::from("D")).unwrap();
        assert_eq!(stack.visible_range(), 2..4);
        assert!(stack.visible_range().contains(&stack.active_index().unwrap()));

        stack.remove(&PanelId::from("E"));
        stack.remove(&PanelId::from("D"));
        assert!(stack.visible_range().contains(&stack.active_index().unwrap()));
    }

    #[test]
    fn test_duplicate_ids_keep_a_single_active_panel() {
        let mut stack = stack_of(&["A", "B"]);
        let twin = Panel::new("twin", "A2", stack.events()).with_id("A");
        assert_eq!(stack.push(twin), PanelId::from("A"));

        assert_eq!(stack.active_index(), Some(2));
        assert_eq!(active(&stack), Some("A2"));

        // Removal by id takes the first match; the active twin moves down.
        stack.remove(&PanelId::from("A"));
        assert_eq!(order(&stack), vec!["B", "A2"]);
        assert_eq!(stack.active_index(), Some(1));
        assert_eq!(active(&stack), Some("A2"));
    }
}
