//! Dashboard key bindings

use super::state::DashboardState;
use crossterm::event::KeyCode;

/// What the event loop should do after a key press.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
    Quit,
}

impl DashboardState {
    /// Dispatches a key press.
    ///
    /// The active view sees the key first so text inputs can capture
    /// characters that are bindings elsewhere.
    pub fn handle_key(&mut self, code: KeyCode) -> KeyOutcome {
        let ctx = self.ctx.clone();
        if let Some(panel) = self.stack.active_mut() {
            if panel.content_mut().handle_key(code, &ctx) {
                return KeyOutcome::Handled;
            }
        }

        let outcome = match code {
            KeyCode::Esc if self.app_bar.is_about_open() => {
                self.app_bar.toggle_about();
                KeyOutcome::Handled
            }
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Tab | KeyCode::Right => self.focus(true),
            KeyCode::BackTab | KeyCode::Left => self.focus(false),
            KeyCode::Down => self.with_active(|panel| panel.content_mut().select_next()),
            KeyCode::Up => self.with_active(|panel| panel.content_mut().select_previous()),
            KeyCode::Enter => {
                let child = self
                    .stack
                    .active_mut()
                    .and_then(|panel| panel.content_mut().activate(&ctx));
                match child {
                    Some(panel) => {
                        self.open(panel);
                        KeyOutcome::Handled
                    }
                    None => KeyOutcome::Ignored,
                }
            }
            KeyCode::Char('x') => self.with_active(|panel| {
                if panel.controls().close {
                    panel.close();
                }
            }),
            KeyCode::Char('e') => self.with_active(|panel| {
                if panel.controls().expand {
                    panel.expand();
                }
            }),
            KeyCode::Char('c') => self.with_active(|panel| {
                if panel.controls().collapse {
                    panel.collapse();
                }
            }),
            KeyCode::Char('a') => {
                self.app_bar.toggle_about();
                KeyOutcome::Handled
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if self.open_sidebar(index) {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            _ => KeyOutcome::Ignored,
        };

        self.settle();
        outcome
    }

    fn focus(&mut self, forward: bool) -> KeyOutcome {
        match self.stack.adjacent(forward) {
            Some(panel) => {
                panel.claim_active();
                KeyOutcome::Handled
            }
            None => KeyOutcome::Ignored,
        }
    }

    fn with_active(
        &mut self,
        action: impl FnOnce(&mut crate::ui::views::DashboardPanel),
    ) -> KeyOutcome {
        match self.stack.active_mut() {
            Some(panel) => {
                action(panel);
                KeyOutcome::Handled
            }
            None => KeyOutcome::Ignored,
        }
    }
}
