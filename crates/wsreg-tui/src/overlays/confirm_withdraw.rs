use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::{Paragraph, Wrap};
use wsreg_core::actions::admin_withdraw_prompt;

use super::render_utils::{InputHint, OverlayConfig, render_overlay};
use super::{OverlayAction, OverlayUpdate};
use crate::state::TuiState;

/// Asks before force-withdrawing a participant.
#[derive(Debug, Clone)]
pub struct ConfirmWithdrawState {
    pub ticket_id: String,
    pub workshop_id: String,
    pub participant: String,
}

impl ConfirmWithdrawState {
    pub fn handle_key(&mut self, _tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                OverlayUpdate::close().with_action(OverlayAction::AdminWithdraw {
                    ticket_id: self.ticket_id.clone(),
                    workshop_id: self.workshop_id.clone(),
                    participant: self.participant.clone(),
                })
            }
            KeyCode::Char('n') | KeyCode::Esc => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, _tui: &TuiState) {
        let hints = [InputHint::new("y", "withdraw"), InputHint::new("n", "cancel")];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Withdraw Participant",
                border_color: Color::Red,
                width: 56,
                height: 7,
                hints: &hints,
            },
        );
        let body = Rect::new(
            layout.body.x + 1,
            layout.body.y,
            layout.body.width.saturating_sub(2),
            layout.body.height,
        );
        frame.render_widget(
            Paragraph::new(admin_withdraw_prompt(&self.participant, &self.ticket_id))
                .wrap(Wrap { trim: true }),
            body,
        );
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::overlays::OverlayTransition;

    fn confirm() -> ConfirmWithdrawState {
        ConfirmWithdrawState {
            ticket_id: "T-2".to_string(),
            workshop_id: "w1".to_string(),
            participant: "Bo Li".to_string(),
        }
    }

    #[test]
    fn test_yes_requests_withdraw_and_closes() {
        let tui = TuiState::new(None);
        let update = confirm().handle_key(&tui, KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE));
        assert_eq!(update.transition, OverlayTransition::Close);
        assert!(matches!(
            update.action,
            Some(OverlayAction::AdminWithdraw { ref ticket_id, .. }) if ticket_id == "T-2"
        ));
    }

    #[test]
    fn test_escape_cancels_without_action() {
        let tui = TuiState::new(None);
        let update = confirm().handle_key(&tui, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(update.transition, OverlayTransition::Close);
        assert!(update.action.is_none());
    }
}
