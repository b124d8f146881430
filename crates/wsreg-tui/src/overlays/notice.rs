//! Blocking message box.
//!
//! A notice sits above any overlay and swallows input until dismissed.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use super::render_utils::{InputHint, OverlayConfig, render_overlay};
use crate::common::wrap;

const NOTICE_WIDTH: u16 = 56;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeState {
    pub kind: NoticeKind,
    pub message: String,
}

impl NoticeState {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Returns true when `key` dismisses the notice.
    pub fn dismisses(key: KeyEvent) -> bool {
        matches!(
            key.code,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q')
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (title, color) = match self.kind {
            NoticeKind::Info => ("Notice", Color::Cyan),
            NoticeKind::Error => ("Error", Color::Red),
        };
        // Border, padding and hint row take four columns and three rows.
        let text_width = NOTICE_WIDTH.saturating_sub(4) as usize;
        let rows = wrap(&self.message, text_width).len().max(1) as u16;

        let hints = [InputHint::new("Enter", "dismiss")];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title,
                border_color: color,
                width: NOTICE_WIDTH,
                height: rows + 4,
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
            Paragraph::new(Line::styled(self.message.as_str(), Style::default()))
                .wrap(Wrap { trim: true }),
            body,
        );
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    #[test]
    fn test_dismiss_keys() {
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(NoticeState::dismisses(enter));
        assert!(!NoticeState::dismisses(other));
    }
}
