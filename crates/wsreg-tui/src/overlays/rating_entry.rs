//! Rating form for a workshop the attendee registered for.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use wsreg_core::models::LearnedSomething;
use wsreg_core::rating::{MAX_SCORE, MIN_SCORE, RatingDraft};
use wsreg_core::text::stars;

use super::render_utils::{
    InputHint, InputLine, OverlayConfig, render_input_line, render_overlay, render_separator,
};
use super::{NoticeState, OverlayAction, OverlayUpdate};
use crate::common::truncate_with_ellipsis;
use crate::state::TuiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingField {
    #[default]
    Content,
    Speaker,
    Learned,
    Feedback,
}

impl RatingField {
    const ORDER: [RatingField; 4] = [
        RatingField::Content,
        RatingField::Speaker,
        RatingField::Learned,
        RatingField::Feedback,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone)]
pub struct RatingEntryState {
    pub workshop_id: String,
    pub workshop_title: String,
    pub draft: RatingDraft,
    pub field: RatingField,
}

impl RatingEntryState {
    pub fn open(workshop_id: String, workshop_title: String) -> Self {
        Self {
            workshop_id,
            workshop_title,
            draft: RatingDraft::default(),
            field: RatingField::default(),
        }
    }

    fn score_mut(&mut self) -> Option<&mut u8> {
        match self.field {
            RatingField::Content => Some(&mut self.draft.content_satisfaction),
            RatingField::Speaker => Some(&mut self.draft.speaker_effectiveness),
            RatingField::Learned | RatingField::Feedback => None,
        }
    }

    fn step(&mut self, forward: bool) {
        if let Some(score) = self.score_mut() {
            *score = if forward {
                (*score + 1).clamp(MIN_SCORE, MAX_SCORE)
            } else {
                score.saturating_sub(1).max(MIN_SCORE)
            };
            return;
        }
        if self.field == RatingField::Learned {
            self.draft.learned_something = Some(match self.draft.learned_something {
                Some(LearnedSomething::Yes) => LearnedSomething::No,
                _ => LearnedSomething::Yes,
            });
        }
    }

    fn submit(&self, tui: &TuiState) -> OverlayUpdate {
        if tui.tasks.rating.is_running() {
            return OverlayUpdate::stay();
        }
        match self.draft.validate() {
            Ok(_) => OverlayUpdate::stay().with_action(OverlayAction::SubmitRating {
                workshop_id: self.workshop_id.clone(),
                draft: self.draft.clone(),
            }),
            Err(err) => OverlayUpdate::stay().with_notice(NoticeState::error(err.to_string())),
        }
    }

    /// Bracketed paste lands in the feedback field only.
    pub fn paste(&mut self, text: &str) {
        if self.field == RatingField::Feedback {
            self.draft
                .additional_feedback
                .extend(text.chars().map(|c| if c == '\n' { ' ' } else { c }));
        }
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Enter => self.submit(tui),
            KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.next();
                OverlayUpdate::stay()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.prev();
                OverlayUpdate::stay()
            }
            KeyCode::Backspace if self.field == RatingField::Feedback => {
                self.draft.additional_feedback.pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if self.field == RatingField::Feedback && !ctrl => {
                self.draft.additional_feedback.push(c);
                OverlayUpdate::stay()
            }
            KeyCode::Left => {
                self.step(false);
                OverlayUpdate::stay()
            }
            KeyCode::Right => {
                self.step(true);
                OverlayUpdate::stay()
            }
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(score) = self.score_mut() {
                    *score = c as u8 - b'0';
                }
                OverlayUpdate::stay()
            }
            KeyCode::Char('y') if self.field == RatingField::Learned => {
                self.draft.learned_something = Some(LearnedSomething::Yes);
                OverlayUpdate::stay()
            }
            KeyCode::Char('n') if self.field == RatingField::Learned => {
                self.draft.learned_something = Some(LearnedSomething::No);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        let submitting = tui.tasks.rating.is_running();
        let hints = [
            InputHint::new("Tab", "next field"),
            InputHint::new("←/→", "change"),
            InputHint::new("Enter", if submitting { "Submitting..." } else { "submit" }),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Rate Workshop",
                border_color: Color::Yellow,
                width: 64,
                height: 14,
                hints: &hints,
            },
        );
        let body = layout.body;
        let width = body.width as usize;

        let title = Line::from(Span::styled(
            truncate_with_ellipsis(&self.workshop_title, width),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(title), Rect::new(body.x, body.y, body.width, 1));
        render_separator(frame, body, 1);

        let rows = [
            self.score_line(
                "Content satisfaction",
                self.draft.content_satisfaction,
                RatingField::Content,
            ),
            self.score_line(
                "Speaker effectiveness",
                self.draft.speaker_effectiveness,
                RatingField::Speaker,
            ),
            self.learned_line(),
        ];
        for (i, line) in rows.into_iter().enumerate() {
            let y = body.y + 2 + (i as u16) * 2;
            if y >= body.y + body.height {
                break;
            }
            frame.render_widget(Paragraph::new(line), Rect::new(body.x, y, body.width, 1));
        }

        let feedback_y = body.y + 8;
        if feedback_y + 1 < body.y + body.height {
            frame.render_widget(
                Paragraph::new(self.label("Additional feedback (optional)", RatingField::Feedback)),
                Rect::new(body.x, feedback_y, body.width, 1),
            );
            render_input_line(
                frame,
                Rect::new(body.x, feedback_y + 1, body.width, 1),
                &InputLine {
                    value: &self.draft.additional_feedback,
                    placeholder: "Share your thoughts...",
                    prompt: "> ",
                    focused: self.field == RatingField::Feedback,
                    color: Color::Yellow,
                },
            );
        }
    }

    fn label(&self, text: &str, field: RatingField) -> Line<'static> {
        let style = if self.field == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker = if self.field == field { "▸ " } else { "  " };
        Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(format!("{text} *"), style),
        ])
    }

    fn score_line(&self, text: &str, score: u8, field: RatingField) -> Line<'static> {
        let mut line = self.label(text, field);
        line.spans.push(Span::raw("  "));
        line.spans.push(Span::styled(
            stars(score),
            Style::default().fg(Color::Yellow),
        ));
        line
    }

    fn learned_line(&self) -> Line<'static> {
        let mut line = self.label("Learned something new?", RatingField::Learned);
        for choice in [LearnedSomething::Yes, LearnedSomething::No] {
            let selected = self.draft.learned_something == Some(choice);
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            line.spans.push(Span::raw("  "));
            line.spans
                .push(Span::styled(format!(" {} ", choice.as_str()), style));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn entry() -> RatingEntryState {
        RatingEntryState::open("w1".to_string(), "Intro to Rust".to_string())
    }

    #[test]
    fn test_digits_set_focused_score() {
        let tui = TuiState::new(None);
        let mut state = entry();
        state.handle_key(&tui, key(KeyCode::Char('4')));
        state.handle_key(&tui, key(KeyCode::Tab));
        state.handle_key(&tui, key(KeyCode::Char('2')));

        assert_eq!(state.draft.content_satisfaction, 4);
        assert_eq!(state.draft.speaker_effectiveness, 2);
    }

    #[test]
    fn test_arrows_clamp_scores() {
        let tui = TuiState::new(None);
        let mut state = entry();
        state.handle_key(&tui, key(KeyCode::Left));
        assert_eq!(state.draft.content_satisfaction, MIN_SCORE);
        for _ in 0..10 {
            state.handle_key(&tui, key(KeyCode::Right));
        }
        assert_eq!(state.draft.content_satisfaction, MAX_SCORE);
    }

    #[test]
    fn test_incomplete_submit_raises_notice_and_stays() {
        let tui = TuiState::new(None);
        let mut state = entry();
        state.handle_key(&tui, key(KeyCode::Char('5')));

        let update = state.handle_key(&tui, key(KeyCode::Enter));

        assert!(update.action.is_none());
        assert_eq!(
            update.notice.map(|n| n.message).as_deref(),
            Some("Please complete all required fields")
        );
    }

    #[test]
    fn test_complete_submit_requests_rating() {
        let tui = TuiState::new(None);
        let mut state = entry();
        state.handle_key(&tui, key(KeyCode::Char('5')));
        state.handle_key(&tui, key(KeyCode::Tab));
        state.handle_key(&tui, key(KeyCode::Char('4')));
        state.handle_key(&tui, key(KeyCode::Tab));
        state.handle_key(&tui, key(KeyCode::Char('y')));
        state.handle_key(&tui, key(KeyCode::Tab));
        for c in "great".chars() {
            state.handle_key(&tui, key(KeyCode::Char(c)));
        }

        let update = state.handle_key(&tui, key(KeyCode::Enter));

        match update.action {
            Some(OverlayAction::SubmitRating { workshop_id, draft }) => {
                assert_eq!(workshop_id, "w1");
                assert_eq!(draft.learned_something, Some(LearnedSomething::Yes));
                assert_eq!(draft.additional_feedback, "great");
            }
            other => panic!("expected rating submission, got {other:?}"),
        }
    }

    #[test]
    fn test_typing_in_feedback_does_not_change_scores() {
        let tui = TuiState::new(None);
        let mut state = entry();
        state.field = RatingField::Feedback;
        state.handle_key(&tui, key(KeyCode::Char('3')));

        assert_eq!(state.draft.additional_feedback, "3");
        assert_eq!(state.draft.content_satisfaction, 0);
    }
}
