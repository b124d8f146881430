//! Ratings view for one workshop on the admin dashboard.
//!
//! Aggregates are recomputed from `AdminData` on every draw, so a refresh
//! that lands while the overlay is open shows up immediately.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use wsreg_core::models::{LearnedSomething, Rating};
use wsreg_core::stats::{RatingSummary, format_mean, stars_for_mean};
use wsreg_core::text::{display_date, stars};

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay};
use crate::common::wrap;
use crate::state::TuiState;

#[derive(Debug, Clone)]
pub struct RatingsSummaryState {
    pub workshop_id: String,
    pub workshop_title: String,
    pub scroll: usize,
}

impl RatingsSummaryState {
    pub fn open(workshop_id: String, workshop_title: String) -> Self {
        Self {
            workshop_id,
            workshop_title,
            scroll: 0,
        }
    }

    pub fn handle_key(&mut self, _tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('v') => {
                OverlayUpdate::close()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                OverlayUpdate::stay()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                OverlayUpdate::stay()
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                OverlayUpdate::stay()
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        let hints = [
            InputHint::new("↑/↓", "scroll"),
            InputHint::new("Esc", "close"),
        ];
        let title = format!("Ratings: {}", self.workshop_title);
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: &title,
                border_color: Color::Magenta,
                width: 76,
                height: area.height.saturating_sub(2),
                hints: &hints,
            },
        );
        let body = layout.body;
        let inner_width = body.width.saturating_sub(2) as usize;

        let lines = summary_lines(tui.admin.ratings_for(&self.workshop_id), inner_width);
        let max_scroll = lines.len().saturating_sub(body.height as usize);
        let start = self.scroll.min(max_scroll);
        let visible: Vec<Line> = lines
            .into_iter()
            .skip(start)
            .take(body.height as usize)
            .collect();

        frame.render_widget(
            Paragraph::new(visible),
            Rect::new(body.x + 1, body.y, body.width.saturating_sub(2), body.height),
        );
    }
}

/// Builds the scrollable content: aggregates first, then each response.
pub fn summary_lines(ratings: &[Rating], width: usize) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let Some(summary) = RatingSummary::from_ratings(ratings) else {
        return vec![Line::styled("No ratings submitted yet", dim)];
    };

    let mut lines = vec![
        mean_line("Content Satisfaction", summary.content_mean),
        mean_line("Speaker Effectiveness", summary.speaker_mean),
        Line::from(vec![
            Span::styled("Learned Something New  ", bold),
            Span::raw(format!(
                "{}/{} ({}%)",
                summary.learned_yes,
                summary.count,
                summary.learned_percentage()
            )),
        ]),
        Line::styled(format!("{} Total Responses", summary.count), dim),
        Line::default(),
        Line::styled("Individual Responses", bold),
    ];

    for rating in ratings {
        lines.push(Line::styled("─".repeat(width), dim));
        let learned = match rating.learned_something {
            Some(LearnedSomething::Yes) => Span::styled("Learned New", Style::default().fg(Color::Green)),
            _ => Span::styled("No New Learning", Style::default().fg(Color::Red)),
        };
        lines.push(Line::from(vec![
            Span::styled(rating.rater_name(), bold),
            Span::raw("  "),
            learned,
        ]));
        lines.push(Line::styled(display_date(&rating.submitted_at), dim));
        lines.push(Line::raw(format!(
            "Content: {}/5  Speaker: {}/5",
            rating.content_satisfaction, rating.speaker_effectiveness
        )));
        if let Some(feedback) = rating.feedback() {
            for row in wrap(&format!("\"{feedback}\""), width) {
                lines.push(Line::styled(row, Style::default().add_modifier(Modifier::ITALIC)));
            }
        }
    }
    lines
}

fn mean_line(label: &str, mean: f64) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<23}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(stars(stars_for_mean(mean)), Style::default().fg(Color::Yellow)),
        Span::raw(format!(" {}", format_mean(mean))),
    ])
}
