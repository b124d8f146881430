use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::common::truncate_start_with_ellipsis;

/// Centers a `width` x `height` box inside `area`, shrinking it to fit.
pub fn centered_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

/// Sizing and chrome for one modal box.
pub struct OverlayConfig<'a> {
    pub title: &'a str,
    pub border_color: Color,
    pub width: u16,
    pub height: u16,
    pub hints: &'a [InputHint<'a>],
}

/// Rectangles of a drawn overlay: `body` is everything above the hint row.
pub struct OverlayLayout {
    pub popup: Rect,
    pub body: Rect,
}

/// Clears the popup area, draws the titled border and the hint row.
pub fn render_overlay(frame: &mut Frame, area: Rect, config: &OverlayConfig<'_>) -> OverlayLayout {
    let popup = centered_area(area, config.width, config.height);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(config.border_color))
            .title(format!(" {} ", config.title))
            .title_style(
                Style::default()
                    .fg(config.border_color)
                    .add_modifier(Modifier::BOLD),
            ),
        popup,
    );

    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );
    let hint_rows = u16::from(!config.hints.is_empty());
    if hint_rows > 0 {
        render_hints(frame, inner, config.hints, config.border_color);
    }

    OverlayLayout {
        popup,
        body: Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(hint_rows),
        ),
    }
}

/// One "key action" pair in a hint row.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// Builds the spans for a hint row: `key action • key action`.
pub fn hint_spans(hints: &[InputHint<'_>], key_color: Color) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            hint.key.to_string(),
            Style::default().fg(key_color),
        ));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans
}

/// Draws hints centered on the last row of `area`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint<'_>], key_color: Color) {
    let row = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
    frame.render_widget(
        Paragraph::new(Line::from(hint_spans(hints, key_color))).alignment(Alignment::Center),
        row,
    );
}

/// A single-line text field.
pub struct InputLine<'a> {
    pub value: &'a str,
    pub placeholder: &'a str,
    pub prompt: &'a str,
    pub focused: bool,
    pub color: Color,
}

/// Renders `prompt value█`, or the dimmed placeholder when empty.
pub fn render_input_line(frame: &mut Frame, area: Rect, input: &InputLine<'_>) {
    let budget = (area.width as usize).saturating_sub(input.prompt.chars().count() + 1);
    let mut spans = vec![Span::styled(
        input.prompt.to_string(),
        Style::default().fg(Color::DarkGray),
    )];
    let cursor = Span::styled(
        if input.focused { "█" } else { "" },
        Style::default().fg(input.color),
    );

    if input.value.is_empty() {
        spans.push(cursor);
        spans.push(Span::styled(
            truncate_start_with_ellipsis(input.placeholder, budget),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            truncate_start_with_ellipsis(input.value, budget),
            Style::default().fg(input.color),
        ));
        spans.push(cursor);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draws a dim horizontal rule at `y_offset` rows into `area`.
pub fn render_separator(frame: &mut Frame, area: Rect, y_offset: u16) {
    if y_offset >= area.height {
        return;
    }
    frame.render_widget(
        Paragraph::new(Span::styled(
            "─".repeat(area.width as usize),
            Style::default().fg(Color::DarkGray),
        )),
        Rect::new(area.x, area.y + y_offset, area.width, 1),
    );
}
