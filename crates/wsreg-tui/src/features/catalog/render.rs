//! Catalog and "my registrations" views.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use wsreg_core::reconcile::{MyRegistration, WorkshopView};
use wsreg_core::text::{display_date, html_to_text, spots_left};

use crate::common::{truncate_with_ellipsis, wrap};
use crate::state::TuiState;

/// Spinner frames for loading placeholders.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Abstract lines shown under the selected workshop.
const ABSTRACT_MAX_LINES: usize = 6;

pub(crate) fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[(frame / 2) % SPINNER_FRAMES.len()]
}

fn spots_color(available: i64) -> Color {
    if available > 5 {
        Color::Green
    } else if available > 0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Label and style of the per-row action control.
fn action_label(view: &WorkshopView<'_>, logged_in: bool) -> (&'static str, Style) {
    let enabled = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    if !logged_in {
        ("Login to register", disabled)
    } else if view.busy {
        ("Processing...", disabled)
    } else if view.registered {
        (
            "Withdraw Registration",
            Style::default().fg(Color::Black).bg(Color::Red),
        )
    } else if view.can_register() {
        ("Register", enabled)
    } else {
        ("Workshop Full", disabled)
    }
}

/// Lines for one workshop card. `selected` cards also show the abstract.
fn workshop_card(
    view: &WorkshopView<'_>,
    selected: bool,
    logged_in: bool,
    width: usize,
) -> Vec<Line<'static>> {
    let workshop = view.workshop;
    let dim = Style::default().fg(Color::DarkGray);
    let marker = if selected { "▸ " } else { "  " };
    let title_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let spots = spots_left(view.available_spots);
    let title_width = width.saturating_sub(spots.chars().count() + 4);
    let mut title = vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(truncate_with_ellipsis(&workshop.title, title_width), title_style),
        Span::raw("  "),
        Span::styled(spots, Style::default().fg(spots_color(view.available_spots))),
    ];
    if view.registered {
        title.push(Span::styled("  ✓ Registered", Style::default().fg(Color::Green)));
    }
    if view.manageable {
        title.push(Span::styled("  admin", Style::default().fg(Color::Magenta)));
    }

    let speakers = workshop.speakers.join(", ");
    let details = [
        workshop.time.as_str(),
        workshop.location.as_str(),
        speakers.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" • ");

    let mut lines = vec![
        Line::from(title),
        Line::styled(format!("  {}", truncate_with_ellipsis(&details, width.saturating_sub(2))), dim),
    ];

    if selected {
        let text = html_to_text(&workshop.abstract_html);
        let mut rows = wrap(&text, width.saturating_sub(4));
        if rows.len() > ABSTRACT_MAX_LINES {
            rows.truncate(ABSTRACT_MAX_LINES);
            rows.push("…".to_string());
        }
        lines.extend(rows.into_iter().map(|row| Line::raw(format!("    {row}"))));
    }

    let (label, style) = action_label(view, logged_in);
    lines.push(Line::from(vec![
        Span::styled(
            format!(
                "  {} / {} registered   ",
                workshop.current_registrations, workshop.max_capacity
            ),
            dim,
        ),
        Span::styled(format!(" {label} "), style),
    ]));
    lines.push(Line::default());
    lines
}

/// Renders cards so the selected one is fully visible when it fits.
fn render_cards(frame: &mut Frame, area: Rect, cards: Vec<Vec<Line<'static>>>, selected: usize) {
    let mut lines = Vec::new();
    let mut selected_span = (0, 0);
    for (i, card) in cards.into_iter().enumerate() {
        if i == selected {
            selected_span = (lines.len(), lines.len() + card.len());
        }
        lines.extend(card);
    }

    let height = area.height as usize;
    let offset = selected_span.1.saturating_sub(height).min(selected_span.0);
    let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
    frame.render_widget(Paragraph::new(visible), area);
}

fn render_placeholder(frame: &mut Frame, area: Rect, text: String) {
    frame.render_widget(
        Paragraph::new(Line::styled(text, Style::default().fg(Color::DarkGray))),
        area,
    );
}

pub fn render_catalog(frame: &mut Frame, area: Rect, tui: &TuiState) {
    if tui.catalog.is_empty() {
        let text = if tui.catalog_loaded {
            "No workshops available.".to_string()
        } else {
            format!("{} Loading workshops...", spinner(tui.spinner_frame))
        };
        render_placeholder(frame, area, text);
        return;
    }

    let logged_in = tui.session.is_some();
    let width = area.width as usize;
    let cards = tui
        .workshop_views()
        .iter()
        .enumerate()
        .map(|(i, view)| workshop_card(view, i == tui.catalog_view.selected, logged_in, width))
        .collect();
    render_cards(frame, area, cards, tui.catalog_view.selected);
}

fn registration_card(entry: &MyRegistration<'_>, selected: bool, width: usize) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let workshop = entry.workshop;
    let marker = if selected { "▸ " } else { "  " };
    let title_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let status = if entry.rated {
        Span::styled("★ Rated", Style::default().fg(Color::Yellow))
    } else if entry.can_rate() {
        Span::styled(
            " Rate Workshop ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("Rating opens after the workshop", dim)
    };

    vec![
        Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(
                truncate_with_ellipsis(&workshop.title, width.saturating_sub(2)),
                title_style,
            ),
        ]),
        Line::styled(format!("  {} • {}", workshop.time, workshop.location), dim),
        Line::styled(
            format!(
                "  Registered: {}",
                display_date(&entry.registration.registration_time)
            ),
            dim,
        ),
        Line::from(vec![Span::raw("  "), status]),
        Line::default(),
    ]
}

pub fn render_my_registrations(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let mine = tui.my_registrations();
    if mine.is_empty() {
        let text = if tui.tasks.personal.is_running() {
            format!("{} Loading your registrations...", spinner(tui.spinner_frame))
        } else {
            "You haven't registered for any workshops yet.".to_string()
        };
        render_placeholder(frame, area, text);
        return;
    }

    let width = area.width as usize;
    let cards = mine
        .iter()
        .enumerate()
        .map(|(i, entry)| registration_card(entry, i == tui.catalog_view.mine_selected, width))
        .collect();
    render_cards(frame, area, cards, tui.catalog_view.mine_selected);
}
