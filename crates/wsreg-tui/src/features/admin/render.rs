use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use wsreg_core::stats::{RatingSummary, format_mean};
use wsreg_core::text::{display_date, spots_left};

use super::AdminFocus;
use super::update::selected_workshop;
use crate::catalog::spinner;
use crate::common::truncate_with_ellipsis;
use crate::state::TuiState;

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let color = if focused { Color::Magenta } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {title} "))
}

/// Keeps row `selected` (of `per_item` lines each) inside `height`.
fn scroll_offset(selected: usize, per_item: usize, height: usize) -> usize {
    ((selected + 1) * per_item).saturating_sub(height)
}

pub fn render_admin(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let Some(identity) = tui.session.as_ref() else {
        return;
    };
    let dim = Style::default().fg(Color::DarkGray);

    let [title_area, body] = Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);
    let mut title = vec![Span::styled(
        format!("Admin Dashboard ({})", identity.admin_scope.label()),
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )];
    if tui.tasks.admin_withdraw.is_running() {
        title.push(Span::styled(
            format!("  {} Withdrawing...", spinner(tui.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
    } else if tui.tasks.admin.is_running() && !tui.admin.is_empty() {
        title.push(Span::styled(
            format!("  {} Refreshing...", spinner(tui.spinner_frame)),
            dim,
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), title_area);

    if tui.tasks.admin.is_running() && tui.admin.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!("{} Loading registration data...", spinner(tui.spinner_frame)),
                dim,
            )),
            body,
        );
        return;
    }

    let workshops = tui.accessible_workshops();
    if workshops.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::styled("No Workshop Access", Style::default().add_modifier(Modifier::BOLD)),
                Line::styled("You don't have admin access to any workshops.", dim),
            ]),
            body,
        );
        return;
    }

    let [left, right] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .areas(body);

    // Workshop list: two lines per entry.
    let focus = tui.admin_view.focus;
    let left_block = pane_block(
        format!("Workshops ({})", workshops.len()),
        focus == AdminFocus::Workshops,
    );
    let left_inner = left_block.inner(left);
    frame.render_widget(left_block, left);

    let width = left_inner.width as usize;
    let mut lines = Vec::new();
    for (i, workshop) in workshops.iter().enumerate() {
        let selected = i == tui.admin_view.workshop;
        let style = if selected {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker = if selected { "▸ " } else { "  " };
        lines.push(Line::styled(
            format!(
                "{marker}{}",
                truncate_with_ellipsis(&workshop.title, width.saturating_sub(2))
            ),
            style,
        ));
        lines.push(Line::styled(
            format!(
                "  {} • {} participants • {} ratings",
                spots_left(workshop.available_spots()),
                tui.admin.participants(&workshop.id).len(),
                tui.admin.ratings_for(&workshop.id).len()
            ),
            dim,
        ));
    }
    let offset = scroll_offset(tui.admin_view.workshop, 2, left_inner.height as usize);
    frame.render_widget(
        Paragraph::new(lines).scroll((offset as u16, 0)),
        left_inner,
    );

    let Some(workshop) = selected_workshop(tui) else {
        return;
    };
    let participants = tui.admin.participants(&workshop.id);
    let right_block = pane_block(
        format!("Participants ({})", participants.len()),
        focus == AdminFocus::Participants,
    );
    let right_inner = right_block.inner(right);
    frame.render_widget(right_block, right);

    let [summary_area, list_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(right_inner);
    let summary = match RatingSummary::from_ratings(tui.admin.ratings_for(&workshop.id)) {
        Some(summary) => Line::from(vec![
            Span::styled(
                format!(
                    "{} ratings • content {} • speaker {}",
                    summary.count,
                    format_mean(summary.content_mean),
                    format_mean(summary.speaker_mean)
                ),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("  (v to view)", dim),
        ]),
        None => Line::styled("No ratings submitted yet", dim),
    };
    frame.render_widget(Paragraph::new(summary), summary_area);

    if participants.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled("No registrations yet", dim)),
            list_area,
        );
        return;
    }

    let width = list_area.width as usize;
    let mut lines = Vec::new();
    for (i, registration) in participants.iter().enumerate() {
        let selected = focus == AdminFocus::Participants && i == tui.admin_view.participant;
        let marker = if selected { "▸ " } else { "  " };
        let style = if selected {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(
                truncate_with_ellipsis(&registration.participant_name(), width.saturating_sub(2)),
                style,
            ),
        ]));
        lines.push(Line::styled(
            format!(
                "  {} • Registered: {}",
                registration.ticket_id,
                display_date(&registration.registration_time)
            ),
            dim,
        ));
    }
    let offset = scroll_offset(tui.admin_view.participant, 2, list_area.height as usize);
    frame.render_widget(
        Paragraph::new(lines).scroll((offset as u16, 0)),
        list_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 2, 10), 0);
        assert_eq!(scroll_offset(4, 2, 10), 0);
        assert_eq!(scroll_offset(5, 2, 10), 2);
    }
}
