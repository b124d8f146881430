use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::overlays::render_utils::{InputLine, render_input_line};
use crate::state::TuiState;

/// Two rows: the ticket field, then an error or status line.
pub fn render_login_bar(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let logging_in = tui.tasks.login.is_running();
    render_input_line(
        frame,
        Rect::new(area.x, area.y, area.width, 1),
        &InputLine {
            value: &tui.login.input,
            placeholder: "Enter your ticket ID",
            prompt: "Ticket: ",
            focused: !logging_in,
            color: Color::Cyan,
        },
    );

    if area.height < 2 {
        return;
    }
    let status = if logging_in {
        Line::styled("Logging in...", Style::default().fg(Color::Yellow))
    } else if let Some(error) = &tui.login.error {
        Line::styled(error.as_str(), Style::default().fg(Color::Red))
    } else {
        Line::styled(
            "Log in with your ticket to register for workshops",
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(
        Paragraph::new(status),
        Rect::new(area.x, area.y + 1, area.width, 1),
    );
}
