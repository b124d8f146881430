//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::overlays::OverlayExt;
use crate::overlays::render_utils::{InputHint, hint_spans, render_separator};
use crate::state::{AppState, Screen, TuiState};
use crate::{admin, catalog, login};

const APP_TITLE: &str = "Workshop Registration";

/// Header rows: title plus either the login bar or the screen tabs.
const HEADER_HEIGHT: u16 = 4;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let tui = &app.tui;

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, tui);

    let body = Rect::new(
        body.x + 1,
        body.y,
        body.width.saturating_sub(2),
        body.height,
    );
    match tui.screen {
        Screen::Catalog => catalog::render_catalog(frame, body, tui),
        Screen::MyRegistrations => catalog::render_my_registrations(frame, body, tui),
        Screen::Admin => admin::render_admin(frame, body, tui),
    }

    render_footer(frame, footer, tui);

    app.overlay.render(frame, area, tui);
    if let Some(notice) = &app.notice {
        notice.render(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let inner = Rect::new(area.x + 1, area.y, area.width.saturating_sub(2), area.height);
    let title = Span::styled(
        APP_TITLE,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    match &tui.session {
        None => {
            frame.render_widget(Paragraph::new(Line::from(title)), row(inner, 0));
            login::render_login_bar(
                frame,
                Rect::new(inner.x, inner.y + 1, inner.width, 2),
                tui,
            );
        }
        Some(identity) => {
            let mut who = vec![Span::styled(
                format!("{} ({})", identity.full_name(), identity.ticket_id),
                Style::default().fg(Color::Green),
            )];
            if identity.is_admin {
                who.push(Span::styled(" admin", Style::default().fg(Color::Magenta)));
            }
            let who = Line::from(who);
            let [left, right] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(who.width() as u16)])
                    .areas(row(inner, 0));
            frame.render_widget(Paragraph::new(Line::from(title)), left);
            frame.render_widget(Paragraph::new(who).alignment(Alignment::Right), right);
            frame.render_widget(Paragraph::new(tabs_line(tui)), row(inner, 2));
        }
    }
    render_separator(frame, inner, HEADER_HEIGHT - 1);
}

fn row(area: Rect, offset: u16) -> Rect {
    Rect::new(area.x, area.y + offset, area.width, 1)
}

fn tabs_line(tui: &TuiState) -> Line<'static> {
    let registered = tui.personal.registrations.len();
    let mut tabs = vec![
        (Screen::Catalog, format!("Workshops ({})", tui.catalog.len())),
        (Screen::MyRegistrations, format!("My Registrations ({registered})")),
    ];
    if tui.is_admin() {
        tabs.push((Screen::Admin, "Admin".to_string()));
    }

    let mut spans = Vec::new();
    for (i, (screen, label)) in tabs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        let style = if screen == tui.screen {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

fn footer_hints(tui: &TuiState) -> Vec<InputHint<'static>> {
    if tui.session.is_none() {
        return vec![
            InputHint::new("Enter", "log in"),
            InputHint::new("↑/↓", "browse"),
            InputHint::new("Ctrl+R", "refresh"),
            InputHint::new("Esc", "quit"),
        ];
    }
    let mut hints = match tui.screen {
        Screen::Catalog => vec![
            InputHint::new("↑/↓", "select"),
            InputHint::new("Enter", "register/withdraw"),
            InputHint::new("Tab", "my registrations"),
        ],
        Screen::MyRegistrations => vec![
            InputHint::new("↑/↓", "select"),
            InputHint::new("Enter", "rate"),
            InputHint::new("Tab", "workshops"),
        ],
        Screen::Admin => vec![
            InputHint::new("←/→", "pane"),
            InputHint::new("↑/↓", "select"),
            InputHint::new("v", "ratings"),
            InputHint::new("d", "withdraw"),
            InputHint::new("Esc", "back"),
        ],
    };
    if tui.is_admin() && tui.screen != Screen::Admin {
        hints.push(InputHint::new("a", "admin"));
    }
    hints.push(InputHint::new("r", "refresh"));
    hints.push(InputHint::new("l", "log out"));
    hints.push(InputHint::new("q", "quit"));
    hints
}

fn render_footer(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let hints = footer_hints(tui);
    frame.render_widget(
        Paragraph::new(Line::from(hint_spans(&hints, Color::Cyan))).alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use wsreg_core::models::{AdminScope, Identity, Workshop};

    use super::*;

    fn screen_text(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");
        terminal
            .draw(|frame| render(app, frame))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn workshop(id: &str, max: i64, current: i64) -> Workshop {
        Workshop {
            id: id.to_string(),
            title: format!("Workshop {id}"),
            time: "10:00".to_string(),
            location: "Hall B".to_string(),
            speakers: vec!["Grace".to_string()],
            abstract_html: "<p>Hands-on <b>session</b></p>".to_string(),
            max_capacity: max,
            current_registrations: current,
        }
    }

    #[test]
    fn test_logged_out_screen_shows_login_and_catalog() {
        let mut app = AppState::new(None);
        app.tui.catalog = vec![workshop("w1", 10, 3), workshop("w2", 5, 5)];
        app.tui.catalog_loaded = true;

        let text = screen_text(&app);

        assert!(text.contains("Enter your ticket ID"));
        assert!(text.contains("7 spots left"));
        assert!(text.contains("0 spots left"));
        assert!(text.contains("Login to register"));
        assert!(text.contains("Hands-on session"));
    }

    #[test]
    fn test_loading_placeholder_before_first_catalog() {
        let app = AppState::new(None);
        assert!(screen_text(&app).contains("Loading workshops..."));
    }

    #[test]
    fn test_logged_in_header_and_empty_registrations() {
        let mut app = AppState::new(Some(Identity {
            ticket_id: "T1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_admin: false,
            admin_scope: AdminScope::default(),
        }));
        app.tui.screen = Screen::MyRegistrations;

        let text = screen_text(&app);

        assert!(text.contains("Ada Lovelace (T1)"));
        assert!(text.contains("You haven't registered for any workshops yet."));
    }

    #[test]
    fn test_admin_without_access_sees_message() {
        let mut app = AppState::new(Some(Identity {
            ticket_id: "A1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            is_admin: true,
            admin_scope: AdminScope::Workshops(vec!["missing".to_string()]),
        }));
        app.tui.catalog = vec![workshop("w1", 10, 3)];
        app.tui.screen = Screen::Admin;

        let text = screen_text(&app);

        assert!(text.contains("Admin Dashboard (1 Workshop)"));
        assert!(text.contains("No Workshop Access"));
    }
}
