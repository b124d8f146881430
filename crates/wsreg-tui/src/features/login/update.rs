//! Login reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use wsreg_core::actions::{LoginOutcome, normalize_ticket};

use super::LoginForm;
use crate::common::{TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::state::{Screen, TuiState};

/// Edits the ticket field. Returns `None` for keys the form does not own.
pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> Option<Vec<UiEffect>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let locked = tui.tasks.login.is_running();

    match key.code {
        KeyCode::Enter => Some(submit(tui)),
        KeyCode::Backspace => {
            if !locked {
                tui.login.input.pop();
                tui.login.error = None;
            }
            Some(vec![])
        }
        KeyCode::Char(c) if !ctrl => {
            if !locked {
                tui.login.input.push(c);
                tui.login.error = None;
            }
            Some(vec![])
        }
        _ => None,
    }
}

/// Starts a login with the typed ticket.
///
/// Blank input and a second submit while one is running are ignored.
pub fn submit(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.tasks.login.is_running() {
        return vec![];
    }
    let Some(ticket_id) = normalize_ticket(&tui.login.input) else {
        return vec![];
    };
    tui.login.error = None;
    let task = tui.tasks.start(TaskKind::Login);
    vec![UiEffect::Login { task, ticket_id }]
}

pub fn handle_login_finished(
    tui: &mut TuiState,
    task: TaskId,
    result: Result<LoginOutcome, String>,
) {
    if !tui.tasks.finish(TaskKind::Login, task) {
        return;
    }
    match result {
        Ok(outcome) => {
            tui.session = Some(outcome.identity);
            tui.personal = outcome.personal;
            tui.login = LoginForm::default();
            tui.screen = Screen::Catalog;
        }
        Err(message) => {
            // Typed ticket stays so the user can correct it.
            tui.login.error = Some(message);
        }
    }
}
