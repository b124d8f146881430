//! TUI reducer (update function).
//!
//! All state mutations happen here or in the feature reducers it calls.
//! The runtime calls `update(app, event)` and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use wsreg_core::actions::RATING_THANKS;
use wsreg_core::rating::RatingDraft;
use wsreg_core::reconcile::PersonalData;

use crate::common::{TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::events::{
    AdminUiEvent, CatalogUiEvent, RatingUiEvent, RegistrationUiEvent, SessionUiEvent, UiEvent,
};
use crate::overlays::{NoticeState, Overlay, OverlayAction, OverlayTransition, OverlayUpdate};
use crate::state::{AppState, Screen, TuiState};
use crate::{admin, catalog, login};

/// Effects to run once at startup: the catalog, plus personal data when a
/// session was restored.
pub fn init(app: &mut AppState) -> Vec<UiEffect> {
    catalog::refresh(&mut app.tui)
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::Catalog(CatalogUiEvent::Loaded { task, workshops }) => {
            catalog::handle_catalog_loaded(&mut app.tui, task, workshops);
            vec![]
        }
        UiEvent::Session(SessionUiEvent::LoginFinished { task, result }) => {
            login::handle_login_finished(&mut app.tui, task, result);
            vec![]
        }
        UiEvent::Session(SessionUiEvent::PersonalLoaded {
            task,
            ticket_id,
            personal,
        }) => {
            catalog::handle_personal_loaded(&mut app.tui, task, &ticket_id, personal);
            vec![]
        }
        UiEvent::Registration(RegistrationUiEvent::Finished {
            ticket_id,
            workshop_id,
            action,
            result,
        }) => {
            let notice = catalog::handle_registration_finished(
                &mut app.tui,
                &ticket_id,
                &workshop_id,
                action,
                result,
            );
            show_notice(app, notice);
            vec![]
        }
        UiEvent::Rating(RatingUiEvent::Submitted {
            task,
            ticket_id,
            workshop_id,
            result,
        }) => {
            handle_rating_submitted(app, task, &ticket_id, &workshop_id, result);
            vec![]
        }
        UiEvent::Admin(AdminUiEvent::Loaded {
            task,
            ticket_id,
            catalog,
            admin,
        }) => {
            admin::handle_admin_loaded(&mut app.tui, task, &ticket_id, catalog, admin);
            vec![]
        }
        UiEvent::Admin(AdminUiEvent::Withdrawn {
            task,
            ticket_id,
            participant,
            result,
        }) => {
            let notice =
                admin::handle_admin_withdrawn(&mut app.tui, task, &ticket_id, &participant, result);
            show_notice(app, notice);
            vec![]
        }
    }
}

fn show_notice(app: &mut AppState, notice: Option<NoticeState>) {
    if let Some(notice) = notice {
        app.notice = Some(notice);
    }
}

fn handle_rating_submitted(
    app: &mut AppState,
    task: TaskId,
    ticket_id: &str,
    workshop_id: &str,
    result: Result<PersonalData, String>,
) {
    if !app.tui.tasks.finish(TaskKind::Rating, task) || !app.tui.is_current_ticket(ticket_id) {
        return;
    }
    match result {
        Ok(personal) => {
            app.tui.personal = personal;
            if matches!(&app.overlay, Some(Overlay::RatingEntry(entry)) if entry.workshop_id == workshop_id)
            {
                app.overlay = None;
            }
            app.notice = Some(NoticeState::info(RATING_THANKS));
        }
        // The form stays open so the attendee can retry.
        Err(message) => app.notice = Some(NoticeState::error(message)),
    }
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => {
            handle_paste(app, &text);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_paste(app: &mut AppState, text: &str) {
    if app.notice.is_some() {
        return;
    }
    match &mut app.overlay {
        Some(Overlay::RatingEntry(entry)) => entry.paste(text),
        Some(_) => {}
        None if app.tui.session.is_none() && !app.tui.tasks.login.is_running() => {
            app.tui.login.input.push_str(text.trim());
            app.tui.login.error = None;
        }
        None => {}
    }
}

fn quit(tui: &mut TuiState) -> Vec<UiEffect> {
    tui.should_quit = true;
    vec![UiEffect::Quit]
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return quit(&mut app.tui);
    }

    // A notice blocks everything beneath it.
    if app.notice.is_some() {
        if NoticeState::dismisses(key) {
            app.notice = None;
        }
        return vec![];
    }

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(&app.tui, key);
        return apply_overlay_update(app, update);
    }

    if app.tui.session.is_none() {
        handle_logged_out_key(app, key)
    } else {
        handle_logged_in_key(app, key)
    }
}

fn handle_logged_out_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('r') if ctrl => return catalog::refresh(&mut app.tui),
        KeyCode::F(5) => return catalog::refresh(&mut app.tui),
        KeyCode::Esc => {
            if app.tui.login.input.is_empty() {
                return quit(&mut app.tui);
            }
            app.tui.login = login::LoginForm::default();
            return vec![];
        }
        _ => {}
    }
    if let Some(effects) = login::handle_key(&mut app.tui, key) {
        return effects;
    }
    let (effects, _) = catalog::handle_key(&mut app.tui, key);
    effects
}

fn handle_logged_in_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.code == KeyCode::Char('l') {
        return logout(app);
    }
    let tui = &mut app.tui;
    match (key.code, tui.screen) {
        (KeyCode::Char('q'), _) => return quit(tui),
        (KeyCode::Char('r') | KeyCode::F(5), _) => return refresh(tui),
        (KeyCode::Char('a'), Screen::Admin) | (KeyCode::Esc, Screen::Admin) => {
            tui.screen = Screen::Catalog;
            return vec![];
        }
        (KeyCode::Char('a'), _) => return admin::enter(tui),
        (KeyCode::Tab | KeyCode::BackTab, Screen::Catalog) => {
            tui.screen = Screen::MyRegistrations;
            return vec![];
        }
        (KeyCode::Tab | KeyCode::BackTab, Screen::MyRegistrations) => {
            tui.screen = Screen::Catalog;
            return vec![];
        }
        _ => {}
    }

    let (effects, overlay) = match tui.screen {
        Screen::Catalog | Screen::MyRegistrations => catalog::handle_key(tui, key),
        Screen::Admin => admin::handle_key(tui, key),
    };
    if overlay.is_some() {
        app.overlay = overlay;
    }
    effects
}

/// Manual refresh: the admin reload re-fetches the catalog itself.
fn refresh(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.screen == Screen::Admin {
        let mut effects = admin::load(tui);
        effects.extend(catalog::load_personal(tui));
        effects
    } else {
        catalog::refresh(tui)
    }
}

fn logout(app: &mut AppState) -> Vec<UiEffect> {
    app.tui.reset_session_data();
    app.overlay = None;
    app.notice = None;
    vec![UiEffect::ClearSession]
}

fn apply_overlay_update(app: &mut AppState, update: OverlayUpdate) -> Vec<UiEffect> {
    let effects = match update.action {
        Some(OverlayAction::SubmitRating { workshop_id, draft }) => {
            start_rating(&mut app.tui, workshop_id, draft)
        }
        Some(OverlayAction::AdminWithdraw {
            ticket_id,
            workshop_id,
            participant,
        }) => admin::withdraw(&mut app.tui, ticket_id, workshop_id, participant),
        None => vec![],
    };
    if update.transition == OverlayTransition::Close {
        app.overlay = None;
    }
    show_notice(app, update.notice);
    effects
}

fn start_rating(tui: &mut TuiState, workshop_id: String, draft: RatingDraft) -> Vec<UiEffect> {
    if tui.tasks.rating.is_running() {
        return vec![];
    }
    let Some(ticket_id) = tui.ticket_id().map(str::to_string) else {
        return vec![];
    };
    let task = tui.tasks.start(TaskKind::Rating);
    vec![UiEffect::SubmitRating {
        task,
        ticket_id,
        workshop_id,
        draft,
    }]
}
