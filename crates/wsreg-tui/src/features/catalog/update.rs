//! Catalog reducer: list navigation, self-service register/withdraw, and
//! application of catalog and personal refresh results.

use crossterm::event::{KeyCode, KeyEvent};
use wsreg_core::actions::Refreshed;
use wsreg_core::models::Workshop;
use wsreg_core::reconcile::PersonalData;

use super::step_selection;
use crate::common::{TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::events::RegistrationAction;
use crate::overlays::{NoticeState, Overlay, RatingEntryState};
use crate::state::{Screen, TuiState};

const PAGE: isize = 5;

pub fn load_catalog(tui: &mut TuiState) -> UiEffect {
    let task = tui.tasks.start(TaskKind::Catalog);
    UiEffect::LoadCatalog { task }
}

/// Personal refresh for the current session, if any.
pub fn load_personal(tui: &mut TuiState) -> Option<UiEffect> {
    let ticket_id = tui.ticket_id()?.to_string();
    let task = tui.tasks.start(TaskKind::Personal);
    Some(UiEffect::LoadPersonal { task, ticket_id })
}

/// Catalog plus personal data (when logged in).
pub fn refresh(tui: &mut TuiState) -> Vec<UiEffect> {
    let mut effects = vec![load_catalog(tui)];
    effects.extend(load_personal(tui));
    effects
}

pub fn handle_catalog_loaded(tui: &mut TuiState, task: TaskId, workshops: Option<Vec<Workshop>>) {
    if !tui.tasks.finish(TaskKind::Catalog, task) {
        return;
    }
    tui.catalog_loaded = true;
    if let Some(workshops) = workshops {
        tui.catalog = workshops;
        clamp_selection(tui);
    }
}

pub fn handle_personal_loaded(
    tui: &mut TuiState,
    task: TaskId,
    ticket_id: &str,
    personal: PersonalData,
) {
    if !tui.tasks.finish(TaskKind::Personal, task) || !tui.is_current_ticket(ticket_id) {
        return;
    }
    tui.personal = personal;
    clamp_selection(tui);
}

/// Applies a finished register/withdraw. Failures come back as a notice.
pub fn handle_registration_finished(
    tui: &mut TuiState,
    ticket_id: &str,
    workshop_id: &str,
    action: RegistrationAction,
    result: Result<Refreshed, String>,
) -> Option<NoticeState> {
    if !tui.is_current_ticket(ticket_id) {
        tracing::debug!(ticket = ticket_id, "dropping result for a previous session");
        return None;
    }
    tui.tasks.workshops.remove(workshop_id);

    match result {
        Ok(refreshed) => {
            if let Some(catalog) = refreshed.catalog {
                tui.catalog = catalog;
            }
            tui.personal = refreshed.personal;
            clamp_selection(tui);
            None
        }
        Err(message) => {
            tracing::warn!(workshop = workshop_id, ?action, %message, "registration action failed");
            Some(NoticeState::error(message))
        }
    }
}

/// Keys for the catalog and "my registrations" screens.
///
/// May return an overlay to open (the rating form).
pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> (Vec<UiEffect>, Option<Overlay>) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(tui, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(tui, 1),
        KeyCode::PageUp => move_selection(tui, -PAGE),
        KeyCode::PageDown => move_selection(tui, PAGE),
        KeyCode::Home => move_selection(tui, isize::MIN),
        KeyCode::End => move_selection(tui, isize::MAX),
        KeyCode::Enter | KeyCode::Char(' ') => match tui.screen {
            Screen::Catalog => return (toggle_registration(tui), None),
            Screen::MyRegistrations => return (vec![], open_rating(tui)),
            Screen::Admin => {}
        },
        _ => {}
    }
    (vec![], None)
}

fn move_selection(tui: &mut TuiState, delta: isize) {
    match tui.screen {
        Screen::MyRegistrations => {
            let len = tui.my_registrations().len();
            tui.catalog_view.mine_selected = step_selection(tui.catalog_view.mine_selected, delta, len);
        }
        _ => {
            let len = tui.catalog.len();
            tui.catalog_view.selected = step_selection(tui.catalog_view.selected, delta, len);
        }
    }
}

/// Keeps both cursors inside their lists after data changes.
fn clamp_selection(tui: &mut TuiState) {
    let catalog_len = tui.catalog.len();
    let mine_len = tui.my_registrations().len();
    let view = &mut tui.catalog_view;
    view.selected = step_selection(view.selected, 0, catalog_len);
    view.mine_selected = step_selection(view.mine_selected, 0, mine_len);
}

/// Registers for or withdraws from the selected workshop.
///
/// Does nothing while logged out, for a full workshop, or while that
/// workshop's previous action is still running.
fn toggle_registration(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(ticket_id) = tui.ticket_id().map(str::to_string) else {
        return vec![];
    };
    let views = tui.workshop_views();
    let Some(view) = views.get(tui.catalog_view.selected) else {
        return vec![];
    };

    let action = if view.can_register() {
        RegistrationAction::Register
    } else if view.can_withdraw() {
        RegistrationAction::Withdraw
    } else {
        return vec![];
    };
    let workshop_id = view.workshop.id.clone();

    tui.tasks.workshops.insert(workshop_id.clone());
    vec![UiEffect::Registration {
        ticket_id,
        workshop_id,
        action,
    }]
}

fn open_rating(tui: &TuiState) -> Option<Overlay> {
    let mine = tui.my_registrations();
    let entry = mine.get(tui.catalog_view.mine_selected)?;
    if !entry.can_rate() {
        return None;
    }
    Some(Overlay::RatingEntry(RatingEntryState::open(
        entry.workshop.id.clone(),
        entry.workshop.title.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use wsreg_core::models::{AdminScope, Identity, Registration};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn workshop(id: &str, max: i64, current: i64) -> Workshop {
        Workshop {
            id: id.to_string(),
            title: format!("Workshop {id}"),
            time: "10:00".to_string(),
            location: "Room A".to_string(),
            speakers: vec!["Ada".to_string()],
            abstract_html: String::new(),
            max_capacity: max,
            current_registrations: current,
        }
    }

    fn logged_in() -> TuiState {
        let mut tui = TuiState::new(Some(Identity {
            ticket_id: "T1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_admin: false,
            admin_scope: AdminScope::default(),
        }));
        tui.catalog = vec![workshop("w1", 10, 3), workshop("w2", 5, 5)];
        tui.catalog_loaded = true;
        tui
    }

    fn registration(workshop_id: &str) -> Registration {
        Registration {
            ticket_id: "T1".to_string(),
            workshop_id: workshop_id.to_string(),
            registration_time: "2025-03-01T10:00:00Z".to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_enter_registers_and_marks_workshop_busy() {
        let mut tui = logged_in();

        let (effects, _) = handle_key(&mut tui, key(KeyCode::Enter));

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Registration { workshop_id, action: RegistrationAction::Register, .. }]
                if workshop_id == "w1"
        ));
        assert!(tui.tasks.workshops.contains("w1"));

        // Same workshop is locked until its result arrives.
        let (again, _) = handle_key(&mut tui, key(KeyCode::Enter));
        assert!(again.is_empty());
    }

    #[test]
    fn test_full_workshop_cannot_be_registered() {
        let mut tui = logged_in();
        handle_key(&mut tui, key(KeyCode::Down));

        let (effects, _) = handle_key(&mut tui, key(KeyCode::Enter));

        assert!(effects.is_empty());
    }

    #[test]
    fn test_registered_full_workshop_offers_withdraw() {
        let mut tui = logged_in();
        tui.personal.registrations.push(registration("w2"));
        handle_key(&mut tui, key(KeyCode::Down));

        let (effects, _) = handle_key(&mut tui, key(KeyCode::Enter));

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Registration { action: RegistrationAction::Withdraw, .. }]
        ));
    }

    #[test]
    fn test_logged_out_enter_does_nothing() {
        let mut tui = logged_in();
        tui.session = None;
        let (effects, _) = handle_key(&mut tui, key(KeyCode::Enter));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_registration_failure_unlocks_and_raises_notice() {
        let mut tui = logged_in();
        tui.tasks.workshops.insert("w1".to_string());

        let notice = handle_registration_finished(
            &mut tui,
            "T1",
            "w1",
            RegistrationAction::Register,
            Err("Workshop is full".to_string()),
        );

        assert_eq!(notice.map(|n| n.message).as_deref(), Some("Workshop is full"));
        assert!(tui.tasks.workshops.is_empty());
        assert!(tui.personal.registrations.is_empty());
    }

    #[test]
    fn test_registration_success_applies_refetched_data() {
        let mut tui = logged_in();
        tui.tasks.workshops.insert("w1".to_string());

        let notice = handle_registration_finished(
            &mut tui,
            "T1",
            "w1",
            RegistrationAction::Register,
            Ok(Refreshed {
                catalog: Some(vec![workshop("w1", 10, 4)]),
                personal: PersonalData {
                    registrations: vec![registration("w1")],
                    ratings: Vec::new(),
                },
            }),
        );

        assert!(notice.is_none());
        assert_eq!(tui.catalog[0].current_registrations, 4);
        assert!(tui.personal.is_registered("w1"));
    }

    #[test]
    fn test_result_for_other_ticket_is_ignored() {
        let mut tui = logged_in();
        tui.tasks.workshops.insert("w1".to_string());

        let notice = handle_registration_finished(
            &mut tui,
            "OTHER",
            "w1",
            RegistrationAction::Register,
            Err("nope".to_string()),
        );

        assert!(notice.is_none());
        assert!(tui.tasks.workshops.contains("w1"));
    }

    #[test]
    fn test_failed_catalog_refresh_keeps_previous_catalog() {
        let mut tui = logged_in();
        let task = tui.tasks.start(TaskKind::Catalog);

        handle_catalog_loaded(&mut tui, task, None);

        assert_eq!(tui.catalog.len(), 2);
        assert!(!tui.tasks.catalog.is_running());
    }

    #[test]
    fn test_stale_personal_result_is_dropped() {
        let mut tui = logged_in();
        let old = tui.tasks.start(TaskKind::Personal);
        let _new = tui.tasks.start(TaskKind::Personal);

        handle_personal_loaded(
            &mut tui,
            old,
            "T1",
            PersonalData {
                registrations: vec![registration("w1")],
                ratings: Vec::new(),
            },
        );

        assert!(tui.personal.registrations.is_empty());
    }

    #[test]
    fn test_enter_on_unrated_registration_opens_rating_form() {
        let mut tui = logged_in();
        tui.personal.registrations.push(registration("w1"));
        tui.screen = Screen::MyRegistrations;

        let (_, overlay) = handle_key(&mut tui, key(KeyCode::Enter));

        assert!(matches!(
            overlay,
            Some(Overlay::RatingEntry(ref entry)) if entry.workshop_id == "w1"
        ));
    }
}
