//! Admin dashboard reducer.

use crossterm::event::{KeyCode, KeyEvent};
use wsreg_core::actions::{AdminRefreshed, admin_withdraw_success};
use wsreg_core::models::Workshop;
use wsreg_core::reconcile::AdminData;

use super::AdminFocus;
use crate::catalog::step_selection;
use crate::common::{TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::overlays::{ConfirmWithdrawState, NoticeState, Overlay, RatingsSummaryState};
use crate::state::{Screen, TuiState};

/// Starts an admin reload (catalog re-fetch included). No-op for non-admins.
pub fn load(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(admin) = tui.session.clone().filter(|s| s.is_admin) else {
        return vec![];
    };
    let task = tui.tasks.start(TaskKind::Admin);
    vec![UiEffect::LoadAdmin {
        task,
        admin,
        fallback_catalog: tui.catalog.clone(),
    }]
}

/// Switches to the dashboard and loads it.
pub fn enter(tui: &mut TuiState) -> Vec<UiEffect> {
    if !tui.is_admin() {
        return vec![];
    }
    tui.screen = Screen::Admin;
    load(tui)
}

pub fn selected_workshop(tui: &TuiState) -> Option<&Workshop> {
    tui.accessible_workshops()
        .get(tui.admin_view.workshop)
        .copied()
}

pub fn handle_admin_loaded(
    tui: &mut TuiState,
    task: TaskId,
    ticket_id: &str,
    catalog: Option<Vec<Workshop>>,
    admin: AdminData,
) {
    if !tui.tasks.finish(TaskKind::Admin, task) || !tui.is_current_ticket(ticket_id) {
        return;
    }
    if let Some(catalog) = catalog {
        tui.catalog = catalog;
        tui.catalog_loaded = true;
    }
    tui.admin = admin;
    clamp_selection(tui);
}

pub fn handle_admin_withdrawn(
    tui: &mut TuiState,
    task: TaskId,
    ticket_id: &str,
    participant: &str,
    result: Result<AdminRefreshed, String>,
) -> Option<NoticeState> {
    if !tui.tasks.finish(TaskKind::AdminWithdraw, task) || !tui.is_current_ticket(ticket_id) {
        return None;
    }
    match result {
        Ok(refreshed) => {
            if let Some(catalog) = refreshed.catalog {
                tui.catalog = catalog;
            }
            tui.admin = refreshed.admin;
            clamp_selection(tui);
            Some(NoticeState::info(admin_withdraw_success(participant)))
        }
        Err(message) => Some(NoticeState::error(message)),
    }
}

/// Force-withdraw after the user confirmed it.
pub fn withdraw(
    tui: &mut TuiState,
    ticket_id: String,
    workshop_id: String,
    participant: String,
) -> Vec<UiEffect> {
    if tui.tasks.admin_busy() {
        return vec![];
    }
    let Some(admin) = tui.session.clone().filter(|s| s.is_admin) else {
        return vec![];
    };
    let task = tui.tasks.start(TaskKind::AdminWithdraw);
    vec![UiEffect::AdminWithdraw {
        task,
        admin,
        ticket_id,
        workshop_id,
        participant,
        fallback_catalog: tui.catalog.clone(),
    }]
}

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> (Vec<UiEffect>, Option<Overlay>) {
    match key.code {
        KeyCode::Left => tui.admin_view.focus = AdminFocus::Workshops,
        KeyCode::Right | KeyCode::Tab => tui.admin_view.focus = AdminFocus::Participants,
        KeyCode::BackTab => tui.admin_view.focus = AdminFocus::Workshops,
        KeyCode::Up | KeyCode::Char('k') => move_selection(tui, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(tui, 1),
        KeyCode::Char('v') | KeyCode::Enter => return (vec![], open_ratings(tui)),
        KeyCode::Char('d') | KeyCode::Delete => return (vec![], confirm_withdraw(tui)),
        _ => {}
    }
    (vec![], None)
}

fn move_selection(tui: &mut TuiState, delta: isize) {
    match tui.admin_view.focus {
        AdminFocus::Workshops => {
            let len = tui.accessible_workshops().len();
            let next = step_selection(tui.admin_view.workshop, delta, len);
            if next != tui.admin_view.workshop {
                tui.admin_view.workshop = next;
                tui.admin_view.participant = 0;
            }
        }
        AdminFocus::Participants => {
            let len = participant_count(tui);
            tui.admin_view.participant = step_selection(tui.admin_view.participant, delta, len);
        }
    }
}

fn participant_count(tui: &TuiState) -> usize {
    selected_workshop(tui).map_or(0, |w| tui.admin.participants(&w.id).len())
}

fn clamp_selection(tui: &mut TuiState) {
    let workshops = tui.accessible_workshops().len();
    tui.admin_view.workshop = step_selection(tui.admin_view.workshop, 0, workshops);
    let participants = participant_count(tui);
    tui.admin_view.participant = step_selection(tui.admin_view.participant, 0, participants);
}

/// Ratings overlay for the selected workshop. Disabled without ratings.
fn open_ratings(tui: &TuiState) -> Option<Overlay> {
    let workshop = selected_workshop(tui)?;
    if tui.admin.ratings_for(&workshop.id).is_empty() {
        return None;
    }
    Some(Overlay::RatingsSummary(RatingsSummaryState::open(
        workshop.id.clone(),
        workshop.title.clone(),
    )))
}

fn confirm_withdraw(tui: &TuiState) -> Option<Overlay> {
    if tui.tasks.admin_busy() {
        return None;
    }
    let workshop = selected_workshop(tui)?;
    let identity = tui.session.as_ref()?;
    if !identity.can_administer(&workshop.id) {
        return None;
    }
    let registration = tui
        .admin
        .participants(&workshop.id)
        .get(tui.admin_view.participant)?;
    Some(Overlay::ConfirmWithdraw(ConfirmWithdrawState {
        ticket_id: registration.ticket_id.clone(),
        workshop_id: workshop.id.clone(),
        participant: registration.participant_name(),
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crossterm::event::KeyModifiers;
    use wsreg_core::models::{AdminScope, Identity, LearnedSomething, Rating, Registration};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn workshop(id: &str) -> Workshop {
        Workshop {
            id: id.to_string(),
            title: format!("Workshop {id}"),
            time: String::new(),
            location: String::new(),
            speakers: Vec::new(),
            abstract_html: String::new(),
            max_capacity: 10,
            current_registrations: 1,
        }
    }

    fn registration(ticket: &str, workshop_id: &str) -> Registration {
        Registration {
            ticket_id: ticket.to_string(),
            workshop_id: workshop_id.to_string(),
            registration_time: String::new(),
            first_name: Some("Bo".to_string()),
            last_name: Some("Li".to_string()),
        }
    }

    fn admin_tui(scope: AdminScope) -> TuiState {
        let mut tui = TuiState::new(Some(Identity {
            ticket_id: "ADMIN".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            is_admin: true,
            admin_scope: scope,
        }));
        tui.catalog = vec![workshop("w1"), workshop("w2"), workshop("w3")];
        tui.screen = Screen::Admin;
        tui.admin = AdminData {
            registrations_by_workshop: HashMap::from([(
                "w2".to_string(),
                vec![registration("T-2", "w2")],
            )]),
            ratings_by_workshop: HashMap::new(),
        };
        tui
    }

    #[test]
    fn test_enter_requires_admin() {
        let mut tui = TuiState::new(None);
        assert!(enter(&mut tui).is_empty());
        assert_eq!(tui.screen, Screen::Catalog);
    }

    #[test]
    fn test_scope_limits_visible_workshops() {
        let tui = admin_tui(AdminScope::Workshops(vec!["w3".into(), "w2".into()]));
        let ids: Vec<&str> = tui
            .accessible_workshops()
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ids, ["w2", "w3"]);
    }

    #[test]
    fn test_delete_opens_confirmation_for_selected_participant() {
        let mut tui = admin_tui(AdminScope::Workshops(vec!["w2".into()]));

        let (_, overlay) = handle_key(&mut tui, key(KeyCode::Char('d')));

        match overlay {
            Some(Overlay::ConfirmWithdraw(confirm)) => {
                assert_eq!(confirm.ticket_id, "T-2");
                assert_eq!(confirm.workshop_id, "w2");
                assert_eq!(confirm.participant, "Bo Li");
            }
            other => panic!("expected confirmation, got {other:?}"),
        }
    }

    #[test]
    fn test_controls_locked_while_admin_busy() {
        let mut tui = admin_tui(AdminScope::AllWorkshops);
        tui.admin_view.workshop = 1;
        tui.tasks.start(TaskKind::Admin);

        let (_, overlay) = handle_key(&mut tui, key(KeyCode::Delete));
        assert!(overlay.is_none());
        assert!(withdraw(&mut tui, "T-2".into(), "w2".into(), "Bo Li".into()).is_empty());
    }

    #[test]
    fn test_ratings_overlay_disabled_without_ratings() {
        let mut tui = admin_tui(AdminScope::AllWorkshops);
        let (_, overlay) = handle_key(&mut tui, key(KeyCode::Char('v')));
        assert!(overlay.is_none());

        tui.admin.ratings_by_workshop.insert(
            "w1".to_string(),
            vec![Rating {
                ticket_id: "T-9".to_string(),
                workshop_id: "w1".to_string(),
                content_satisfaction: 5,
                speaker_effectiveness: 5,
                learned_something: Some(LearnedSomething::Yes),
                additional_feedback: None,
                submitted_at: String::new(),
                first_name: None,
                last_name: None,
            }],
        );
        let (_, overlay) = handle_key(&mut tui, key(KeyCode::Char('v')));
        assert!(matches!(overlay, Some(Overlay::RatingsSummary(_))));
    }

    #[test]
    fn test_withdraw_success_shows_named_notice() {
        let mut tui = admin_tui(AdminScope::AllWorkshops);
        let task = match withdraw(&mut tui, "T-2".into(), "w2".into(), "Bo Li".into()).pop() {
            Some(UiEffect::AdminWithdraw { task, .. }) => task,
            other => panic!("expected withdraw effect, got {other:?}"),
        };

        let notice = handle_admin_withdrawn(
            &mut tui,
            task,
            "ADMIN",
            "Bo Li",
            Ok(AdminRefreshed {
                catalog: None,
                admin: AdminData::default(),
            }),
        );

        assert_eq!(
            notice.map(|n| n.message).as_deref(),
            Some("Successfully withdrew Bo Li from the workshop.")
        );
        assert!(tui.admin.is_empty());
        assert!(!tui.tasks.admin_busy());
    }

    #[test]
    fn test_loaded_result_after_logout_is_dropped() {
        let mut tui = admin_tui(AdminScope::AllWorkshops);
        let task = match load(&mut tui).pop() {
            Some(UiEffect::LoadAdmin { task, .. }) => task,
            other => panic!("expected admin load, got {other:?}"),
        };
        tui.reset_session_data();

        handle_admin_loaded(&mut tui, task, "ADMIN", None, AdminData::default());

        assert!(tui.session.is_none());
        assert!(!tui.tasks.admin_busy());
    }
}
