//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── session: Option<Identity>   (logged-in attendee)
//! │   ├── catalog: Vec<Workshop>      (server-owned, replaced wholesale)
//! │   ├── personal: PersonalData      (own registrations + ratings)
//! │   ├── admin: AdminData            (dashboard data, admins only)
//! │   ├── login / catalog_view / admin_view  (per-feature UI state)
//! │   └── tasks: Tasks                (in-flight requests)
//! ├── overlay: Option<Overlay>        (modal dialogs)
//! └── notice: Option<NoticeState>     (blocking message, drawn above overlays)
//! ```
//!
//! Derived facts (spots left, registered, rated, manageable) are never
//! stored here. Render code asks for them through the projection helpers on
//! `TuiState`, which recompute them from the source collections.

use wsreg_core::models::{Identity, Workshop};
use wsreg_core::reconcile::{self, AdminData, MyRegistration, PersonalData, WorkshopView};

use crate::admin::AdminViewState;
use crate::catalog::CatalogState;
use crate::common::Tasks;
use crate::login::LoginForm;
use crate::overlays::{NoticeState, Overlay};

/// Combined application state for the TUI.
///
/// Overlays live beside `TuiState` so overlay handlers can borrow both.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
    pub notice: Option<NoticeState>,
}

impl AppState {
    pub fn new(session: Option<Identity>) -> Self {
        Self {
            tui: TuiState::new(session),
            overlay: None,
            notice: None,
        }
    }
}

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Catalog,
    MyRegistrations,
    Admin,
}

/// TUI application state (non-overlay).
pub struct TuiState {
    pub should_quit: bool,
    pub screen: Screen,
    pub session: Option<Identity>,
    pub catalog: Vec<Workshop>,
    /// At least one catalog fetch has completed.
    pub catalog_loaded: bool,
    pub personal: PersonalData,
    pub admin: AdminData,
    pub login: LoginForm,
    pub catalog_view: CatalogState,
    pub admin_view: AdminViewState,
    pub tasks: Tasks,
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(session: Option<Identity>) -> Self {
        Self {
            should_quit: false,
            screen: Screen::default(),
            session,
            catalog: Vec::new(),
            catalog_loaded: false,
            personal: PersonalData::default(),
            admin: AdminData::default(),
            login: LoginForm::default(),
            catalog_view: CatalogState::default(),
            admin_view: AdminViewState::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
        }
    }

    pub fn ticket_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.ticket_id.as_str())
    }

    /// True when `ticket_id` belongs to the current session.
    pub fn is_current_ticket(&self, ticket_id: &str) -> bool {
        self.ticket_id() == Some(ticket_id)
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_admin)
    }

    pub fn workshop_views(&self) -> Vec<WorkshopView<'_>> {
        reconcile::workshop_views(
            &self.catalog,
            self.session.as_ref(),
            &self.personal,
            &self.tasks.workshops,
        )
    }

    pub fn my_registrations(&self) -> Vec<MyRegistration<'_>> {
        reconcile::my_registrations(&self.catalog, &self.personal)
    }

    /// Workshops the admin may see, in catalog order. Empty for non-admins.
    pub fn accessible_workshops(&self) -> Vec<&Workshop> {
        match &self.session {
            Some(identity) if identity.is_admin => {
                reconcile::accessible_workshops(&identity.admin_scope, &self.catalog)
            }
            _ => Vec::new(),
        }
    }

    /// Drops everything tied to the logged-in identity.
    pub fn reset_session_data(&mut self) {
        self.session = None;
        self.personal = PersonalData::default();
        self.admin = AdminData::default();
        self.tasks.clear_session();
        self.screen = Screen::Catalog;
        self.catalog_view.mine_selected = 0;
        self.admin_view = AdminViewState::default();
    }
}
