//! UI event types.
//!
//! All external inputs (terminal and async results) are converted to `UiEvent`
//! before being processed by the reducer.
//!
//! Results-only events: in-flight flags are set by the reducer when it emits
//! the matching effect, and cleared here when the result arrives. Every
//! result carries the task id it was started under, so results that were
//! superseded (or belong to a session that has since been cleared) are
//! recognized and dropped.

use crossterm::event::Event as CrosstermEvent;
use wsreg_core::actions::{AdminRefreshed, LoginOutcome, Refreshed};
use wsreg_core::models::Workshop;
use wsreg_core::reconcile::{AdminData, PersonalData};

use crate::common::TaskId;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (drives the spinner).
    Tick,

    /// Raw terminal input.
    Terminal(CrosstermEvent),

    Catalog(CatalogUiEvent),
    Session(SessionUiEvent),
    Registration(RegistrationUiEvent),
    Rating(RatingUiEvent),
    Admin(AdminUiEvent),
}

#[derive(Debug)]
pub enum CatalogUiEvent {
    /// `None` when the fetch failed; the previous catalog stays.
    Loaded {
        task: TaskId,
        workshops: Option<Vec<Workshop>>,
    },
}

#[derive(Debug)]
pub enum SessionUiEvent {
    LoginFinished {
        task: TaskId,
        result: Result<LoginOutcome, String>,
    },
    PersonalLoaded {
        task: TaskId,
        ticket_id: String,
        personal: PersonalData,
    },
}

/// Which self-service mutation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationAction {
    Register,
    Withdraw,
}

#[derive(Debug)]
pub enum RegistrationUiEvent {
    Finished {
        ticket_id: String,
        workshop_id: String,
        action: RegistrationAction,
        result: Result<Refreshed, String>,
    },
}

#[derive(Debug)]
pub enum RatingUiEvent {
    Submitted {
        task: TaskId,
        ticket_id: String,
        workshop_id: String,
        result: Result<PersonalData, String>,
    },
}

#[derive(Debug)]
pub enum AdminUiEvent {
    Loaded {
        task: TaskId,
        ticket_id: String,
        catalog: Option<Vec<Workshop>>,
        admin: AdminData,
    },
    Withdrawn {
        task: TaskId,
        ticket_id: String,
        participant: String,
        result: Result<AdminRefreshed, String>,
    },
}
