//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never performs I/O or spawns tasks directly.

use wsreg_core::models::{Identity, Workshop};
use wsreg_core::rating::RatingDraft;

use crate::common::TaskId;
use crate::events::RegistrationAction;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Re-fetch the public catalog.
    LoadCatalog { task: TaskId },

    /// Re-fetch the attendee's registrations and ratings.
    LoadPersonal { task: TaskId, ticket_id: String },

    /// Log in with an already normalized ticket id.
    Login { task: TaskId, ticket_id: String },

    /// Remove the persisted session.
    ClearSession,

    /// Register for or withdraw from one workshop.
    Registration {
        ticket_id: String,
        workshop_id: String,
        action: RegistrationAction,
    },

    SubmitRating {
        task: TaskId,
        ticket_id: String,
        workshop_id: String,
        draft: RatingDraft,
    },

    /// Reload catalog and admin dashboard data.
    ///
    /// `fallback_catalog` is used for scoping if the catalog fetch fails.
    LoadAdmin {
        task: TaskId,
        admin: Identity,
        fallback_catalog: Vec<Workshop>,
    },

    /// Force-withdraw a participant (already confirmed by the user).
    AdminWithdraw {
        task: TaskId,
        admin: Identity,
        ticket_id: String,
        workshop_id: String,
        participant: String,
        fallback_catalog: Vec<Workshop>,
    },
}
