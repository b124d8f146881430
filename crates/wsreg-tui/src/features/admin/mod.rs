//! Admin dashboard feature slice.
//!
//! Lists the workshops the admin may manage next to their participants.
//! Ratings open in an overlay; withdrawals go through a confirmation
//! overlay first.

mod render;
mod update;

pub use render::render_admin;
pub use update::{
    enter, handle_admin_loaded, handle_admin_withdrawn, handle_key, load, selected_workshop,
    withdraw,
};

/// Which pane Up/Down moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminFocus {
    #[default]
    Workshops,
    Participants,
}

#[derive(Debug, Clone, Default)]
pub struct AdminViewState {
    pub focus: AdminFocus,
    pub workshop: usize,
    pub participant: usize,
}
