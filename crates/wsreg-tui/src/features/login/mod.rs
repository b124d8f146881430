//! Ticket login feature slice.
//!
//! While logged out the header hosts a ticket field. Printable keys edit it,
//! Enter submits. The whole form is locked while a login is in flight.

mod render;
mod update;

pub use render::render_login_bar;
pub use update::{handle_key, handle_login_finished, submit};

/// Ticket field contents and the last inline error.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub input: String,
    pub error: Option<String>,
}
