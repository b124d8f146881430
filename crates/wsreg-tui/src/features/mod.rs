//! Feature slices for the TUI (state/update/render per slice).

pub mod admin;
pub mod catalog;
pub mod login;
