//! Core library for the wsreg workshop registration client.
//!
//! Everything that is not presentation lives here: the HTTP API client,
//! the persisted session, the view state reconciler and the action
//! orchestration shared by the TUI and the one-shot CLI commands.

pub mod actions;
pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod rating;
pub mod reconcile;
pub mod session;
pub mod stats;
pub mod text;
