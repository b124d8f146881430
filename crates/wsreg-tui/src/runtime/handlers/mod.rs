//! Effect handlers for the TUI runtime.
//!
//! Handlers are plain async functions that perform I/O through
//! `wsreg_core` and return the `UiEvent` describing the outcome. The runtime
//! spawns them and posts the result to the inbox. They never touch state.

pub mod admin;
pub mod catalog;
pub mod rating;
pub mod registration;
pub mod session;

pub use admin::*;
pub use catalog::*;
pub use rating::*;
pub use registration::*;
pub use session::*;
