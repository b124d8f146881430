//! Shared helpers for the TUI.

pub mod task;
pub mod text;

pub use task::{TaskId, TaskKind, TaskSeq, TaskState, Tasks};
pub use text::{truncate_start_with_ellipsis, truncate_with_ellipsis, wrap};
