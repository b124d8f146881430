//! Workshop catalog and "my registrations" feature slice.
//!
//! Both screens read the same source collections (catalog plus personal
//! data) and only keep their own cursor.

mod render;
mod update;

pub(crate) use render::spinner;
pub use render::{render_catalog, render_my_registrations};
pub use update::{
    handle_catalog_loaded, handle_key, handle_personal_loaded, handle_registration_finished,
    load_catalog, load_personal, refresh,
};

/// Cursor positions for the catalog and "my registrations" lists.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub selected: usize,
    pub mine_selected: usize,
}

/// Moves `index` by `delta` inside `0..len`.
pub(crate) fn step_selection(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}
