//! Overlay modules for the TUI.
//!
//! Overlays are modal dialogs that take over keyboard input until closed.
//! Each one owns its state, key handler, and render function.
//!
//! - `rating_entry.rs`: the star-rating form for an attended workshop
//! - `ratings_summary.rs`: aggregate and individual ratings (admin)
//! - `confirm_withdraw.rs`: confirmation before an admin withdraws someone
//! - `notice.rs`: blocking info/error message, drawn above everything
//! - `render_utils.rs`: shared box, hint, and input-line drawing
//!
//! Overlays never start tasks themselves. They report what the user asked
//! for as an [`OverlayAction`] and the reducer turns it into effects.

pub mod confirm_withdraw;
pub mod notice;
pub mod rating_entry;
pub mod ratings_summary;
pub mod render_utils;

pub use confirm_withdraw::ConfirmWithdrawState;
use crossterm::event::KeyEvent;
pub use notice::{NoticeKind, NoticeState};
use ratatui::Frame;
use ratatui::layout::Rect;
pub use rating_entry::RatingEntryState;
pub use ratings_summary::RatingsSummaryState;
use wsreg_core::rating::RatingDraft;

use crate::state::TuiState;

/// What an overlay wants the reducer to do on its behalf.
#[derive(Debug)]
pub enum OverlayAction {
    SubmitRating {
        workshop_id: String,
        draft: RatingDraft,
    },
    AdminWithdraw {
        ticket_id: String,
        workshop_id: String,
        participant: String,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub action: Option<OverlayAction>,
    pub notice: Option<NoticeState>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            action: None,
            notice: None,
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    #[must_use]
    pub fn with_action(mut self, action: OverlayAction) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn with_notice(mut self, notice: NoticeState) -> Self {
        self.notice = Some(notice);
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    RatingEntry(RatingEntryState),
    RatingsSummary(RatingsSummaryState),
    ConfirmWithdraw(ConfirmWithdrawState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        match self {
            Overlay::RatingEntry(o) => o.render(frame, area, tui),
            Overlay::RatingsSummary(o) => o.render(frame, area, tui),
            Overlay::ConfirmWithdraw(o) => o.render(frame, area, tui),
        }
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::RatingEntry(o) => o.handle_key(tui, key),
            Overlay::RatingsSummary(o) => o.handle_key(tui, key),
            Overlay::ConfirmWithdraw(o) => o.handle_key(tui, key),
        }
    }
}

/// Extension trait for `Option<Overlay>`.
pub trait OverlayExt {
    fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        if let Some(overlay) = self {
            overlay.render(frame, area, tui);
        }
    }
}
