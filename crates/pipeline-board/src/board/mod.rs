//! Kanban pipeline board.
//!
//! [`BoardStore`] owns the seven recruitment stages and the cards inside them.
//! Gestures reach it through the [`DragController`] and the selection through
//! the [`SelectionCoordinator`]; [`BoardSession`] wires the pieces together and
//! is what the HTTP router drives.

pub mod details;
pub mod domain;
pub mod drag;
pub mod keyboard;
pub mod layout;
pub mod router;
pub mod seed;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;

pub use details::{
    DetailsEditor, EditMode, SelectionCoordinator, SheetSwipe, SHEET_DISMISS_DISTANCE,
};
pub use domain::{
    Application, ApplicationId, ApplicationPatch, Column, ColumnId, NewApplication, Priority,
    StageSummary, UnknownColumn,
};
pub use drag::{
    resolve_drop, DragController, DragEvent, DragState, DropOutcome, DropPlan, DropTarget,
    IgnoreReason,
};
pub use keyboard::{DragKey, KeyboardDrag};
pub use layout::{
    visible_columns, BoardArrangement, DetailsPresentation, LayoutInputs, ViewportClass,
    ViewportWatcher,
};
pub use router::{board_router, shared_board, SharedBoard};
pub use seed::sample_applications;
pub use session::{BoardSession, BoardView, DetailsView, DragPreview};
pub use store::{
    array_move, BoardError, BoardStore, Clock, FixedClock, InvariantViolation, SystemClock,
    DEFAULT_DUE_IN_DAYS,
};
