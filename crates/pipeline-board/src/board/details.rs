//! Selection and details editing.
//!
//! The coordinator keeps a copy of the selected card for the details view and
//! re-reads it from the store after every edit so the two never drift apart.

use tracing::debug;

use super::domain::{Application, ApplicationId, ApplicationPatch, ColumnId};
use super::store::{BoardError, BoardStore};

/// Downward drag distance past which the compact sheet dismisses itself.
pub const SHEET_DISMISS_DISTANCE: f32 = 100.0;

#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    selected: Option<Application>,
    open: bool,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the details for `id`. Leaves the selection untouched when the
    /// card is not on the board.
    pub fn select(
        &mut self,
        store: &BoardStore,
        id: &ApplicationId,
    ) -> Result<&Application, BoardError> {
        let application = store
            .find_application(id)
            .cloned()
            .ok_or_else(|| BoardError::ApplicationNotFound(id.clone()))?;

        self.open = true;
        Ok(&*self.selected.insert(application))
    }

    pub fn close(&mut self) {
        self.open = false;
        self.selected = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> Option<&Application> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<&ApplicationId> {
        self.selected.as_ref().map(|application| &application.id)
    }

    /// Stage currently holding the selected card.
    pub fn selected_column(&self) -> Option<ColumnId> {
        self.selected.as_ref().map(|application| application.column_id)
    }

    /// Routes an edit into the store and refreshes the held copy when the
    /// edited card is the selected one.
    pub fn apply_edit(
        &mut self,
        store: &mut BoardStore,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<Application, BoardError> {
        let updated = store.update_application(id, patch)?;
        if self.selected_id() == Some(id) {
            self.selected = Some(updated.clone());
        }
        Ok(updated)
    }

    /// Re-reads the selected card after board changes such as drops. A card
    /// that vanished closes the details.
    pub fn refresh(&mut self, store: &BoardStore) {
        let Some(id) = self.selected_id().cloned() else {
            return;
        };
        match store.find_application(&id) {
            Some(application) => self.selected = Some(application.clone()),
            None => {
                debug!(application = %id, "selected application left the board");
                self.close();
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing {
        snapshot: Application,
        draft: Application,
    },
}

/// Edit/save/cancel contract shared by both details variants.
#[derive(Debug, Clone, Default)]
pub struct DetailsEditor {
    mode: EditMode,
}

impl DetailsEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing { .. })
    }

    /// Snapshots `application` and starts editing a draft copy of it.
    pub fn begin(&mut self, application: &Application) {
        self.mode = EditMode::Editing {
            snapshot: application.clone(),
            draft: application.clone(),
        };
    }

    pub fn draft(&self) -> Option<&Application> {
        match &self.mode {
            EditMode::Editing { draft, .. } => Some(draft),
            EditMode::Viewing => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Application> {
        match &mut self.mode {
            EditMode::Editing { draft, .. } => Some(draft),
            EditMode::Viewing => None,
        }
    }

    /// Keeps the stage of the snapshot and draft in line with `application`
    /// after it was moved. Edits to other fields are left alone.
    pub fn follow(&mut self, application: &Application) {
        if let EditMode::Editing { snapshot, draft } = &mut self.mode {
            if snapshot.id == application.id {
                snapshot.column_id = application.column_id;
                draft.column_id = application.column_id;
            }
        }
    }

    /// Discards the draft and hands back the values captured on entry.
    pub fn cancel(&mut self) -> Option<Application> {
        match std::mem::take(&mut self.mode) {
            EditMode::Editing { snapshot, .. } => Some(snapshot),
            EditMode::Viewing => None,
        }
    }

    /// Submits the draft as a single merge. On failure the draft is kept so
    /// the input is not lost.
    pub fn save(
        &mut self,
        coordinator: &mut SelectionCoordinator,
        store: &mut BoardStore,
    ) -> Result<Option<Application>, BoardError> {
        let EditMode::Editing { snapshot, draft } = std::mem::take(&mut self.mode) else {
            return Ok(None);
        };

        let patch = ApplicationPatch::from_application(&draft);
        match coordinator.apply_edit(store, &snapshot.id, &patch) {
            Ok(updated) => Ok(Some(updated)),
            Err(error) => {
                self.mode = EditMode::Editing { snapshot, draft };
                Err(error)
            }
        }
    }
}

/// Swipe-down tracking for the compact sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SheetSwipe {
    start_y: Option<f32>,
    offset: f32,
}

impl SheetSwipe {
    pub fn touch_start(&mut self, y: f32) {
        self.start_y = Some(y);
        self.offset = 0.0;
    }

    /// Returns the current downward offset; upward motion is ignored.
    pub fn touch_move(&mut self, y: f32) -> f32 {
        if let Some(start) = self.start_y {
            let delta = y - start;
            if delta > 0.0 {
                self.offset = delta;
            }
        }
        self.offset
    }

    /// Ends the swipe and reports whether the sheet should close.
    pub fn touch_end(&mut self) -> bool {
        let dismiss = self.offset > SHEET_DISMISS_DISTANCE;
        *self = Self::default();
        dismiss
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }
}
