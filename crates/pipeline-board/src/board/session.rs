use serde::Serialize;
use tracing::debug;

use super::details::{DetailsEditor, SelectionCoordinator, SheetSwipe};
use super::domain::{
    Application, ApplicationId, ApplicationPatch, Column, ColumnId, NewApplication, StageSummary,
};
use super::drag::{DragController, DragEvent, DropOutcome, DropTarget};
use super::keyboard::{DragKey, KeyboardDrag};
use super::layout::{
    visible_columns, BoardArrangement, DetailsPresentation, LayoutInputs, ViewportClass,
    ViewportWatcher,
};
use super::store::{BoardError, BoardStore};

#[derive(Debug, Clone, Serialize)]
pub struct DragPreview {
    pub active_id: ApplicationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over: Option<DropTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub presentation: DetailsPresentation,
    pub application: Application,
    pub stage_title: String,
    pub editing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<Application>,
}

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub viewport: ViewportClass,
    pub width: u32,
    pub arrangement: BoardArrangement,
    pub selected_stage: ColumnId,
    pub stages: Vec<StageSummary>,
    pub columns: Vec<Column>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag: Option<DragPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailsView>,
}

/// Wires the store, drag controller, selection and viewport together. All
/// board mutations go through here so they happen in dispatch order.
#[derive(Debug)]
pub struct BoardSession {
    store: BoardStore,
    drag: DragController,
    keyboard: KeyboardDrag,
    selection: SelectionCoordinator,
    editor: DetailsEditor,
    sheet: SheetSwipe,
    viewport: ViewportWatcher,
    selected_stage: ColumnId,
}

impl BoardSession {
    pub fn new(store: BoardStore) -> Self {
        Self {
            store,
            drag: DragController::new(),
            keyboard: KeyboardDrag::new(),
            selection: SelectionCoordinator::new(),
            editor: DetailsEditor::new(),
            sheet: SheetSwipe::default(),
            viewport: ViewportWatcher::default(),
            selected_stage: ColumnId::LongList,
        }
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    pub fn editor(&self) -> &DetailsEditor {
        &self.editor
    }

    pub fn keyboard(&self) -> &KeyboardDrag {
        &self.keyboard
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport.class()
    }

    pub fn selected_stage(&self) -> ColumnId {
        self.selected_stage
    }

    /// Pointer drag start. Takes over from any card lifted by keyboard.
    pub fn drag_start(&mut self, active: ApplicationId) {
        self.keyboard.reset();
        self.drag.start(active);
    }

    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        self.drag.over(target);
    }

    pub fn drag_cancel(&mut self) {
        self.keyboard.reset();
        self.drag.cancel();
    }

    pub fn drag_end(&mut self, target: Option<DropTarget>) -> DropOutcome {
        self.keyboard.reset();
        self.finish_drag(target)
    }

    pub fn handle_drag(&mut self, event: DragEvent) -> Option<DropOutcome> {
        match event {
            DragEvent::Start(active) => {
                self.drag_start(active);
                None
            }
            DragEvent::Over(target) => {
                self.drag_over(target);
                None
            }
            DragEvent::End(target) => Some(self.drag_end(target)),
        }
    }

    /// Keyboard dragging; `focused` is the card holding keyboard focus.
    pub fn press_key(&mut self, key: DragKey, focused: Option<&ApplicationId>) -> Option<DropOutcome> {
        match self.keyboard.press(key, focused, &self.store)? {
            DragEvent::Start(active) => {
                self.drag.start(active);
                None
            }
            DragEvent::Over(target) => {
                self.drag.over(target);
                None
            }
            DragEvent::End(target) => Some(self.finish_drag(target)),
        }
    }

    fn finish_drag(&mut self, target: Option<DropTarget>) -> DropOutcome {
        let outcome = self.drag.end(target, &mut self.store);
        if outcome.changed_board() {
            self.selection.refresh(&self.store);
            match self.selection.selected() {
                Some(application) => self.editor.follow(application),
                None => self.editor = DetailsEditor::new(),
            }
        }
        outcome
    }

    /// Card click. Clicks that land while a drag is in flight are swallowed.
    pub fn click(&mut self, id: &ApplicationId) -> Result<Option<&Application>, BoardError> {
        if self.drag.is_dragging() {
            debug!(application = %id, "click ignored during drag");
            return Ok(None);
        }
        self.selection.select(&self.store, id)?;
        self.editor = DetailsEditor::new();
        self.sheet = SheetSwipe::default();
        Ok(self.selection.selected())
    }

    pub fn close_details(&mut self) {
        self.selection.close();
        self.editor = DetailsEditor::new();
        self.sheet = SheetSwipe::default();
    }

    /// Escape closes the details view when it is open.
    pub fn escape(&mut self) -> bool {
        if !self.selection.is_open() {
            return false;
        }
        self.close_details();
        true
    }

    pub fn add_application(&mut self, column: ColumnId, fields: NewApplication) -> Application {
        self.store.add_application(column, fields)
    }

    pub fn apply_edit(
        &mut self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<Application, BoardError> {
        self.selection.apply_edit(&mut self.store, id, patch)
    }

    /// Enters edit mode for the selected card.
    pub fn begin_edit(&mut self) -> bool {
        match self.selection.selected() {
            Some(application) => {
                self.editor.begin(application);
                true
            }
            None => false,
        }
    }

    /// Changes the draft in place; returns false outside edit mode.
    pub fn edit_draft(&mut self, change: impl FnOnce(&mut Application)) -> bool {
        match self.editor.draft_mut() {
            Some(draft) => {
                change(draft);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) -> Option<Application> {
        self.editor.cancel()
    }

    pub fn save_edit(&mut self) -> Result<Option<Application>, BoardError> {
        self.editor.save(&mut self.selection, &mut self.store)
    }

    pub fn select_stage(&mut self, stage: ColumnId) {
        self.selected_stage = stage;
    }

    pub fn resize(&mut self, width: u32) -> Option<ViewportClass> {
        self.viewport.resize(width)
    }

    pub fn sheet_touch_start(&mut self, y: f32) {
        self.sheet.touch_start(y);
    }

    pub fn sheet_touch_move(&mut self, y: f32) -> f32 {
        self.sheet.touch_move(y)
    }

    /// Finishes a swipe on the compact sheet, closing it when pulled far enough.
    pub fn sheet_touch_end(&mut self) -> bool {
        let dismiss = self.sheet.touch_end();
        let compact = self.viewport.class().details_presentation() == DetailsPresentation::Sheet;
        if dismiss && compact && self.selection.is_open() {
            self.close_details();
            return true;
        }
        false
    }

    pub fn layout_inputs(&self) -> LayoutInputs {
        LayoutInputs {
            viewport: self.viewport.class(),
            details_open: self.selection.is_open(),
            selected_stage: self.selected_stage,
            selected_column: self.selection.selected_column(),
        }
    }

    pub fn visible_columns(&self) -> Vec<&Column> {
        visible_columns(self.store.columns(), &self.layout_inputs())
    }

    pub fn view(&self) -> BoardView {
        let viewport = self.viewport.class();
        let columns: Vec<Column> = self.visible_columns().into_iter().cloned().collect();

        let drag = self.drag.active_id().map(|active_id| DragPreview {
            active_id: active_id.clone(),
            application: self.drag.preview(&self.store).cloned(),
            over: self.drag.hovered().cloned(),
        });

        let details = match (self.selection.is_open(), self.selection.selected()) {
            (true, Some(application)) => Some(DetailsView {
                presentation: viewport.details_presentation(),
                application: application.clone(),
                stage_title: self.store.column(application.column_id).title.clone(),
                editing: self.editor.is_editing(),
                draft: self.editor.draft().cloned(),
            }),
            _ => None,
        };

        BoardView {
            viewport,
            width: self.viewport.width(),
            arrangement: viewport.arrangement(columns.len()),
            selected_stage: self.selected_stage,
            stages: self.store.stage_summaries(),
            columns,
            drag,
            details,
        }
    }
}
