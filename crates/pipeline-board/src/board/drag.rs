//! Drag gesture state machine.
//!
//! Any gesture source (pointer, touch, keyboard) is reduced to the same small
//! protocol: a drag starts on a card, may hover over candidate targets, and ends
//! either on a target or nowhere. Only the end of a gesture can change the
//! board, and it does so at most once.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{Application, ApplicationId, ColumnId};
use super::store::BoardStore;

/// Where a dragged card was released or is hovering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    /// A stage container, e.g. the empty area of a column.
    Column(ColumnId),
    /// Another card; its stage and rank decide the drop.
    Application(ApplicationId),
}

impl DropTarget {
    /// Interprets a droppable id as reported by a gesture toolkit. Stage slugs
    /// take precedence over card ids.
    pub fn from_raw(raw: &str) -> Self {
        match raw.parse::<ColumnId>() {
            Ok(column) => Self::Column(column),
            Err(_) => Self::Application(ApplicationId::new(raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start(ApplicationId),
    /// Informational only; never mutates the board.
    Over(Option<DropTarget>),
    End(Option<DropTarget>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active: ApplicationId,
        over: Option<DropTarget>,
    },
}

/// Board change a drop resolves to, computed without touching the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    Reorder {
        column: ColumnId,
        from: usize,
        to: usize,
    },
    Move {
        application: ApplicationId,
        source: ColumnId,
        destination: ColumnId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NotDragging,
    DraggedNotFound,
    TargetNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    Reordered {
        column: ColumnId,
        from: usize,
        to: usize,
    },
    Moved {
        application: ApplicationId,
        source: ColumnId,
        destination: ColumnId,
        index: usize,
    },
    /// Dropped back onto its own slot.
    Unchanged,
    /// Released outside any drop zone.
    Cancelled,
    Ignored { reason: IgnoreReason },
}

impl DropOutcome {
    pub fn changed_board(&self) -> bool {
        matches!(self, Self::Reordered { .. } | Self::Moved { .. })
    }
}

/// Works out what dropping `active` onto `target` would do to the board.
///
/// Within a stage the card takes the rank of the card it was dropped on, or
/// the last rank when dropped on the stage container. Across stages the card is
/// always appended to the destination, wherever it visually landed.
pub fn resolve_drop(
    store: &BoardStore,
    active: &ApplicationId,
    target: &DropTarget,
) -> Result<Option<DropPlan>, IgnoreReason> {
    let (source, from) = store.locate(active).ok_or(IgnoreReason::DraggedNotFound)?;

    let (destination, target_index) = match target {
        DropTarget::Column(column) => (*column, None),
        DropTarget::Application(id) => {
            let (column, index) = store.locate(id).ok_or(IgnoreReason::TargetNotFound)?;
            (column, Some(index))
        }
    };

    if source != destination {
        return Ok(Some(DropPlan::Move {
            application: active.clone(),
            source,
            destination,
        }));
    }

    let last = store.column(source).len() - 1;
    let to = target_index.unwrap_or(last);
    if from == to {
        return Ok(None);
    }

    Ok(Some(DropPlan::Reorder {
        column: source,
        from,
        to,
    }))
}

/// Holds the transient "what is being dragged" state between gesture messages.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn active_id(&self) -> Option<&ApplicationId> {
        match &self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    pub fn hovered(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Card to draw under the pointer, looked up in the current board.
    pub fn preview<'a>(&self, store: &'a BoardStore) -> Option<&'a Application> {
        self.active_id().and_then(|id| store.find_application(id))
    }

    /// Begins a gesture. A start received mid-drag replaces the uncommitted
    /// gesture.
    pub fn start(&mut self, active: ApplicationId) {
        if let Some(previous) = self.active_id() {
            debug!(%previous, next = %active, "drag restarted before drop");
        }
        self.state = DragState::Dragging { active, over: None };
    }

    pub fn over(&mut self, target: Option<DropTarget>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = target;
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Finishes the gesture, applying at most one board change. The controller
    /// is idle afterwards whatever the outcome.
    pub fn end(&mut self, target: Option<DropTarget>, store: &mut BoardStore) -> DropOutcome {
        let active = match std::mem::take(&mut self.state) {
            DragState::Dragging { active, .. } => active,
            DragState::Idle => {
                debug!("drop received without an active drag");
                return DropOutcome::Ignored {
                    reason: IgnoreReason::NotDragging,
                };
            }
        };

        let Some(target) = target else {
            debug!(application = %active, "drag cancelled without a target");
            return DropOutcome::Cancelled;
        };

        let plan = match resolve_drop(store, &active, &target) {
            Ok(Some(plan)) => plan,
            Ok(None) => return DropOutcome::Unchanged,
            Err(reason) => {
                debug!(application = %active, ?target, ?reason, "drop ignored");
                return DropOutcome::Ignored { reason };
            }
        };

        apply_plan(plan, store)
    }

    /// Feeds one protocol message through the machine. Only `End` yields an
    /// outcome.
    pub fn handle(&mut self, event: DragEvent, store: &mut BoardStore) -> Option<DropOutcome> {
        match event {
            DragEvent::Start(active) => {
                self.start(active);
                None
            }
            DragEvent::Over(target) => {
                self.over(target);
                None
            }
            DragEvent::End(target) => Some(self.end(target, store)),
        }
    }
}

fn apply_plan(plan: DropPlan, store: &mut BoardStore) -> DropOutcome {
    match plan {
        DropPlan::Reorder { column, from, to } => {
            store.reorder_within_column(column, from, to);
            DropOutcome::Reordered { column, from, to }
        }
        DropPlan::Move {
            application,
            source,
            destination,
        } => match store.move_between_columns(&application, source, destination, None) {
            Ok(index) => {
                info!(%application, %source, %destination, "drop moved application");
                DropOutcome::Moved {
                    application,
                    source,
                    destination,
                    index,
                }
            }
            Err(error) => {
                debug!(%error, "drop could not be applied");
                DropOutcome::Ignored {
                    reason: IgnoreReason::DraggedNotFound,
                }
            }
        },
    }
}
