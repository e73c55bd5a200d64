//! Keyboard equivalent of pointer dragging.
//!
//! The adapter owns no board state; it only turns key presses into the drag
//! protocol messages the [`DragController`](super::drag::DragController)
//! consumes.

use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, ColumnId};
use super::drag::{DragEvent, DropTarget};
use super::store::BoardStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKey {
    /// Space or enter: pick up the focused card, or drop the lifted one.
    Activate,
    Up,
    Down,
    Left,
    Right,
    Escape,
}

#[derive(Debug, Default)]
pub struct KeyboardDrag {
    lifted: Option<ApplicationId>,
    candidate: Option<DropTarget>,
}

impl KeyboardDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lifted(&self) -> bool {
        self.lifted.is_some()
    }

    pub fn candidate(&self) -> Option<&DropTarget> {
        self.candidate.as_ref()
    }

    /// Drops any lifted card without emitting an event, e.g. when another
    /// gesture source took over the drag.
    pub fn reset(&mut self) {
        self.lifted = None;
        self.candidate = None;
    }

    /// Translates one key press. `focused` is the card holding keyboard focus
    /// and only matters when nothing is lifted yet.
    pub fn press(
        &mut self,
        key: DragKey,
        focused: Option<&ApplicationId>,
        store: &BoardStore,
    ) -> Option<DragEvent> {
        if self.lifted.is_none() {
            return match (key, focused) {
                (DragKey::Activate, Some(id)) => {
                    self.lifted = Some(id.clone());
                    self.candidate = Some(DropTarget::Application(id.clone()));
                    Some(DragEvent::Start(id.clone()))
                }
                _ => None,
            };
        }

        match key {
            DragKey::Activate => {
                let target = self.candidate.take();
                self.lifted = None;
                Some(DragEvent::End(target))
            }
            DragKey::Escape => {
                self.lifted = None;
                self.candidate = None;
                Some(DragEvent::End(None))
            }
            DragKey::Up | DragKey::Down | DragKey::Left | DragKey::Right => {
                let current = self.candidate.as_ref()?;
                let next = step(store, current, key)?;
                self.candidate = Some(next.clone());
                Some(DragEvent::Over(Some(next)))
            }
        }
    }
}

/// Slot of a candidate within its stage. A stage container sits after the last
/// card.
fn slot(store: &BoardStore, target: &DropTarget) -> Option<(ColumnId, usize)> {
    match target {
        DropTarget::Column(column) => Some((*column, store.column(*column).len())),
        DropTarget::Application(id) => store.locate(id),
    }
}

fn step(store: &BoardStore, current: &DropTarget, key: DragKey) -> Option<DropTarget> {
    let (column, index) = slot(store, current)?;
    let applications = &store.column(column).applications;

    match key {
        DragKey::Up => {
            let previous = index.checked_sub(1)?;
            applications
                .get(previous)
                .map(|application| DropTarget::Application(application.id.clone()))
        }
        DragKey::Down => {
            let next = index + 1;
            if next < applications.len() {
                Some(DropTarget::Application(applications[next].id.clone()))
            } else if index < applications.len() {
                Some(DropTarget::Column(column))
            } else {
                None
            }
        }
        DragKey::Left => column.previous().map(DropTarget::Column),
        DragKey::Right => column.next().map(DropTarget::Column),
        DragKey::Activate | DragKey::Escape => None,
    }
}
