//! Select-and-drag of placed furniture

use glam::Vec2;
use shared::ItemId;

use super::raycast::RaycastView;
use crate::state::selection::SelectionState;
use crate::state::store::FurnitureStore;

/// An active drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub dragged_id: ItemId,
    /// Last pointer position seen during the drag (NDC)
    pub last_pointer: Vec2,
    /// Whether any move landed yet; the undo snapshot is taken on the first one
    pub moved: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Pointer state machine: pick on press, drag on the placement surface,
/// end on release or leave. Writes only to the store and the selection.
#[derive(Debug, Default)]
pub struct DragController {
    phase: DragPhase,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn dragged_id(&self) -> Option<ItemId> {
        match self.phase {
            DragPhase::Dragging(session) => Some(session.dragged_id),
            DragPhase::Idle => None,
        }
    }

    /// Pick under the pointer. A hit selects the item and starts a drag,
    /// a miss clears the selection.
    pub fn pointer_down(
        &mut self,
        pointer_ndc: Vec2,
        view: &RaycastView<'_>,
        selection: &mut SelectionState,
    ) -> Option<ItemId> {
        match view.pick_item(pointer_ndc) {
            Some(id) => {
                selection.select(id);
                self.phase = DragPhase::Dragging(DragSession {
                    dragged_id: id,
                    last_pointer: pointer_ndc,
                    moved: false,
                });
                tracing::debug!(id, "drag started");
                Some(id)
            }
            None => {
                selection.clear();
                self.phase = DragPhase::Idle;
                None
            }
        }
    }

    /// Move the dragged item to the surface point under the pointer.
    /// Returns true when the record's position was overwritten.
    pub fn pointer_move(
        &mut self,
        pointer_ndc: Vec2,
        view: &RaycastView<'_>,
        store: &mut FurnitureStore,
    ) -> bool {
        let DragPhase::Dragging(mut session) = self.phase else {
            return false;
        };
        session.last_pointer = pointer_ndc;

        // Momentary misses (pointer over a wall, outside the room) keep the last position
        let Some(position) = view.cast_to_surface(pointer_ndc) else {
            self.phase = DragPhase::Dragging(session);
            return false;
        };

        if !store.contains(session.dragged_id) {
            tracing::debug!(id = session.dragged_id, "dragged item is gone, ending drag");
            self.phase = DragPhase::Idle;
            return false;
        }

        if !session.moved {
            store.begin_drag();
            session.moved = true;
        }
        let moved = store.move_item(session.dragged_id, position.x, position.y);
        self.phase = DragPhase::Dragging(session);
        moved
    }

    /// End the drag; the selection stays
    pub fn pointer_up(&mut self) {
        if let DragPhase::Dragging(session) = self.phase {
            tracing::debug!(id = session.dragged_id, moved = session.moved, "drag ended");
        }
        self.phase = DragPhase::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Rotate the selected item one step; no-op without a selection
    pub fn rotate_selected(
        &self,
        selection: &SelectionState,
        store: &mut FurnitureStore,
    ) -> Option<u16> {
        let id = selection.selected()?;
        store.rotate_item(id)
    }

    /// Remove the selected item and clear the selection; no-op without a selection
    pub fn delete_selected(
        &mut self,
        selection: &mut SelectionState,
        store: &mut FurnitureStore,
    ) -> bool {
        let Some(id) = selection.selected() else {
            return false;
        };
        let removed = store.remove_item(id);
        selection.clear();
        removed
    }
}
