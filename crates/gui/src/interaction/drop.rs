//! Palette drops onto the room

use glam::Vec2;
use shared::{FurnitureKind, ItemId};

use super::raycast::RaycastView;
use crate::state::store::FurnitureStore;

/// Turns a palette payload dropped over the viewport into a new item
#[derive(Debug, Default, Clone, Copy)]
pub struct DropHandler;

impl DropHandler {
    /// Whether a drag-over with this payload should show as droppable
    pub fn accepts(payload: &str) -> bool {
        payload.parse::<FurnitureKind>().is_ok()
    }

    /// Add an item of the payload's kind where the pointer meets the floor.
    /// Unknown payloads and drops that miss the floor are discarded.
    pub fn handle_drop(
        payload: &str,
        pointer_ndc: Vec2,
        view: &RaycastView<'_>,
        store: &mut FurnitureStore,
    ) -> Option<ItemId> {
        let kind = match payload.parse::<FurnitureKind>() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::debug!("ignoring drop: {e}");
                return None;
            }
        };
        let Some(position) = view.cast_to_surface(pointer_ndc) else {
            tracing::debug!(%kind, "drop missed the floor");
            return None;
        };
        Some(store.add_item(kind, position.x, position.y))
    }
}
