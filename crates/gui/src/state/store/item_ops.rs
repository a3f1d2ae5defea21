//! Item CRUD operations

use shared::{FurnitureKind, FurnitureRecord, ItemId, RoomPosition};

use super::FurnitureStore;

impl FurnitureStore {
    /// Place a new item with rotation 0 and return its id
    pub fn add_item(&mut self, kind: FurnitureKind, x: f32, y: f32) -> ItemId {
        self.save_undo();
        self.redo_stack.clear();

        let id = self.next_id;
        self.next_id += 1;
        self.items
            .push(FurnitureRecord::new(id, kind, RoomPosition::new(x, y)));

        tracing::debug!(id, %kind, x, y, "item added");
        self.notify_mutated();
        id
    }

    /// Remove an item; false when the id is unknown
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let Some(index) = self.items.iter().position(|r| r.id == id) else {
            return false;
        };
        self.save_undo();
        self.redo_stack.clear();

        self.items.remove(index);
        tracing::debug!(id, "item removed");
        self.notify_mutated();
        true
    }

    /// Overwrite an item's position; false when the id is unknown.
    ///
    /// Does not record undo on its own: drags call [`FurnitureStore::begin_drag`]
    /// once, other callers use [`FurnitureStore::move_item_with_undo`].
    pub fn move_item(&mut self, id: ItemId, x: f32, y: f32) -> bool {
        let Some(record) = self.get_mut(id) else {
            return false;
        };
        let position = RoomPosition::new(x, y);
        if record.position == position {
            return true;
        }
        record.position = position;
        self.notify_mutated();
        true
    }

    /// Move as a standalone, undoable edit
    pub fn move_item_with_undo(&mut self, id: ItemId, x: f32, y: f32) -> bool {
        let Some(record) = self.get(id) else {
            return false;
        };
        if record.position == RoomPosition::new(x, y) {
            return true;
        }
        self.save_undo();
        self.redo_stack.clear();
        self.move_item(id, x, y)
    }

    /// Rotate an item one step (+90°, wrapping at 360) and return the new rotation
    pub fn rotate_item(&mut self, id: ItemId) -> Option<u16> {
        if !self.contains(id) {
            return None;
        }
        self.save_undo();
        self.redo_stack.clear();

        let rotation = self.get_mut(id).map(FurnitureRecord::rotate_step)?;
        tracing::debug!(id, rotation, "item rotated");
        self.notify_mutated();
        Some(rotation)
    }

    /// Remove every item
    pub fn clear_all(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.save_undo();
        self.redo_stack.clear();
        self.items.clear();
        self.notify_mutated();
    }

    /// Save undo state once at the beginning of a drag operation
    pub fn begin_drag(&mut self) {
        self.save_undo();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut store = FurnitureStore::new();
        let a = store.add_item(FurnitureKind::Bed, 0.0, 0.0);
        let b = store.add_item(FurnitureKind::Desk, 1.0, 1.0);
        assert_ne!(a, b);
        assert_eq!(store.count(), 2);
        assert_eq!(store.get(b).unwrap().rotation_degrees, 0);
        assert_eq!(store.get(b).unwrap().position, RoomPosition::new(1.0, 1.0));
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut store = FurnitureStore::new();
        let a = store.add_item(FurnitureKind::Bed, 0.0, 0.0);
        store.clear_all();
        let b = store.add_item(FurnitureKind::Bed, 0.0, 0.0);
        assert!(b > a);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = FurnitureStore::new();
        store.add_item(FurnitureKind::Chair, 0.0, 0.0);
        let version = store.version();
        assert!(!store.remove_item(999));
        assert_eq!(store.version(), version);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_move_overwrites_position() {
        let mut store = FurnitureStore::new();
        let id = store.add_item(FurnitureKind::Chair, 0.0, 0.0);
        assert!(store.move_item(id, 2.0, 3.0));
        assert!(store.move_item(id, -1.0, 0.5));
        assert_eq!(store.get(id).unwrap().position, RoomPosition::new(-1.0, 0.5));
        assert!(!store.move_item(42, 1.0, 1.0));
    }

    #[test]
    fn test_move_to_same_position_keeps_version() {
        let mut store = FurnitureStore::new();
        let id = store.add_item(FurnitureKind::Chair, 1.0, 1.0);
        let version = store.version();
        assert!(store.move_item(id, 1.0, 1.0));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_undoable_move_in_place_adds_no_history() {
        let mut store = FurnitureStore::new();
        let id = store.add_item(FurnitureKind::Desk, 1.0, 2.0);
        assert!(store.move_item_with_undo(id, 1.0, 2.0));

        // The only undo step is the add itself
        store.undo();
        assert_eq!(store.count(), 0);
        assert!(!store.can_undo());
        assert!(!store.move_item_with_undo(id, 0.0, 0.0));
    }

    #[test]
    fn test_rotate_wraps_at_360() {
        let mut store = FurnitureStore::new();
        let id = store.add_item(FurnitureKind::Desk, 0.0, 0.0);
        assert_eq!(store.rotate_item(id), Some(90));
        assert_eq!(store.rotate_item(id), Some(180));
        assert_eq!(store.rotate_item(id), Some(270));
        assert_eq!(store.rotate_item(id), Some(0));
        assert_eq!(store.rotate_item(77), None);
    }

    #[test]
    fn test_clear_all() {
        let mut store = FurnitureStore::new();
        store.add_item(FurnitureKind::Bed, 0.0, 0.0);
        store.add_item(FurnitureKind::Desk, 0.0, 0.0);
        store.clear_all();
        assert_eq!(store.count(), 0);
    }
}
