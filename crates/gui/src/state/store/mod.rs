//! Furniture store
//!
//! Owns the canonical ordered list of placed furniture, the undo/redo history,
//! and the change channel the scene synchronizer subscribes to.

mod history;
mod item_ops;

use shared::{FurnitureRecord, ItemId};
use tokio::sync::watch;

/// Maximum number of undo snapshots kept
const UNDO_LIMIT: usize = 100;

/// Ordered list of furniture records with undo/redo history
pub struct FurnitureStore {
    /// Current records, in placement order
    pub(crate) items: Vec<FurnitureRecord>,
    /// Undo stack - previous lists
    pub(crate) undo_stack: Vec<Vec<FurnitureRecord>>,
    /// Redo stack - undone lists
    pub(crate) redo_stack: Vec<Vec<FurnitureRecord>>,
    /// Next id to hand out; never rewound, so ids stay unique across undo and clear
    pub(crate) next_id: ItemId,
    /// Monotonically increasing version counter
    pub(crate) version: u64,
    changes: watch::Sender<u64>,
}

impl Default for FurnitureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FurnitureStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            items: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            next_id: 1,
            version: 0,
            changes,
        }
    }

    /// Read-only snapshot of the current records
    pub fn items(&self) -> &[FurnitureRecord] {
        &self.items
    }

    /// Number of placed items
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: ItemId) -> Option<&FurnitureRecord> {
        self.items.iter().find(|r| r.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut FurnitureRecord> {
        self.items.iter_mut().find(|r| r.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Current store version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Subscribe to change notifications; the channel carries the store version
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Bump version and wake subscribers
    pub(crate) fn notify_mutated(&mut self) {
        self.version += 1;
        self.changes.send_replace(self.version);
    }

    /// Save current list to undo stack
    pub(crate) fn save_undo(&mut self) {
        self.undo_stack.push(self.items.clone());
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
    }
}
