//! Visual node pool: item id → node state

use std::collections::HashMap;

use shared::{FurnitureKind, ItemId};

use crate::scene::NodeId;

/// A displayed furniture node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualNode {
    /// Group node owning the part meshes
    pub node: NodeId,
    pub kind: FurnitureKind,
}

/// State of one pool entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEntry {
    /// A model load is in flight; no second load may start for this id
    Loading,
    /// Node is in the scene graph
    Present(VisualNode),
    /// Last load failed; not retried until the id leaves the list or
    /// failures are explicitly retried
    Failed,
}

/// Mapping from item id to its visual node state.
/// Mutated only by the scene synchronizer.
#[derive(Debug, Default)]
pub struct VisualNodePool {
    entries: HashMap<ItemId, PoolEntry>,
}

impl VisualNodePool {
    pub fn get(&self, id: ItemId) -> Option<&PoolEntry> {
        self.entries.get(&id)
    }

    /// Node displaying `id`, if loaded
    pub fn node_of(&self, id: ItemId) -> Option<NodeId> {
        match self.entries.get(&id) {
            Some(PoolEntry::Present(visual)) => Some(visual.node),
            _ => None,
        }
    }

    pub fn is_loading(&self, id: ItemId) -> bool {
        matches!(self.entries.get(&id), Some(PoolEntry::Loading))
    }

    /// Ids currently displayed, sorted
    pub fn present_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .entries
            .iter()
            .filter(|(_, e)| matches!(e, PoolEntry::Present(_)))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of loads in flight
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, PoolEntry::Loading))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, PoolEntry::Failed))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn ids(&self) -> Vec<ItemId> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn set(&mut self, id: ItemId, entry: PoolEntry) {
        self.entries.insert(id, entry);
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> Option<PoolEntry> {
        self.entries.remove(&id)
    }

    /// Forget failed entries so the next reconcile loads them again
    pub(crate) fn clear_failed(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| !matches!(e, PoolEntry::Failed));
        before - self.entries.len()
    }
}
