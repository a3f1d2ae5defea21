use shared::ItemId;

/// Single-item selection driving the contextual rotate/delete controls
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<ItemId>,
    /// Version counter for selection changes (for highlight invalidation)
    pub version: u64,
}

impl SelectionState {
    /// Currently selected item
    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    /// Check if an item is selected
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected == Some(id)
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    /// Select a single item (replaces previous selection)
    pub fn select(&mut self, id: ItemId) {
        if self.selected != Some(id) {
            self.selected = Some(id);
            self.version += 1;
        }
    }

    /// Clear selection
    pub fn clear(&mut self) {
        if self.selected.take().is_some() {
            self.version += 1;
        }
    }
}
