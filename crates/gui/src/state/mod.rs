pub mod selection;
pub mod settings;
pub mod store;

pub use selection::SelectionState;
pub use settings::PlannerSettings;
pub use store::FurnitureStore;

/// Combined planner state
#[derive(Default)]
pub struct PlannerState {
    pub store: FurnitureStore,
    pub selection: SelectionState,
    pub settings: PlannerSettings,
}

impl PlannerState {
    /// State with settings loaded from the user's config directory
    pub fn load() -> Self {
        Self {
            settings: PlannerSettings::load(),
            ..Default::default()
        }
    }

    /// Drop a selection that points at an item no longer in the store
    /// (after undo/redo or clear)
    pub fn prune_selection(&mut self) {
        if let Some(id) = self.selection.selected() {
            if !self.store.contains(id) {
                self.selection.clear();
            }
        }
    }
}
