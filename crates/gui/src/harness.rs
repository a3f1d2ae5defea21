//! Headless planner harness for programmatic interaction.
//!
//! Wires the store, selection, drag controller, scene graph and synchronizer
//! together exactly like the desktop app does, minus the window. Pointer
//! events take NDC coordinates; the `*_at` helpers project a world point
//! through the harness camera first.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use shared::{FurnitureKind, FurnitureRecord, ItemId};
use tokio::runtime::Handle;

use crate::interaction::{DragController, DropHandler, RaycastView};
use crate::scene::{build_room, NodeId, RoomNodes, SceneGraph};
use crate::state::{PlannerSettings, PlannerState};
use crate::sync::{ModelLoader, ProceduralModelLoader, SceneSynchronizer, SyncReport};
use crate::viewport::camera::ArcBallCamera;

/// Viewport aspect used when none is given
pub const DEFAULT_ASPECT: f32 = 1.5;

/// Headless planner: owns state, scene and synchronizer
pub struct PlannerHarness {
    pub state: PlannerState,
    pub drag: DragController,
    pub scene: SceneGraph,
    pub room: RoomNodes,
    pub camera: ArcBallCamera,
    /// Viewport width / height
    pub aspect: f32,
    sync: SceneSynchronizer,
}

impl PlannerHarness {
    /// Default room with built-in procedural models
    pub fn new(runtime: Handle) -> Self {
        Self::with_loader(Arc::new(ProceduralModelLoader), runtime)
    }

    pub fn with_loader(loader: Arc<dyn ModelLoader>, runtime: Handle) -> Self {
        Self::from_settings(PlannerSettings::default(), loader, runtime)
    }

    pub fn from_settings(
        settings: PlannerSettings,
        loader: Arc<dyn ModelLoader>,
        runtime: Handle,
    ) -> Self {
        let mut scene = SceneGraph::new();
        let room = build_room(&mut scene, &settings.room, &settings.viewport);
        let camera = ArcBallCamera::from_settings(&settings.camera);

        let state = PlannerState {
            settings,
            ..Default::default()
        };
        let mut sync = SceneSynchronizer::new(loader, runtime);
        sync.subscribe_to(&state.store);

        Self {
            state,
            drag: DragController::new(),
            scene,
            room,
            camera,
            aspect: DEFAULT_ASPECT,
            sync,
        }
    }

    // ── Store edits ───────────────────────────────────────────

    pub fn add_item(&mut self, kind: FurnitureKind, x: f32, y: f32) -> ItemId {
        self.state.store.add_item(kind, x, y)
    }

    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let removed = self.state.store.remove_item(id);
        self.state.prune_selection();
        removed
    }

    /// Undoable move to (x, y)
    pub fn move_item(&mut self, id: ItemId, x: f32, y: f32) -> bool {
        self.state.store.move_item_with_undo(id, x, y)
    }

    pub fn rotate_item(&mut self, id: ItemId) -> Option<u16> {
        self.state.store.rotate_item(id)
    }

    pub fn clear(&mut self) {
        self.state.store.clear_all();
        self.state.selection.clear();
        self.drag.pointer_leave();
    }

    pub fn undo(&mut self) -> bool {
        if !self.state.store.can_undo() {
            return false;
        }
        self.drag.pointer_leave();
        self.state.store.undo();
        self.state.prune_selection();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.state.store.can_redo() {
            return false;
        }
        self.drag.pointer_leave();
        self.state.store.redo();
        self.state.prune_selection();
        true
    }

    // ── Selection ─────────────────────────────────────────────

    /// Select an existing item; false for unknown ids
    pub fn select(&mut self, id: ItemId) -> bool {
        if !self.state.store.contains(id) {
            return false;
        }
        self.state.selection.select(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.state.selection.selected()
    }

    pub fn rotate_selected(&mut self) -> Option<u16> {
        self.drag
            .rotate_selected(&self.state.selection, &mut self.state.store)
    }

    pub fn delete_selected(&mut self) -> bool {
        self.drag
            .delete_selected(&mut self.state.selection, &mut self.state.store)
    }

    // ── Pointer input ─────────────────────────────────────────

    /// NDC position of a world point in the harness viewport
    pub fn ndc_for(&self, world: Vec3) -> Option<Vec2> {
        self.camera.project(world, self.aspect)
    }

    pub fn pointer_down(&mut self, pointer_ndc: Vec2) -> Option<ItemId> {
        let view = RaycastView::new(&self.camera, self.aspect, &self.scene);
        self.drag
            .pointer_down(pointer_ndc, &view, &mut self.state.selection)
    }

    pub fn pointer_move(&mut self, pointer_ndc: Vec2) -> bool {
        let view = RaycastView::new(&self.camera, self.aspect, &self.scene);
        self.drag
            .pointer_move(pointer_ndc, &view, &mut self.state.store)
    }

    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.drag.pointer_leave();
    }

    /// Drop a palette payload at a pointer position
    pub fn drop_payload(&mut self, payload: &str, pointer_ndc: Vec2) -> Option<ItemId> {
        let view = RaycastView::new(&self.camera, self.aspect, &self.scene);
        DropHandler::handle_drop(payload, pointer_ndc, &view, &mut self.state.store)
    }

    pub fn pointer_down_at(&mut self, world: Vec3) -> Option<ItemId> {
        let ndc = self.ndc_for(world)?;
        self.pointer_down(ndc)
    }

    pub fn pointer_move_at(&mut self, world: Vec3) -> bool {
        match self.ndc_for(world) {
            Some(ndc) => self.pointer_move(ndc),
            None => false,
        }
    }

    /// Drop a payload where `world` appears on screen
    pub fn drop_at(&mut self, payload: &str, world: Vec3) -> Option<ItemId> {
        let ndc = self.ndc_for(world)?;
        self.drop_payload(payload, ndc)
    }

    // ── Synchronization ───────────────────────────────────────

    /// One non-blocking reconcile pass
    pub fn reconcile(&mut self) -> SyncReport {
        self.sync.reconcile(self.state.store.items(), &mut self.scene)
    }

    /// Reconcile only if the store changed or a load completed
    pub fn sync_if_changed(&mut self) -> Option<SyncReport> {
        self.sync.sync_if_changed(&self.state.store, &mut self.scene)
    }

    /// Reconcile and wait for every in-flight load
    pub async fn settle(&mut self) -> SyncReport {
        self.sync.settle(self.state.store.items(), &mut self.scene).await
    }

    pub fn retry_failed(&mut self) -> usize {
        self.sync.retry_failed()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn items(&self) -> &[FurnitureRecord] {
        self.state.store.items()
    }

    pub fn item(&self, id: ItemId) -> Option<&FurnitureRecord> {
        self.state.store.get(id)
    }

    pub fn item_count(&self) -> usize {
        self.state.store.count()
    }

    /// Ids with a node in the scene, sorted
    pub fn rendered_ids(&self) -> Vec<ItemId> {
        self.sync.pool().present_ids()
    }

    pub fn node_of(&self, id: ItemId) -> Option<NodeId> {
        self.sync.node_of(id)
    }

    pub fn pending_loads(&self) -> usize {
        self.sync.pending_loads()
    }

    pub fn failed_loads(&self) -> usize {
        self.sync.pool().failed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_harness_has_room_only() {
        let h = PlannerHarness::new(Handle::current());
        assert_eq!(h.item_count(), 0);
        assert!(h.rendered_ids().is_empty());
        // scene root + room group + floor + 4 walls
        assert_eq!(h.scene.len(), 7);
    }

    #[tokio::test]
    async fn test_add_then_settle_renders() {
        let mut h = PlannerHarness::new(Handle::current());
        let id = h.add_item(FurnitureKind::Bed, 1.0, 1.0);
        h.settle().await;
        assert_eq!(h.rendered_ids(), vec![id]);
    }

    #[tokio::test]
    async fn test_undo_redo_cycle() {
        let mut h = PlannerHarness::new(Handle::current());
        h.add_item(FurnitureKind::Desk, 0.0, 0.0);
        assert!(h.undo());
        assert_eq!(h.item_count(), 0);
        assert!(h.redo());
        assert_eq!(h.item_count(), 1);
        assert!(!h.redo());
    }

    #[tokio::test]
    async fn test_undo_prunes_selection() {
        let mut h = PlannerHarness::new(Handle::current());
        let id = h.add_item(FurnitureKind::Chair, 0.0, 0.0);
        assert!(h.select(id));
        h.undo();
        assert!(h.selected().is_none());
    }

    #[tokio::test]
    async fn test_select_unknown_id_refused() {
        let mut h = PlannerHarness::new(Handle::current());
        assert!(!h.select(77));
        assert!(h.selected().is_none());
    }

    #[tokio::test]
    async fn test_click_on_rendered_item_selects_it() {
        let mut h = PlannerHarness::new(Handle::current());
        let id = h.add_item(FurnitureKind::Wardrobe, -1.0, 0.5);
        h.settle().await;
        // Top of the wardrobe body
        assert_eq!(h.pointer_down_at(Vec3::new(-0.85, 2.0, 0.45)), Some(id));
        h.pointer_up();
        assert_eq!(h.selected(), Some(id));
    }
}
