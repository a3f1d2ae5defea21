//! Scene synchronizer
//!
//! Reconciles the store's record list against the visual node pool: starts
//! model loads for new ids, updates transforms of displayed ids, and disposes
//! nodes whose ids left the list. Loads run as tokio tasks and report back
//! over a channel that is drained at the start of every reconcile, so the pool
//! and the scene graph are only ever mutated here.

mod loader;
mod pool;

pub use loader::{
    asset_for, procedural_parts, AssetRef, FileModelLoader, LoadError, LoadFuture, Model,
    ModelFile, ModelLoader, ModelPart, PartDef, ProceduralModelLoader,
};
pub use pool::{PoolEntry, VisualNode, VisualNodePool};

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Quat, Vec3};
use shared::{FurnitureKind, FurnitureRecord, ItemId};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

use crate::scene::{Node, NodeId, NodeTransform, SceneGraph};
use crate::state::store::FurnitureStore;

/// Completed load, reported back to the synchronizer
struct LoadOutcome {
    id: ItemId,
    kind: FurnitureKind,
    result: Result<Model, LoadError>,
}

/// What one reconcile pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub loads_started: usize,
    /// Nodes inserted from completed loads
    pub created: usize,
    /// Displayed nodes whose transform actually changed
    pub moved: usize,
    /// Nodes disposed because their id left the list
    pub removed: usize,
    /// Completed loads dropped because the id was gone by then
    pub discarded: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        *self == SyncReport::default()
    }
}

impl std::ops::AddAssign for SyncReport {
    fn add_assign(&mut self, other: Self) {
        self.loads_started += other.loads_started;
        self.created += other.created;
        self.moved += other.moved;
        self.removed += other.removed;
        self.discarded += other.discarded;
        self.failed += other.failed;
    }
}

/// Node transform for a record: room (x, y) → world (x, 0, y), rotation about +Y
pub fn record_transform(record: &FurnitureRecord) -> NodeTransform {
    NodeTransform {
        translation: Vec3::new(record.position.x, 0.0, record.position.y),
        rotation: Quat::from_rotation_y((record.rotation_degrees as f32).to_radians()),
    }
}

/// Keeps a [`VisualNodePool`] and the scene graph in step with a record list
pub struct SceneSynchronizer {
    pool: VisualNodePool,
    loader: Arc<dyn ModelLoader>,
    runtime: Handle,
    completed_tx: mpsc::UnboundedSender<LoadOutcome>,
    completed_rx: mpsc::UnboundedReceiver<LoadOutcome>,
    store_changes: Option<watch::Receiver<u64>>,
    /// Set by [`Self::teardown`]; later passes do nothing
    torn_down: bool,
}

impl SceneSynchronizer {
    pub fn new(loader: Arc<dyn ModelLoader>, runtime: Handle) -> Self {
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        Self {
            pool: VisualNodePool::default(),
            loader,
            runtime,
            completed_tx,
            completed_rx,
            store_changes: None,
            torn_down: false,
        }
    }

    /// Follow a store's change channel so [`Self::sync_if_changed`] can skip idle frames
    pub fn subscribe_to(&mut self, store: &FurnitureStore) {
        let mut rx = store.subscribe();
        rx.mark_changed();
        self.store_changes = Some(rx);
    }

    pub fn pool(&self) -> &VisualNodePool {
        &self.pool
    }

    /// Node displaying `id`, if loaded
    pub fn node_of(&self, id: ItemId) -> Option<NodeId> {
        self.pool.node_of(id)
    }

    pub fn pending_loads(&self) -> usize {
        self.pool.pending_count()
    }

    /// One reconciliation pass. Never blocks; loads still in flight are
    /// picked up by a later pass.
    pub fn reconcile(&mut self, records: &[FurnitureRecord], scene: &mut SceneGraph) -> SyncReport {
        let mut report = SyncReport::default();
        if self.torn_down {
            return report;
        }
        let live: HashMap<ItemId, &FurnitureRecord> = records.iter().map(|r| (r.id, r)).collect();

        while let Ok(outcome) = self.completed_rx.try_recv() {
            report += self.apply_outcome(outcome, &live, scene);
        }

        for record in records {
            match self.pool.get(record.id) {
                None => {
                    self.start_load(record);
                    report.loads_started += 1;
                }
                Some(PoolEntry::Present(visual)) => {
                    let transform = record_transform(record);
                    if scene.transform(visual.node) != Some(transform) {
                        report.moved += 1;
                    }
                    scene.set_transform(visual.node, transform);
                }
                Some(PoolEntry::Loading) | Some(PoolEntry::Failed) => {}
            }
        }

        for id in self.pool.ids() {
            if live.contains_key(&id) {
                continue;
            }
            match self.pool.get(id) {
                Some(PoolEntry::Present(visual)) => {
                    scene.remove(visual.node);
                    self.pool.remove(id);
                    report.removed += 1;
                    tracing::debug!(id, "disposed node for removed item");
                }
                Some(PoolEntry::Failed) => {
                    self.pool.remove(id);
                }
                // Stays marked until the load resolves, so a re-added id
                // (undo) cannot start a second load meanwhile
                Some(PoolEntry::Loading) | None => {}
            }
        }

        report
    }

    /// Reconcile only when the store changed or a load completed since the last pass
    pub fn sync_if_changed(
        &mut self,
        store: &FurnitureStore,
        scene: &mut SceneGraph,
    ) -> Option<SyncReport> {
        let store_changed = match self.store_changes.as_mut() {
            Some(rx) => rx.has_changed().unwrap_or(true),
            None => true,
        };
        if !store_changed && self.completed_rx.is_empty() {
            return None;
        }
        if let Some(rx) = self.store_changes.as_mut() {
            rx.borrow_and_update();
        }
        Some(self.reconcile(store.items(), scene))
    }

    /// Reconcile, then wait until every in-flight load has resolved
    pub async fn settle(&mut self, records: &[FurnitureRecord], scene: &mut SceneGraph) -> SyncReport {
        let mut report = self.reconcile(records, scene);
        let live: HashMap<ItemId, &FurnitureRecord> = records.iter().map(|r| (r.id, r)).collect();

        while self.pool.pending_count() > 0 {
            let Some(outcome) = self.completed_rx.recv().await else {
                break;
            };
            report += self.apply_outcome(outcome, &live, scene);
        }
        report
    }

    /// Forget failed loads so the next reconcile tries them again
    pub fn retry_failed(&mut self) -> usize {
        let cleared = self.pool.clear_failed();
        if cleared > 0 {
            if let Some(rx) = self.store_changes.as_mut() {
                rx.mark_changed();
            }
        }
        cleared
    }

    /// Remove every displayed node from the scene and empty the pool.
    /// Loads still in flight finish into a closed channel and are dropped;
    /// the synchronizer stays inert afterwards.
    pub fn teardown(&mut self, scene: &mut SceneGraph) {
        for id in self.pool.ids() {
            if let Some(PoolEntry::Present(visual)) = self.pool.remove(id) {
                scene.remove(visual.node);
            }
        }
        self.completed_rx.close();
        self.store_changes = None;
        self.torn_down = true;
        tracing::debug!("scene synchronizer torn down");
    }

    fn start_load(&mut self, record: &FurnitureRecord) {
        let id = record.id;
        let kind = record.kind;
        let asset = asset_for(kind);
        self.pool.set(id, PoolEntry::Loading);

        let future = self.loader.load(&asset);
        let tx = self.completed_tx.clone();
        tracing::debug!(id, %kind, path = asset.path, "loading model");
        self.runtime.spawn(async move {
            // A panicking loader must still resolve the pending entry
            let result = match tokio::spawn(future).await {
                Ok(result) => result,
                Err(e) => Err(LoadError::Aborted(e.to_string())),
            };
            let _ = tx.send(LoadOutcome { id, kind, result });
        });
    }

    fn apply_outcome(
        &mut self,
        outcome: LoadOutcome,
        live: &HashMap<ItemId, &FurnitureRecord>,
        scene: &mut SceneGraph,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        let LoadOutcome { id, kind, result } = outcome;

        if !self.pool.is_loading(id) {
            return report;
        }

        let Some(record) = live.get(&id) else {
            self.pool.remove(id);
            report.discarded += 1;
            tracing::debug!(id, %kind, "discarding model for item removed mid-load");
            return report;
        };

        match result {
            Ok(model) => {
                let node = spawn_visual(scene, record, &model);
                self.pool.set(id, PoolEntry::Present(VisualNode { node, kind }));
                report.created += 1;
                tracing::debug!(id, %kind, parts = model.parts.len(), "model attached");
            }
            Err(e) => {
                self.pool.set(id, PoolEntry::Failed);
                report.failed += 1;
                tracing::warn!(id, %kind, "failed to load model: {e}");
            }
        }
        report
    }
}

/// Group node with one child per model part, tagged with the owning item
fn spawn_visual(scene: &mut SceneGraph, record: &FurnitureRecord, model: &Model) -> NodeId {
    let group = scene.add(scene.root(), Node::group(format!("{}#{}", record.kind, record.id)));
    scene.set_owner(group, Some(record.id));
    scene.set_transform(group, record_transform(record));
    for part in &model.parts {
        scene.add(
            group,
            Node::mesh(part.name.clone(), part.mesh.clone()).with_translation(part.offset),
        );
    }
    group
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::fixtures::GatedLoader;

    fn with_loader(loader: &GatedLoader) -> SceneSynchronizer {
        SceneSynchronizer::new(Arc::new(loader.clone()), Handle::current())
    }

    fn instant() -> SceneSynchronizer {
        SceneSynchronizer::new(Arc::new(ProceduralModelLoader), Handle::current())
    }

    fn store_ids(store: &FurnitureStore) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = store.items().iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids
    }

    #[tokio::test]
    async fn test_settle_creates_owned_nodes() {
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let mut sync = instant();
        let a = store.add_item(FurnitureKind::Bed, 1.0, 1.0);
        let b = store.add_item(FurnitureKind::Chair, -1.0, 0.5);

        let report = sync.settle(store.items(), &mut scene).await;
        assert_eq!(report.loads_started, 2);
        assert_eq!(report.created, 2);
        assert_eq!(sync.pool().present_ids(), vec![a, b]);

        let node = sync.node_of(b).unwrap();
        assert_eq!(scene.node(node).unwrap().owner, Some(b));
        let child = scene.node(node).unwrap().children()[0];
        assert_eq!(scene.owning_item(child), Some(b));
        assert_eq!(
            scene.transform(node).unwrap().translation,
            Vec3::new(-1.0, 0.0, 0.5)
        );
    }

    #[tokio::test]
    async fn test_no_duplicate_loads_while_pending() {
        let loader = GatedLoader::closed();
        let mut sync = with_loader(&loader);
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let id = store.add_item(FurnitureKind::Desk, 0.0, 0.0);

        for _ in 0..5 {
            sync.reconcile(store.items(), &mut scene);
            tokio::task::yield_now().await;
        }
        assert_eq!(loader.calls(), 1);
        assert!(sync.pool().is_loading(id));
        assert!(sync.node_of(id).is_none());

        loader.release(1);
        sync.settle(store.items(), &mut scene).await;
        assert_eq!(loader.calls(), 1);
        assert!(sync.node_of(id).is_some());
    }

    #[tokio::test]
    async fn test_reconcile_twice_is_idempotent() {
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let mut sync = instant();
        let id = store.add_item(FurnitureKind::Wardrobe, 2.0, -1.0);
        store.rotate_item(id);
        sync.settle(store.items(), &mut scene).await;

        let node = sync.node_of(id).unwrap();
        let before = scene.transform(node).unwrap();
        let nodes_before = scene.len();

        let report = sync.reconcile(store.items(), &mut scene);
        assert!(report.is_noop());
        assert_eq!(scene.transform(node).unwrap(), before);
        assert_eq!(scene.len(), nodes_before);
    }

    #[tokio::test]
    async fn test_move_and_rotate_update_transform() {
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let mut sync = instant();
        let id = store.add_item(FurnitureKind::Desk, 0.0, 0.0);
        sync.settle(store.items(), &mut scene).await;

        store.move_item(id, 2.0, 3.0);
        store.rotate_item(id);
        let report = sync.reconcile(store.items(), &mut scene);
        assert_eq!(report.moved, 1);

        let transform = scene.transform(sync.node_of(id).unwrap()).unwrap();
        assert_eq!(transform.translation, Vec3::new(2.0, 0.0, 3.0));
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        assert!(transform.rotation.abs_diff_eq(expected, 1e-6));
    }

    #[tokio::test]
    async fn test_removed_item_node_is_disposed() {
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let mut sync = instant();
        let keep = store.add_item(FurnitureKind::Bed, 0.0, 0.0);
        let gone = store.add_item(FurnitureKind::Chair, 1.0, 1.0);
        sync.settle(store.items(), &mut scene).await;
        let gone_node = sync.node_of(gone).unwrap();

        store.remove_item(gone);
        let report = sync.reconcile(store.items(), &mut scene);
        assert_eq!(report.removed, 1);
        assert!(!scene.contains(gone_node));
        assert_eq!(sync.pool().present_ids(), vec![keep]);
    }

    #[tokio::test]
    async fn test_item_removed_mid_load_does_not_leak() {
        let loader = GatedLoader::closed();
        let mut sync = with_loader(&loader);
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let baseline = scene.len();

        let id = store.add_item(FurnitureKind::Bed, 0.0, 0.0);
        sync.reconcile(store.items(), &mut scene);
        store.remove_item(id);
        sync.reconcile(store.items(), &mut scene);

        loader.release(1);
        let report = sync.settle(store.items(), &mut scene).await;
        assert_eq!(report.discarded, 1);
        assert!(sync.pool().is_empty());
        assert_eq!(scene.len(), baseline);
    }

    #[tokio::test]
    async fn test_undo_while_loading_keeps_single_load() {
        let loader = GatedLoader::closed();
        let mut sync = with_loader(&loader);
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();

        let id = store.add_item(FurnitureKind::Chair, 0.0, 0.0);
        sync.reconcile(store.items(), &mut scene);
        store.remove_item(id);
        sync.reconcile(store.items(), &mut scene);
        store.undo();
        sync.reconcile(store.items(), &mut scene);
        assert_eq!(loader.calls(), 1);

        loader.release(1);
        sync.settle(store.items(), &mut scene).await;
        assert!(sync.node_of(id).is_some());
    }

    #[tokio::test]
    async fn test_failed_load_skipped_without_retry() {
        let loader = GatedLoader::failing(FurnitureKind::Bed);
        let mut sync = with_loader(&loader);
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let bed = store.add_item(FurnitureKind::Bed, 0.0, 0.0);
        let desk = store.add_item(FurnitureKind::Desk, 1.0, 0.0);

        let report = sync.settle(store.items(), &mut scene).await;
        assert_eq!(report.failed, 1);
        assert_eq!(sync.pool().present_ids(), vec![desk]);
        assert_eq!(sync.pool().get(bed), Some(&PoolEntry::Failed));

        sync.settle(store.items(), &mut scene).await;
        assert_eq!(loader.calls(), 2);

        assert_eq!(sync.retry_failed(), 1);
        sync.settle(store.items(), &mut scene).await;
        assert_eq!(loader.calls(), 3);
        // Failed item still counts in the store
        assert_eq!(store.count(), 2);
    }

    #[tokio::test]
    async fn test_sync_if_changed_skips_idle_frames() {
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let mut sync = instant();
        sync.subscribe_to(&store);

        assert!(sync.sync_if_changed(&store, &mut scene).is_some());
        assert!(sync.sync_if_changed(&store, &mut scene).is_none());

        let id = store.add_item(FurnitureKind::Desk, 0.0, 0.0);
        let report = sync.sync_if_changed(&store, &mut scene).unwrap();
        assert_eq!(report.loads_started, 1);

        // The completed load alone is enough to trigger the next pass
        while sync.node_of(id).is_none() {
            tokio::task::yield_now().await;
            sync.sync_if_changed(&store, &mut scene);
        }
        assert!(sync.sync_if_changed(&store, &mut scene).is_none());
    }

    #[tokio::test]
    async fn test_retry_wakes_change_driven_sync() {
        let loader = GatedLoader::failing(FurnitureKind::Chair);
        let mut sync = with_loader(&loader);
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        sync.subscribe_to(&store);
        store.add_item(FurnitureKind::Chair, 0.5, 0.5);

        sync.settle(store.items(), &mut scene).await;
        while sync.sync_if_changed(&store, &mut scene).is_some() {}
        assert_eq!(sync.pool().failed_count(), 1);

        sync.retry_failed();
        let report = sync.sync_if_changed(&store, &mut scene).unwrap();
        assert_eq!(report.loads_started, 1);
    }

    #[tokio::test]
    async fn test_random_add_remove_sequences_converge() {
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let mut sync = instant();
        let baseline = scene.len();

        // Small LCG so the sequence is reproducible
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as usize
        };

        for step in 0..200 {
            let ids = store_ids(&store);
            if ids.is_empty() || next() % 3 != 0 {
                let kind = FurnitureKind::ALL[next() % FurnitureKind::ALL.len()];
                store.add_item(kind, (next() % 7) as f32 - 3.0, (next() % 7) as f32 - 3.0);
            } else {
                store.remove_item(ids[next() % ids.len()]);
            }
            if step % 4 == 0 {
                sync.reconcile(store.items(), &mut scene);
            }
            if step % 9 == 0 {
                tokio::task::yield_now().await;
            }
        }

        sync.settle(store.items(), &mut scene).await;
        assert_eq!(sync.pool().present_ids(), store_ids(&store));

        let owners: BTreeSet<ItemId> = scene
            .drawables()
            .filter_map(|(node, _, _)| scene.owning_item(node))
            .collect();
        assert_eq!(owners.into_iter().collect::<Vec<_>>(), store_ids(&store));

        store.clear_all();
        sync.settle(store.items(), &mut scene).await;
        assert!(sync.pool().is_empty());
        assert_eq!(scene.len(), baseline);
    }

    #[tokio::test]
    async fn test_teardown_removes_nodes() {
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let mut sync = instant();
        store.add_item(FurnitureKind::Bed, 0.0, 0.0);
        sync.settle(store.items(), &mut scene).await;
        assert!(scene.len() > 1);

        sync.teardown(&mut scene);
        assert_eq!(scene.len(), 1);
        assert!(sync.pool().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_with_load_in_flight_stays_empty() {
        let loader = GatedLoader::closed();
        let mut sync = with_loader(&loader);
        let mut store = FurnitureStore::new();
        let mut scene = SceneGraph::new();
        let desk = store.add_item(FurnitureKind::Desk, 0.0, 0.0);
        loader.release(1);
        sync.settle(store.items(), &mut scene).await;
        store.add_item(FurnitureKind::Bed, 1.0, 1.0);
        sync.reconcile(store.items(), &mut scene);
        assert!(sync.node_of(desk).is_some());
        assert_eq!(sync.pending_loads(), 1);

        sync.teardown(&mut scene);
        assert_eq!(scene.len(), 1);
        assert!(sync.pool().is_empty());

        loader.release(1);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(sync.reconcile(store.items(), &mut scene).is_noop());
        assert!(sync.sync_if_changed(&store, &mut scene).map_or(true, |r| r.is_noop()));
        assert_eq!(scene.len(), 1);
        assert_eq!(loader.calls(), 2);
    }
}
