//! Factory functions for test data and scripted model loaders.
//!
//! Used by unit tests and the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use shared::{FurnitureKind, ItemId};
use tokio::sync::Semaphore;

use crate::state::store::FurnitureStore;
use crate::sync::{procedural_parts, AssetRef, LoadError, LoadFuture, Model, ModelLoader};

// ── Layouts ─────────────────────────────────────────────────────

/// A small bedroom inside the default 8×8 room
pub fn bedroom_layout() -> Vec<(FurnitureKind, f32, f32)> {
    vec![
        (FurnitureKind::Bed, -2.5, -2.0),
        (FurnitureKind::Wardrobe, 3.0, -3.3),
        (FurnitureKind::Desk, 2.4, 1.8),
        (FurnitureKind::Chair, 2.4, 1.1),
    ]
}

/// Add every entry of a layout to the store, in order
pub fn populate(store: &mut FurnitureStore, layout: &[(FurnitureKind, f32, f32)]) -> Vec<ItemId> {
    layout
        .iter()
        .map(|&(kind, x, y)| store.add_item(kind, x, y))
        .collect()
}

// ── Loaders ─────────────────────────────────────────────────────

/// Procedural loader whose loads wait for explicitly released permits.
///
/// Clones share the gate and the call counter, so a test can keep one
/// clone while the synchronizer owns another.
#[derive(Clone, Debug)]
pub struct GatedLoader {
    gate: Option<Arc<Semaphore>>,
    calls: Arc<AtomicUsize>,
    fail_kind: Option<FurnitureKind>,
}

impl GatedLoader {
    /// Every load blocks until [`GatedLoader::release`]
    pub fn closed() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            calls: Arc::new(AtomicUsize::new(0)),
            fail_kind: None,
        }
    }

    /// Loads resolve immediately
    pub fn open() -> Self {
        Self {
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
            fail_kind: None,
        }
    }

    /// Loads of `kind` fail, others resolve immediately
    pub fn failing(kind: FurnitureKind) -> Self {
        Self {
            fail_kind: Some(kind),
            ..Self::open()
        }
    }

    /// Let `n` pending loads through
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Loads started so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelLoader for GatedLoader {
    fn load(&self, asset: &AssetRef) -> LoadFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.clone();
        let kind = asset.kind;
        let fail = self.fail_kind == Some(kind);
        Box::pin(async move {
            if let Some(gate) = gate {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|e| LoadError::Aborted(e.to_string()))?;
                permit.forget();
            }
            if fail {
                return Err(LoadError::Empty(kind.to_string()));
            }
            Ok(Model::from_parts(&procedural_parts(kind)))
        })
    }
}
