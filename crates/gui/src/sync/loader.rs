//! Furniture model loading
//!
//! Models are resolved from a static kind → asset table and loaded
//! asynchronously through a [`ModelLoader`].

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::FurnitureKind;

use crate::state::settings::rgb_to_f32;
use crate::viewport::mesh::{cube, MeshData};

/// Reference to a model asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetRef {
    pub kind: FurnitureKind,
    /// Path relative to the model directory
    pub path: &'static str,
}

/// Static kind → asset table
pub fn asset_for(kind: FurnitureKind) -> AssetRef {
    let path = match kind {
        FurnitureKind::Bed => "models/bed.json",
        FurnitureKind::Desk => "models/desk.json",
        FurnitureKind::Chair => "models/chair.json",
        FurnitureKind::Wardrobe => "models/wardrobe.json",
    };
    AssetRef { kind, path }
}

/// Asset loading failure
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("model {0} has no parts")]
    Empty(String),
    #[error("model load aborted: {0}")]
    Aborted(String),
}

/// One box-shaped part of a model file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDef {
    pub name: String,
    /// Width, height, depth
    pub size: [f32; 3],
    /// Center of the part relative to the item origin (on the floor)
    pub offset: [f32; 3],
    /// RGB
    pub color: [u8; 3],
}

/// On-disk model: a list of parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub parts: Vec<PartDef>,
}

/// Loaded mesh for one part
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub mesh: MeshData,
    pub offset: Vec3,
}

/// A loaded furniture model: a group of part meshes
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub parts: Vec<ModelPart>,
}

impl Model {
    pub fn from_parts(parts: &[PartDef]) -> Self {
        Self {
            parts: parts
                .iter()
                .map(|p| ModelPart {
                    name: p.name.clone(),
                    mesh: cube(p.size[0], p.size[1], p.size[2], rgb_to_f32(p.color)),
                    offset: Vec3::from(p.offset),
                })
                .collect(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.triangle_count()).sum()
    }
}

pub type LoadFuture = Pin<Box<dyn Future<Output = Result<Model, LoadError>> + Send + 'static>>;

/// Asynchronous model source
pub trait ModelLoader: Send + Sync + 'static {
    fn load(&self, asset: &AssetRef) -> LoadFuture;
}

/// Built-in box models; never touches the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralModelLoader;

impl ModelLoader for ProceduralModelLoader {
    fn load(&self, asset: &AssetRef) -> LoadFuture {
        let parts = procedural_parts(asset.kind);
        Box::pin(async move { Ok(Model::from_parts(&parts)) })
    }
}

fn part(name: &str, size: [f32; 3], offset: [f32; 3], color: [u8; 3]) -> PartDef {
    PartDef {
        name: name.to_string(),
        size,
        offset,
        color,
    }
}

/// Box layout of the built-in models, in meters
pub fn procedural_parts(kind: FurnitureKind) -> Vec<PartDef> {
    const WOOD: [u8; 3] = [139, 99, 64];
    const DARK_WOOD: [u8; 3] = [96, 66, 44];
    const LINEN: [u8; 3] = [220, 220, 232];
    const METAL: [u8; 3] = [90, 92, 98];

    match kind {
        FurnitureKind::Bed => vec![
            part("frame", [1.6, 0.45, 2.0], [0.0, 0.225, 0.0], WOOD),
            part("headboard", [1.6, 0.6, 0.1], [0.0, 0.75, -0.95], DARK_WOOD),
            part("mattress", [1.5, 0.1, 1.8], [0.0, 0.5, 0.05], LINEN),
        ],
        FurnitureKind::Desk => {
            let mut parts = vec![part("top", [1.4, 0.05, 0.7], [0.0, 0.725, 0.0], WOOD)];
            for (x, z) in [(-0.65, -0.3), (0.65, -0.3), (-0.65, 0.3), (0.65, 0.3)] {
                parts.push(part("leg", [0.05, 0.7, 0.05], [x, 0.35, z], METAL));
            }
            parts
        }
        FurnitureKind::Chair => {
            let mut parts = vec![
                part("seat", [0.45, 0.05, 0.45], [0.0, 0.45, 0.0], WOOD),
                part("back", [0.45, 0.5, 0.05], [0.0, 0.725, -0.2], WOOD),
            ];
            for (x, z) in [(-0.2, -0.2), (0.2, -0.2), (-0.2, 0.2), (0.2, 0.2)] {
                parts.push(part("leg", [0.04, 0.43, 0.04], [x, 0.215, z], DARK_WOOD));
            }
            parts
        }
        FurnitureKind::Wardrobe => vec![
            part("body", [1.2, 2.0, 0.6], [0.0, 1.0, 0.0], DARK_WOOD),
            part("door_left", [0.58, 1.9, 0.02], [-0.3, 1.0, 0.31], WOOD),
            part("door_right", [0.58, 1.9, 0.02], [0.3, 1.0, 0.31], WOOD),
        ],
    }
}

/// Reads JSON model files from a directory
#[derive(Debug, Clone)]
pub struct FileModelLoader {
    root: PathBuf,
}

impl FileModelLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ModelLoader for FileModelLoader {
    fn load(&self, asset: &AssetRef) -> LoadFuture {
        let path = self.root.join(asset.path);
        Box::pin(async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(LoadError::NotFound(path));
                }
                Err(source) => return Err(LoadError::Io { path, source }),
            };
            let file: ModelFile = match serde_json::from_slice(&bytes) {
                Ok(file) => file,
                Err(source) => return Err(LoadError::Malformed { path, source }),
            };
            if file.parts.is_empty() {
                return Err(LoadError::Empty(path.display().to_string()));
            }
            Ok(Model::from_parts(&file.parts))
        })
    }
}
