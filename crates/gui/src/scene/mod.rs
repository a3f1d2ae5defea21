//! Retained scene graph
//!
//! A small node hierarchy standing in for the 3D engine: nodes carry a local
//! transform, optional mesh, an optional surface tag, and an optional
//! non-owning back-reference to the furniture item they display.

mod room;

pub use room::{build_room, RoomNodes};

use std::collections::BTreeMap;

use glam::{Mat4, Quat, Vec3};
use shared::ItemId;

use crate::viewport::mesh::MeshData;
use crate::viewport::picking::{ray_mesh, Ray};

/// Handle to a node; never reused after removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

/// Explicit capability tag set at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceTag {
    /// Horizontal surface that drops and drags resolve against (the floor)
    Placement,
}

/// Local transform: translation plus rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl NodeTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

/// A scene node
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,
    pub transform: NodeTransform,
    pub mesh: Option<MeshData>,
    pub surface: Option<SurfaceTag>,
    /// Item this node displays. Non-owning: the store owns the record,
    /// the synchronizer owns the node.
    pub owner: Option<ItemId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Empty grouping node
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Node drawing a mesh
    pub fn mesh(name: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            ..Default::default()
        }
    }

    pub fn with_surface(mut self, tag: SurfaceTag) -> Self {
        self.surface = Some(tag);
        self
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn is_placement_surface(&self) -> bool {
        self.surface == Some(SurfaceTag::Placement)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Which nodes a ray query considers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayFilter {
    /// Every node with a mesh
    All,
    /// Only nodes tagged [`SurfaceTag::Placement`]
    PlacementSurfaces,
}

/// Nearest intersection of a ray with the scene
#[derive(Debug, Clone, Copy)]
pub struct SceneHit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

/// Node hierarchy with a fixed root
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, Node::group("root"));
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Attach `node` under `parent`; falls back to the root if `parent` is gone
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let parent = if self.contains(parent) { parent } else { self.root };
        let id = NodeId(self.next_id);
        self.next_id += 1;

        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Detach and drop a node with its whole subtree; returns how many nodes went away.
    /// The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if id == self.root {
            return 0;
        }
        let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) else {
            return 0;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    pub fn transform(&self, id: NodeId) -> Option<NodeTransform> {
        self.nodes.get(&id).map(|n| n.transform)
    }

    /// Replace a node's local transform; false when the node is gone
    pub fn set_transform(&mut self, id: NodeId, transform: NodeTransform) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn set_owner(&mut self, id: NodeId, owner: Option<ItemId>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.owner = owner;
                true
            }
            None => false,
        }
    }

    /// Walk up from `id` to the first node carrying an item back-reference
    pub fn owning_item(&self, id: NodeId) -> Option<ItemId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            if let Some(owner) = node.owner {
                return Some(owner);
            }
            current = node.parent;
        }
        None
    }

    /// Local-to-world matrix, composed through the parent chain
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(&node_id) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Every node that has a mesh, with its world matrix
    pub fn drawables(&self) -> impl Iterator<Item = (NodeId, &MeshData, Mat4)> + '_ {
        self.nodes.iter().filter_map(|(id, node)| {
            node.mesh
                .as_ref()
                .map(|mesh| (*id, mesh, self.world_matrix(*id)))
        })
    }

    /// Nearest hit along the ray among the nodes selected by `filter`
    pub fn intersect(&self, ray: &Ray, filter: RayFilter) -> Option<SceneHit> {
        let mut best: Option<SceneHit> = None;

        for (id, node) in &self.nodes {
            let Some(mesh) = node.mesh.as_ref() else {
                continue;
            };
            if filter == RayFilter::PlacementSurfaces && !node.is_placement_surface() {
                continue;
            }
            let world = self.world_matrix(*id);
            if let Some(distance) = ray_mesh(ray, mesh, &world) {
                if best.as_ref().map_or(true, |b| distance < b.distance) {
                    best = Some(SceneHit {
                        node: *id,
                        distance,
                        point: ray.at(distance),
                    });
                }
            }
        }

        best
    }
}
