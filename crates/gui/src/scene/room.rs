//! Room geometry: a tagged floor and four untagged walls

use glam::Vec3;

use super::{Node, NodeId, SceneGraph, SurfaceTag};
use crate::state::settings::{rgb_to_f32, RoomSettings, ViewportSettings};
use crate::viewport::mesh::{floor_quad, wall_quad};

/// Node handles of a built room
#[derive(Debug, Clone, Copy)]
pub struct RoomNodes {
    pub root: NodeId,
    pub floor: NodeId,
    pub walls: [NodeId; 4],
}

/// Build the room under the scene root. Walls face inward and are not
/// placement surfaces, so drops and drags only ever land on the floor.
pub fn build_room(scene: &mut SceneGraph, room: &RoomSettings, colors: &ViewportSettings) -> RoomNodes {
    let root = scene.add(scene.root(), Node::group("room"));

    let floor = scene.add(
        root,
        Node::mesh(
            "floor",
            floor_quad(room.width, room.depth, rgb_to_f32(colors.floor_color)),
        )
        .with_surface(SurfaceTag::Placement),
    );

    let hw = room.width * 0.5;
    let hd = room.depth * 0.5;
    let wall_color = rgb_to_f32(colors.wall_color);
    // Corners walked so the interior is always on the right of each wall
    let corners = [
        (Vec3::new(-hw, 0.0, -hd), Vec3::new(hw, 0.0, -hd)),
        (Vec3::new(hw, 0.0, -hd), Vec3::new(hw, 0.0, hd)),
        (Vec3::new(hw, 0.0, hd), Vec3::new(-hw, 0.0, hd)),
        (Vec3::new(-hw, 0.0, hd), Vec3::new(-hw, 0.0, -hd)),
    ];
    let walls = corners.map(|(start, end)| {
        scene.add(
            root,
            Node::mesh("wall", wall_quad(start, end, room.wall_height, wall_color)),
        )
    });

    tracing::debug!(width = room.width, depth = room.depth, "room built");
    RoomNodes { root, floor, walls }
}
