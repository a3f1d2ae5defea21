//! Pointer → world queries: surface casts for placement, picks for selection

use glam::Vec2;
use shared::{ItemId, RoomPosition};

use crate::scene::{RayFilter, SceneGraph};
use crate::viewport::camera::ArcBallCamera;

/// What a pointer ray is cast through: camera, viewport aspect and scene
#[derive(Clone, Copy)]
pub struct RaycastView<'a> {
    pub camera: &'a ArcBallCamera,
    /// Viewport width / height
    pub aspect: f32,
    pub scene: &'a SceneGraph,
}

impl<'a> RaycastView<'a> {
    pub fn new(camera: &'a ArcBallCamera, aspect: f32, scene: &'a SceneGraph) -> Self {
        Self {
            camera,
            aspect,
            scene,
        }
    }

    pub fn cast_to_surface(&self, pointer_ndc: Vec2) -> Option<RoomPosition> {
        cast_to_surface(pointer_ndc, self.camera, self.aspect, self.scene)
    }

    pub fn pick_item(&self, pointer_ndc: Vec2) -> Option<ItemId> {
        pick_item(pointer_ndc, self.camera, self.aspect, self.scene)
    }
}

/// First point on a placement surface under the pointer, as room-plane
/// coordinates (world X, world Z). None when the ray misses every surface.
pub fn cast_to_surface(
    pointer_ndc: Vec2,
    camera: &ArcBallCamera,
    aspect: f32,
    scene: &SceneGraph,
) -> Option<RoomPosition> {
    if !pointer_ndc.is_finite() {
        return None;
    }
    let ray = camera.ray_from_ndc(pointer_ndc, aspect);
    let hit = scene.intersect(&ray, RayFilter::PlacementSurfaces)?;
    Some(RoomPosition::new(hit.point.x, hit.point.z))
}

/// Item owning the nearest node under the pointer. Hits on nodes without an
/// owner anywhere up their parent chain (floor, walls) yield None.
pub fn pick_item(
    pointer_ndc: Vec2,
    camera: &ArcBallCamera,
    aspect: f32,
    scene: &SceneGraph,
) -> Option<ItemId> {
    if !pointer_ndc.is_finite() {
        return None;
    }
    let ray = camera.ray_from_ndc(pointer_ndc, aspect);
    let hit = scene.intersect(&ray, RayFilter::All)?;
    scene.owning_item(hit.node)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    use super::*;
    use crate::scene::{build_room, Node};
    use crate::state::settings::{RoomSettings, ViewportSettings};
    use crate::viewport::mesh::cube;

    const ASPECT: f32 = 1.5;

    fn room_scene() -> SceneGraph {
        let mut scene = SceneGraph::new();
        build_room(&mut scene, &RoomSettings::default(), &ViewportSettings::default());
        scene
    }

    #[test]
    fn test_cast_hits_floor_under_projected_point() {
        let scene = room_scene();
        let camera = ArcBallCamera::new();
        let ndc = camera.project(Vec3::new(1.2, 0.0, -0.5), ASPECT).unwrap();

        let hit = cast_to_surface(ndc, &camera, ASPECT, &scene).unwrap();
        assert_abs_diff_eq!(hit.x, 1.2, epsilon = 1e-3);
        assert_abs_diff_eq!(hit.y, -0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_cast_outside_room_misses() {
        let scene = room_scene();
        let camera = ArcBallCamera::new();
        // Far beyond the 8x8 room on the floor plane
        let ndc = camera.project(Vec3::new(40.0, 0.0, -40.0), ASPECT);
        if let Some(ndc) = ndc {
            assert!(cast_to_surface(ndc, &camera, ASPECT, &scene).is_none());
        }
        assert!(cast_to_surface(Vec2::new(0.0, 50.0), &camera, ASPECT, &scene).is_none());
    }

    #[test]
    fn test_cast_ignores_furniture_in_the_way() {
        let mut scene = room_scene();
        scene.add(
            scene.root(),
            Node::mesh("crate", cube(1.0, 2.0, 1.0, [1.0; 3])).with_translation(Vec3::new(0.0, 1.0, 0.0)),
        );
        let camera = ArcBallCamera::new();
        let ndc = camera.project(Vec3::new(0.1, 0.0, 0.1), ASPECT).unwrap();
        let hit = cast_to_surface(ndc, &camera, ASPECT, &scene).unwrap();
        assert_abs_diff_eq!(hit.x, 0.1, epsilon = 1e-3);
        assert_abs_diff_eq!(hit.y, 0.1, epsilon = 1e-3);
    }

    #[test]
    fn test_pick_resolves_owner_through_parent() {
        let mut scene = room_scene();
        let group = scene.add(
            scene.root(),
            Node::group("item").with_translation(Vec3::new(-1.0, 0.0, 1.0)),
        );
        scene.add(
            group,
            Node::mesh("part", cube(1.0, 1.0, 1.0, [1.0; 3])).with_translation(Vec3::new(0.0, 0.5, 0.0)),
        );
        scene.set_owner(group, Some(42));

        let camera = ArcBallCamera::new();
        let on_item = camera.project(Vec3::new(-1.1, 1.0, 1.1), ASPECT).unwrap();
        assert_eq!(pick_item(on_item, &camera, ASPECT, &scene), Some(42));

        let on_floor = camera.project(Vec3::new(2.0, 0.0, -2.0), ASPECT).unwrap();
        assert_eq!(pick_item(on_floor, &camera, ASPECT, &scene), None);
    }

    #[test]
    fn test_pick_nearest_wins() {
        let mut scene = room_scene();
        let near = scene.add(scene.root(), Node::group("near"));
        scene.add(near, Node::mesh("tall", cube(1.0, 3.0, 1.0, [1.0; 3])).with_translation(Vec3::new(0.0, 1.5, 0.0)));
        scene.set_owner(near, Some(1));
        let far = scene.add(scene.root(), Node::group("far"));
        scene.add(far, Node::mesh("flat", cube(3.0, 0.2, 3.0, [1.0; 3])).with_translation(Vec3::new(0.0, 0.1, 0.0)));
        scene.set_owner(far, Some(2));

        let camera = ArcBallCamera::new();
        let ndc = camera.project(Vec3::new(0.1, 3.0, 0.1), ASPECT).unwrap();
        assert_eq!(pick_item(ndc, &camera, ASPECT, &scene), Some(1));
    }
}
