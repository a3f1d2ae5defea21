use glam::{Mat4, Vec3};

use super::mesh::MeshData;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// World-space AABB of a mesh placed by `world` (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData, world: &Mat4) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for i in 0..data.vertex_count() {
            let p = world.transform_point3(data.position(i));
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Outside triangle (u)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Outside triangle (v)
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Nearest distance at which the ray hits a front face of a mesh placed by `world`.
/// Back faces are skipped the same way both renderers cull them, so a wall
/// seen from outside the room never hides what is drawn behind it.
/// The AABB test rejects most misses before walking triangles.
pub fn ray_mesh(ray: &Ray, mesh: &MeshData, world: &Mat4) -> Option<f32> {
    if mesh.is_empty() {
        return None;
    }
    // Flat meshes (floor quads) have a zero-thickness box; pad it so the slab test holds
    let mut aabb = Aabb::from_mesh(mesh, world);
    aabb.min -= Vec3::splat(1e-4);
    aabb.max += Vec3::splat(1e-4);
    ray_aabb(ray, &aabb)?;

    let mut best: Option<f32> = None;
    for tri in mesh.triangles() {
        let tri = tri.transformed(world);
        if tri.normal.dot(ray.direction) >= 0.0 {
            continue;
        }
        if let Some(dist) = ray_triangle_intersect(ray, tri.a, tri.b, tri.c) {
            if best.map_or(true, |d| dist < d) {
                best = Some(dist);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::{cube, floor_quad};

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, 10.0, z),
            direction: Vec3::NEG_Y,
        }
    }

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let (v0, v1, v2) = (
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert_eq!(ray_triangle_intersect(&down_ray(0.0, 0.0), v0, v1, v2), Some(10.0));
        assert!(ray_triangle_intersect(&down_ray(5.0, 0.0), v0, v1, v2).is_none());
    }

    #[test]
    fn test_ray_aabb_behind_origin_misses() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let ray = Ray {
            origin: Vec3::new(0.0, 5.0, 0.0),
            direction: Vec3::Y,
        };
        assert!(ray_aabb(&ray, &aabb).is_none());
    }

    #[test]
    fn test_ray_mesh_uses_world_transform() {
        let mesh = cube(1.0, 1.0, 1.0, [1.0; 3]);
        let world = Mat4::from_translation(Vec3::new(3.0, 0.5, 0.0));
        let dist = ray_mesh(&down_ray(3.1, 0.2), &mesh, &world).unwrap();
        assert!((dist - 9.0).abs() < 1e-5);
        assert!(ray_mesh(&down_ray(0.0, 0.0), &mesh, &world).is_none());
    }

    #[test]
    fn test_ray_mesh_skips_back_faces() {
        // Floor seen from below: only its back face is in the way
        let floor = floor_quad(4.0, 4.0, [0.5; 3]);
        let up = Ray {
            origin: Vec3::new(1.0, -5.0, -0.5),
            direction: Vec3::Y,
        };
        assert!(ray_mesh(&up, &floor, &Mat4::IDENTITY).is_none());

        // Inside a cube the ray exits through a back face: no hit
        let cube = cube(2.0, 2.0, 2.0, [1.0; 3]);
        let inside = Ray {
            origin: Vec3::new(0.1, 0.0, 0.2),
            direction: Vec3::NEG_Y,
        };
        assert!(ray_mesh(&inside, &cube, &Mat4::IDENTITY).is_none());
    }

    #[test]
    fn test_ray_mesh_flat_floor() {
        let floor = floor_quad(4.0, 4.0, [0.5; 3]);
        let dist = ray_mesh(&down_ray(1.0, -0.5), &floor, &Mat4::IDENTITY).unwrap();
        assert!((dist - 10.0).abs() < 1e-5);
        assert!(ray_mesh(&down_ray(3.0, 0.0), &floor, &Mat4::IDENTITY).is_none());
    }
}
