use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;
use crate::state::settings::CameraSettings;

/// Arc-ball camera orbiting the room center
#[derive(Clone, Debug)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self::from_settings(&CameraSettings::default())
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            yaw: settings.yaw_degrees.to_radians(),
            pitch: settings.pitch_degrees.to_radians().clamp(-1.5, 1.5),
            distance: settings.distance,
            target: Vec3::ZERO,
            fov: settings.fov_degrees.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        // Stay above the floor; looking from below the room is never useful here
        self.pitch = (self.pitch + dy.to_radians()).clamp(0.05, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 100.0);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        let offset = right * dx + up * dy;
        self.target += offset;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 200.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a world point to NDC; None when it is behind the camera
    pub fn project(&self, point: Vec3, aspect: f32) -> Option<Vec2> {
        let p = self.view_projection(aspect) * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        Some(p.truncate().truncate() / p.w)
    }

    /// Cast a ray from an NDC pointer position into the scene
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        // Inverse view-projection
        let vp_inv = self.view_projection(aspect).inverse();

        // Unproject near and far points
        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }
}

/// Viewport pixel position → NDC in [-1, 1], +Y up
pub fn screen_to_ndc(pos: Vec2, rect_min: Vec2, size: Vec2) -> Vec2 {
    let center = rect_min + size * 0.5;
    Vec2::new(
        (pos.x - center.x) / (size.x * 0.5),
        -(pos.y - center.y) / (size.y * 0.5),
    )
}

/// NDC → viewport pixel position
pub fn ndc_to_screen(ndc: Vec2, rect_min: Vec2, size: Vec2) -> Vec2 {
    let center = rect_min + size * 0.5;
    Vec2::new(
        center.x + ndc.x * size.x * 0.5,
        center.y - ndc.y * size.y * 0.5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ray_through_projected_point_passes_through_it() {
        let camera = ArcBallCamera::new();
        let point = Vec3::new(1.2, 0.0, -0.5);
        let ndc = camera.project(point, 1.5).unwrap();
        let ray = camera.ray_from_ndc(ndc, 1.5);

        // Distance from point to the ray line
        let to_point = point - ray.origin;
        let along = to_point.dot(ray.direction);
        assert!(along > 0.0);
        assert_abs_diff_eq!((to_point - ray.direction * along).length(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = ArcBallCamera::new();
        let ray = camera.ray_from_ndc(Vec2::ZERO, 1.0);
        let expected = (camera.target - camera.eye_position()).normalize();
        assert_abs_diff_eq!(ray.direction.dot(expected), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_screen_ndc_roundtrip() {
        let min = Vec2::new(100.0, 50.0);
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(screen_to_ndc(Vec2::new(500.0, 350.0), min, size), Vec2::ZERO);
        assert_eq!(screen_to_ndc(Vec2::new(900.0, 50.0), min, size), Vec2::new(1.0, 1.0));
        let back = ndc_to_screen(Vec2::new(-1.0, -1.0), min, size);
        assert_eq!(back, Vec2::new(100.0, 650.0));
    }

    #[test]
    fn test_pitch_stays_above_floor() {
        let mut camera = ArcBallCamera::new();
        camera.rotate(0.0, -180.0);
        assert!(camera.eye_position().y > 0.0);
    }
}
