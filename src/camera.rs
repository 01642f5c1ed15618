use glam::Vec2;

/// Default camera-plane length: tan(fov / 2) for a ~66° horizontal FOV.
pub const DEFAULT_PLANE_LENGTH: f32 = 0.66;

/// First-person grid camera.
///
/// The camera plane is perpendicular to `direction`; its length is the tangent
/// of half the horizontal field of view. Screen column `x` of `w` looks along
/// ```text
/// direction + plane * (2x / w - 1)
/// ```
/// so the left edge ray is `direction - plane` and the right edge ray is
/// `direction + plane`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// World-space position in cell units.
    pub position: Vec2,
    /// Forward vector (unit length).
    pub direction: Vec2,
    /// Camera plane; encodes the field of view.
    pub plane: Vec2,
}

impl Camera {
    /// Camera at `position` looking along `direction`, with the plane on the
    /// right-hand side in a y-down grid.
    pub fn new(position: Vec2, direction: Vec2) -> Self {
        Self::with_plane_length(position, direction, DEFAULT_PLANE_LENGTH)
    }

    pub fn with_plane_length(position: Vec2, direction: Vec2, plane_length: f32) -> Self {
        let direction = direction.normalize_or(Vec2::X);
        // Rotate 90° so that +x forward puts the plane along +y.
        let plane = Vec2::new(-direction.y, direction.x) * plane_length;
        Self { position, direction, plane }
    }

    /// Camera looking along `angle` radians (0 = +x, grows toward +y).
    pub fn from_angle(position: Vec2, angle: f32) -> Self {
        Self::new(position, Vec2::from_angle(angle))
    }

    /// Ray direction for a camera-space offset in `[-1, 1]`.
    #[inline]
    pub fn ray_dir(&self, camera_x: f32) -> Vec2 {
        self.direction + self.plane * camera_x
    }

    /// Camera-space offset for screen column `x` of `width`.
    #[inline]
    pub fn column_offset(x: u32, width: u32) -> f32 {
        2.0 * x as f32 / width as f32 - 1.0
    }

    /// Rotate direction and plane together by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        let rot = Vec2::from_angle(angle);
        self.direction = rot.rotate(self.direction);
        self.plane = rot.rotate(self.plane);
    }

    /// Transform a world point into camera space via the inverse of the
    /// `[plane, direction]` basis.
    ///
    /// Returns `(x, depth)`: `x` runs along the plane, `depth` along the
    /// forward axis. Points behind the camera have `depth <= 0`.
    pub fn to_camera_space(&self, world: Vec2) -> Vec2 {
        let rel = world - self.position;
        let det = self.plane.x * self.direction.y - self.direction.x * self.plane.y;
        if det == 0.0 {
            return Vec2::ZERO;
        }
        let inv_det = 1.0 / det;
        Vec2::new(
            inv_det * (self.direction.y * rel.x - self.direction.x * rel.y),
            inv_det * (-self.plane.y * rel.x + self.plane.x * rel.y),
        )
    }

    /// Angle of the forward vector in radians.
    pub fn angle(&self) -> f32 {
        self.direction.y.atan2(self.direction.x)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::new(1.5, 1.5), Vec2::X)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_is_perpendicular_to_direction() {
        let cam = Camera::from_angle(Vec2::ZERO, 0.7);
        assert!(cam.direction.dot(cam.plane).abs() < 1e-6);
        assert!((cam.plane.length() - DEFAULT_PLANE_LENGTH).abs() < 1e-6);
    }

    #[test]
    fn centre_column_looks_forward() {
        let cam = Camera::new(Vec2::ZERO, Vec2::X);
        assert_eq!(Camera::column_offset(160, 320), 0.0);
        assert_eq!(cam.ray_dir(0.0), Vec2::X);
    }

    #[test]
    fn rotate_keeps_basis_orthogonal() {
        let mut cam = Camera::new(Vec2::ZERO, Vec2::X);
        for _ in 0..100 {
            cam.rotate(0.04);
        }
        assert!(cam.direction.dot(cam.plane).abs() < 1e-4);
        assert!((cam.angle() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn point_straight_ahead_has_zero_camera_x() {
        let cam = Camera::new(Vec2::new(1.5, 1.5), Vec2::X);
        let p = cam.to_camera_space(Vec2::new(4.5, 1.5));
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn point_behind_has_negative_depth() {
        let cam = Camera::new(Vec2::new(1.5, 1.5), Vec2::X);
        assert!(cam.to_camera_space(Vec2::new(0.5, 1.5)).y < 0.0);
    }
}
