//! Free-look camera: position plus pitch/yaw rotation.
//!
//! Matches the pathtrace shader's ray construction: the view direction
//! is the +Z axis rotated first around X (pitch), then around Y (yaw).

use glam::Vec3;

/// Pitch limit just short of straight up/down.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2;

/// Camera state driving the pathtrace uniforms.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    rotation: Vec3,
    moved: bool,
}

impl Camera {
    /// Camera at `position` looking down +Z.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            moved: false,
        }
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotation as (pitch, yaw, roll) radians.
    #[must_use]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Move in world space.
    pub fn translate(&mut self, translation: Vec3) {
        if translation != Vec3::ZERO {
            self.position += translation;
            self.moved = true;
        }
    }

    /// Move relative to the current yaw: x/z slide in the view plane,
    /// y moves straight up/down regardless of pitch.
    pub fn move_relative(&mut self, direction: Vec3) {
        if direction == Vec3::ZERO {
            return;
        }
        let (sin_yaw, cos_yaw) = self.rotation.y.sin_cos();
        let planar = Vec3::new(
            direction.x * cos_yaw + direction.z * sin_yaw,
            0.0,
            -direction.x * sin_yaw + direction.z * cos_yaw,
        );
        self.position += planar + Vec3::new(0.0, direction.y, 0.0);
        self.moved = true;
    }

    /// Apply a rotation delta; pitch is clamped to avoid flipping over.
    pub fn rotate(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.rotation += delta;
        self.rotation.x = self.rotation.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.moved = true;
    }

    /// Whether the camera changed since the last call; clears the flag.
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_clamps() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.rotate(Vec3::new(10.0, 0.0, 0.0));
        assert!((cam.rotation().x - PITCH_LIMIT).abs() < 1e-6);
        cam.rotate(Vec3::new(-20.0, 0.0, 0.0));
        assert!((cam.rotation().x + PITCH_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.rotate(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        cam.move_relative(Vec3::new(0.0, 0.0, 1.0));
        let pos = cam.position();
        assert!((pos.x - 1.0).abs() < 1e-5);
        assert!(pos.z.abs() < 1e-5);
    }

    #[test]
    fn vertical_movement_ignores_rotation() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.rotate(Vec3::new(0.5, 1.0, 0.0));
        cam.move_relative(Vec3::new(0.0, 2.0, 0.0));
        assert!((cam.position().y - 2.0).abs() < 1e-6);
        assert!(cam.position().x.abs() < 1e-6);
        assert!(cam.position().z.abs() < 1e-6);
    }

    #[test]
    fn take_moved_clears_flag() {
        let mut cam = Camera::new(Vec3::ZERO);
        assert!(!cam.take_moved());
        cam.translate(Vec3::X);
        assert!(cam.take_moved());
        assert!(!cam.take_moved());
        cam.rotate(Vec3::ZERO);
        assert!(!cam.take_moved());
    }
}
