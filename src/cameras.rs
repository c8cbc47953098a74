//! Cameras and configs for cameras
use nalgebra::{Rotation3, Unit};
use serde::{Deserialize, Serialize};

use crate::utils::SerdeVector;
use crate::{Point, Vec3};

/// Closest the camera may be moved toward its target
const MIN_TARGET_DISTANCE: f64 = 1e-3;
/// Keeps the view direction this far (radians) away from the up vector when pitching
const MIN_PITCH_ANGLE: f64 = 1e-2;

/// Camera Config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: SerdeVector,
    pub target: SerdeVector,
    pub up: SerdeVector,
    /// Degrees turned per unit of `rotate` input
    pub rotation_speed: f64,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: SerdeVector([0.0, 0.0, 5.0]),
            target: SerdeVector([0.0, 0.0, 0.0]),
            up: SerdeVector([0.0, 1.0, 0.0]),
            rotation_speed: 10.0,
        }
    }
}

/// Orthonormal frame derived from the camera's current state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Look-at camera
///
/// Only `move_by` and `rotate` mutate it; rendering reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point,
    pub target: Point,
    pub up: Vec3,
    pub rotation_speed: f64,
}
impl Camera {
    pub fn new(position: Point, target: Point, up: Vec3, rotation_speed: f64) -> Self {
        Self {
            position,
            target,
            up,
            rotation_speed,
        }
    }

    pub fn from_config(config: CameraConfig) -> Self {
        Self::new(
            config.position.into(),
            config.target.into(),
            config.up.into(),
            config.rotation_speed,
        )
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Recompute the viewing frame from position, target and up
    pub fn basis(&self) -> CameraBasis {
        let forward = self.forward();
        let right = forward.cross(&self.up).normalize();
        let up = right.cross(&forward).normalize();
        CameraBasis { forward, right, up }
    }

    /// Move along the view direction; negative amounts back away from the target
    ///
    /// A move that would reach or pass the target is ignored.
    pub fn move_by(&mut self, amount: f64) {
        let distance = (self.target - self.position).norm();
        if amount >= distance - MIN_TARGET_DISTANCE {
            log::debug!("ignoring camera move of {amount}: target is {distance} away");
            return;
        }
        self.position += self.forward() * amount;
    }

    /// Orbit around the target
    ///
    /// Deltas are scaled by `rotation_speed` degrees. Horizontal turns about the up vector,
    /// vertical about the camera's right vector. A pitch that would line the view up with
    /// the up vector is dropped.
    pub fn rotate(&mut self, horizontal_delta: f64, vertical_delta: f64) {
        let up_axis = Unit::new_normalize(self.up);
        let yaw = Rotation3::from_axis_angle(
            &up_axis,
            -(horizontal_delta * self.rotation_speed).to_radians(),
        );
        let mut offset = yaw * (self.position - self.target);

        if vertical_delta != 0.0 {
            let right = Unit::new_normalize((-offset).cross(&self.up));
            let pitch = Rotation3::from_axis_angle(
                &right,
                (vertical_delta * self.rotation_speed).to_radians(),
            );
            let pitched = pitch * offset;
            let angle = (-pitched).angle(&self.up);
            if angle > MIN_PITCH_ANGLE && angle < std::f64::consts::PI - MIN_PITCH_ANGLE {
                offset = pitched;
            } else {
                log::debug!("ignoring camera pitch of {vertical_delta}: view would align with up");
            }
        }

        self.position = self.target + offset;
    }

    /// Unit direction of the primary ray through pixel `(x, y)` of a `width` x `height` image
    ///
    /// `fov` is in radians. Pixel centers are used; row 0 is the top of the image.
    pub fn ray_direction(&self, x: u32, y: u32, width: u32, height: u32, fov: f64) -> Vec3 {
        let screen_x = (2.0 * (x as f64 + 0.5)) / width as f64 - 1.0;
        let screen_y = -(2.0 * (y as f64 + 0.5)) / height as f64 + 1.0;
        let aspect_ratio = width as f64 / height as f64;
        self.screen_direction(screen_x * aspect_ratio, screen_y, fov)
    }

    /// Direction for aspect-corrected screen coordinates in `[-1, 1]`
    pub fn screen_direction(&self, screen_x: f64, screen_y: f64, fov: f64) -> Vec3 {
        let scale = (fov / 2.0).tan();
        let basis = self.basis();
        (basis.forward + basis.right * screen_x * scale + basis.up * screen_y * scale).normalize()
    }
}
impl Default for Camera {
    fn default() -> Self {
        Self::from_config(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FOV: f64 = std::f64::consts::FRAC_PI_3;

    #[test]
    fn center_pixel_looks_forward() {
        let camera = Camera::new(
            Point::new(1.0, 2.0, 3.0),
            Point::new(-2.0, 0.5, -4.0),
            Vec3::y(),
            10.0,
        );
        let dir = camera.ray_direction(2, 1, 5, 3, FOV);
        assert_relative_eq!(dir, camera.forward(), epsilon = 1e-12);
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = Camera::new(Point::new(3.0, 4.0, 5.0), Point::zeros(), Vec3::y(), 10.0);
        let b = camera.basis();
        for v in [b.forward, b.right, b.up] {
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(b.forward.dot(&b.right), 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.forward.dot(&b.up), 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.right.dot(&b.up), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn top_left_pixel_points_up_and_left() {
        let camera = Camera::default();
        let dir = camera.ray_direction(0, 0, 800, 600, FOV);
        let b = camera.basis();
        assert!(dir.dot(&b.right) < 0.0);
        assert!(dir.dot(&b.up) > 0.0);
        assert_relative_eq!(dir.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn aspect_ratio_only_stretches_horizontally() {
        let camera = Camera::default();
        // Right edge of a 2:1 image versus bottom edge
        let right_edge = camera.screen_direction(2.0, 0.0, FOV);
        let expected_x = 2.0 * (FOV / 2.0).tan();
        assert_relative_eq!(right_edge.x / -right_edge.z, expected_x, epsilon = 1e-12);
        let bottom = camera.screen_direction(0.0, -1.0, FOV);
        assert_relative_eq!(bottom.y / -bottom.z, -(FOV / 2.0).tan(), epsilon = 1e-12);
    }

    #[test]
    fn move_by_approaches_target() {
        let mut camera = Camera::default();
        camera.move_by(1.0);
        assert_relative_eq!(camera.position, Point::new(0.0, 0.0, 4.0), epsilon = 1e-12);
        camera.move_by(-2.0);
        assert_relative_eq!(camera.position, Point::new(0.0, 0.0, 6.0), epsilon = 1e-12);
    }

    #[test]
    fn move_by_never_reaches_target() {
        let mut camera = Camera::default();
        camera.move_by(5.0);
        assert_eq!(camera.position, Point::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn horizontal_rotation_orbits_at_constant_distance() {
        let mut camera = Camera::new(Point::new(0.0, 0.0, 5.0), Point::zeros(), Vec3::y(), 90.0);
        camera.rotate(1.0, 0.0);
        assert_relative_eq!(camera.position.norm(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(camera.position.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(camera.position.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(camera.position.x.abs(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn vertical_rotation_raises_camera() {
        let mut camera = Camera::new(Point::new(0.0, 0.0, 5.0), Point::zeros(), Vec3::y(), 10.0);
        camera.rotate(0.0, 1.0);
        assert_relative_eq!(camera.position.norm(), 5.0, epsilon = 1e-9);
        assert!(camera.position.y.abs() > 0.1);
    }

    #[test]
    fn pitch_stops_short_of_up_vector() {
        let mut camera = Camera::new(Point::new(0.0, 0.0, 5.0), Point::zeros(), Vec3::y(), 90.0);
        camera.rotate(0.0, 1.0);
        // A full quarter turn would look straight along up; it is refused
        assert_eq!(camera.position, Point::new(0.0, 0.0, 5.0));
        assert!(camera.basis().right.iter().all(|c| c.is_finite()));
    }
}
