//! The published camera state and its movement reference frame

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use vantage_core::Pose;

/// Final camera transform handed to the renderer each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTransform {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            field_of_view: 60.0,
        }
    }
}

impl CameraTransform {
    pub fn new(pose: Pose, field_of_view: f32) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            field_of_view,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Get the camera's forward direction
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the camera's right direction
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the camera's up direction
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    /// Get a projection matrix for this field of view
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.field_of_view.to_radians(), aspect_ratio, 0.1, 1000.0)
    }

    /// Axes used to map stick input into camera-relative movement
    pub fn reference_frame(&self) -> CameraReferenceFrame {
        CameraReferenceFrame {
            forward: self.forward(),
            right: self.right(),
            up: self.up(),
        }
    }
}

/// The rendered camera's axes, consumed by camera-relative movement input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraReferenceFrame {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraReferenceFrame {
    /// Map stick input (x = right, y = forward) onto the ground plane.
    ///
    /// Pushing forward always moves away from the camera. When the camera
    /// looks straight down its up axis stands in for forward. Returns a unit
    /// vector, or zero for no input.
    pub fn move_direction(&self, input: Vec2) -> Vec3 {
        if input.length_squared() < f32::EPSILON {
            return Vec3::ZERO;
        }

        let forward = flatten(self.forward)
            .or_else(|| flatten(self.up))
            .unwrap_or(-Vec3::Z);
        let right = flatten(self.right).unwrap_or_else(|| forward.cross(Vec3::Y));

        let world = forward * input.y + right * input.x;
        world.try_normalize().unwrap_or(Vec3::ZERO)
    }
}

/// Project onto the horizontal plane and normalize
fn flatten(v: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(v.x, 0.0, v.z);
    if flat.length_squared() < 1e-6 {
        None
    } else {
        Some(flat.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_core::types::look_rotation;

    #[test]
    fn test_identity_axes() {
        let transform = CameraTransform::default();
        assert_eq!(transform.forward(), -Vec3::Z);
        assert_eq!(transform.right(), Vec3::X);
    }

    #[test]
    fn test_forward_input_moves_away_from_camera() {
        // Camera behind and above, pitched down toward the player
        let pose = Pose::looking_at(Vec3::new(0.0, 4.0, 6.0), Vec3::new(0.0, 1.0, 0.0));
        let frame = CameraTransform::new(pose, 60.0).reference_frame();

        let forward = frame.move_direction(Vec2::new(0.0, 1.0));
        assert!(forward.abs_diff_eq(-Vec3::Z, 1e-5));
        assert_eq!(forward.y, 0.0);

        let right = frame.move_direction(Vec2::new(1.0, 0.0));
        assert!(right.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_top_down_camera_uses_up_axis() {
        let rotation = look_rotation(-Vec3::Y).unwrap();
        let frame = CameraTransform {
            rotation,
            ..Default::default()
        }
        .reference_frame();

        let dir = frame.move_direction(Vec2::new(0.0, 1.0));
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert_eq!(dir.y, 0.0);
    }

    #[test]
    fn test_no_input_no_motion() {
        let frame = CameraTransform::default().reference_frame();
        assert_eq!(frame.move_direction(Vec2::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_view_matrix_maps_position_to_origin() {
        let transform = CameraTransform::new(
            Pose::looking_at(Vec3::new(3.0, 2.0, 1.0), Vec3::ZERO),
            50.0,
        );
        let origin = transform.view_matrix().transform_point3(transform.position);
        assert!(origin.length() < 1e-4);
    }
}
