//! Procedural third-person camera used when no zone supplies a shot

use glam::Vec3;
use vantage_core::types::{look_rotation, yaw_of};
use vantage_core::Pose;

use crate::config::{FollowConfig, OffsetSpace};
use crate::transform::CameraTransform;

/// Fraction of the remaining gap to close this frame for a given rate.
///
/// Frame-rate independent: two steps of `dt` equal one step of `2 * dt`.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate.max(0.0) * dt.max(0.0)).exp()
}

/// Offset-and-look-at camera that trails the player
#[derive(Debug, Clone, Default)]
pub struct FollowCamera {
    pub config: FollowConfig,
}

impl FollowCamera {
    pub fn new(config: FollowConfig) -> Self {
        Self { config }
    }

    /// Where the camera would sit if fully converged
    pub fn target_position(&self, rendered: &CameraTransform, player: &Pose) -> Vec3 {
        let offset = match self.config.offset_space {
            OffsetSpace::PlayerLocal => player.yaw_rotation() * self.config.offset,
            OffsetSpace::CameraRelative => yaw_of(rendered.rotation) * self.config.offset,
            OffsetSpace::World => self.config.offset,
        };
        player.position + offset
    }

    /// Point the camera looks at (chest height)
    pub fn look_target(&self, player: &Pose) -> Vec3 {
        player.position + Vec3::Y * self.config.look_at_height
    }

    /// The fully converged transform, used to place the camera without easing
    pub fn target(&self, rendered: &CameraTransform, player: &Pose) -> CameraTransform {
        let position = self.target_position(rendered, player);
        let rotation =
            look_rotation(self.look_target(player) - position).unwrap_or(rendered.rotation);
        CameraTransform {
            position,
            rotation,
            field_of_view: self.config.field_of_view,
        }
    }

    /// Move `rendered` toward the follow target by one frame
    pub fn step(&self, rendered: &CameraTransform, player: &Pose, dt: f32) -> CameraTransform {
        let position_k = smoothing_factor(self.config.position_rate, dt);
        let rotation_k = smoothing_factor(self.config.rotation_rate, dt);

        let position = rendered
            .position
            .lerp(self.target_position(rendered, player), position_k);

        // Aim from where the camera ends up this frame
        let rotation = match look_rotation(self.look_target(player) - position) {
            Some(goal) => rendered.rotation.slerp(goal, rotation_k),
            None => rendered.rotation,
        };

        let field_of_view = rendered.field_of_view
            + (self.config.field_of_view - rendered.field_of_view) * position_k;

        CameraTransform {
            position,
            rotation,
            field_of_view,
        }
    }
}
