//! Kinematic stand-in for the player controller, steered relative to the camera

use glam::{Vec2, Vec3};
use serde::Deserialize;
use vantage_camera::{CameraReferenceFrame, PlayerPoseSource};
use vantage_core::types::look_rotation;
use vantage_core::Pose;

/// Walker movement tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Walking speed in meters per second
    pub walk_speed: f32,
    /// How fast the walker reaches walking speed
    pub acceleration: f32,
    /// How fast the walker stops
    pub deceleration: f32,
    /// Exponential turn rate toward the movement direction (1/s)
    pub turn_rate: f32,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            acceleration: 30.0,
            deceleration: 20.0,
            turn_rate: 12.0,
        }
    }
}

/// Moves the player on the ground plane from stick input
pub struct Walker {
    pub config: WalkerConfig,
    pose: Pose,
    velocity: Vec3,
}

impl Walker {
    pub fn new(config: WalkerConfig, start: Vec3) -> Self {
        Self {
            config,
            pose: Pose::from_position(start),
            velocity: Vec3::ZERO,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Advance one frame. Input is mapped through the camera that was
    /// rendered last frame, so pushing forward walks away from the camera.
    pub fn step(&mut self, frame: &CameraReferenceFrame, input: Vec2, dt: f32) {
        let strength = input.length().min(1.0);
        let direction = frame.move_direction(input);

        let (target, rate) = if direction == Vec3::ZERO {
            (Vec3::ZERO, self.config.deceleration)
        } else {
            (direction * self.config.walk_speed * strength, self.config.acceleration)
        };
        self.velocity = move_towards(self.velocity, target, rate * dt);
        self.pose.position += self.velocity * dt;

        if direction != Vec3::ZERO {
            if let Some(facing) = look_rotation(direction) {
                let k = 1.0 - (-self.config.turn_rate * dt).exp();
                self.pose.rotation = self.pose.rotation.slerp(facing, k);
            }
        }
    }
}

impl PlayerPoseSource for Walker {
    fn player_pose(&self) -> Option<Pose> {
        Some(self.pose)
    }
}

/// Move a vector towards a target by a maximum delta
fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let diff = target - current;
    let distance = diff.length();

    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + diff / distance * max_delta
    }
}
