//! Camera anchors: artist-placed shots that zones make eligible

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use vantage_core::{CollisionMask, Handle, Pose};

/// Handle to an anchor stored in a [`crate::CameraScene`]
pub type AnchorId = Handle<Anchor>;

/// Narrowest field of view an anchor may declare, in degrees
pub const MIN_FIELD_OF_VIEW: f32 = 20.0;
/// Widest field of view an anchor may declare, in degrees
pub const MAX_FIELD_OF_VIEW: f32 = 90.0;

/// A named camera shot: pose, field of view, priority, and blend timing.
///
/// Anchors are fixed once the scene is loaded; only the enabled flag changes
/// at runtime (through the owning scene).
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    name: String,
    pose: Pose,
    field_of_view: f32,
    priority: i32,
    blend_duration: f32,
    follows_player_yaw: bool,
    local_follow_offset: Vec3,
    enforce_line_of_sight: bool,
    collision_mask: CollisionMask,
    pub(crate) enabled: bool,
}

impl Anchor {
    /// Create an anchor with default shot settings
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            pose,
            field_of_view: 55.0,
            priority: 0,
            blend_duration: 0.35,
            follows_player_yaw: false,
            local_follow_offset: Vec3::ZERO,
            enforce_line_of_sight: true,
            collision_mask: CollisionMask::ALL,
            enabled: true,
        }
    }

    /// Set the field of view, clamped to the supported range
    pub fn with_field_of_view(mut self, degrees: f32) -> Self {
        self.field_of_view = degrees.clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the blend-in time. Zero or negative means "use the configured default".
    pub fn with_blend_duration(mut self, seconds: f32) -> Self {
        self.blend_duration = seconds.max(0.0);
        self
    }

    /// Follow the player's heading, keeping `offset` rotated by it
    pub fn following_player_yaw(mut self, offset: Vec3) -> Self {
        self.follows_player_yaw = true;
        self.local_follow_offset = offset;
        self
    }

    pub fn with_line_of_sight(mut self, enforce: bool) -> Self {
        self.enforce_line_of_sight = enforce;
        self
    }

    pub fn with_collision_mask(mut self, mask: CollisionMask) -> Self {
        self.collision_mask = mask;
        self
    }

    /// Start out disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Requested blend-in time in seconds (0 = use the configured default)
    pub fn blend_duration(&self) -> f32 {
        self.blend_duration
    }

    pub fn follows_player_yaw(&self) -> bool {
        self.follows_player_yaw
    }

    pub fn local_follow_offset(&self) -> Vec3 {
        self.local_follow_offset
    }

    pub fn enforce_line_of_sight(&self) -> bool {
        self.enforce_line_of_sight
    }

    pub fn collision_mask(&self) -> CollisionMask {
        self.collision_mask
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Evaluate the shot pose for the current player pose.
    ///
    /// Yaw-following anchors shift by their offset rotated into the player's
    /// heading; rotation always stays the anchor's own.
    pub fn evaluate_pose(&self, player: Option<&Pose>) -> Pose {
        match player {
            Some(player) if self.follows_player_yaw => Pose {
                position: self.pose.position + player.yaw_rotation() * self.local_follow_offset,
                rotation: self.pose.rotation,
            },
            _ => self.pose,
        }
    }
}

fn default_field_of_view() -> f32 {
    55.0
}

fn default_blend_seconds() -> f32 {
    0.35
}

fn default_true() -> bool {
    true
}

/// Serialized form of an anchor inside a scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorDescription {
    pub name: String,
    pub position: Vec3,
    /// Point the shot faces; overrides `yaw_degrees`/`pitch_degrees`
    #[serde(default)]
    pub look_at: Option<Vec3>,
    #[serde(default)]
    pub yaw_degrees: f32,
    #[serde(default)]
    pub pitch_degrees: f32,
    #[serde(default = "default_field_of_view")]
    pub field_of_view: f32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_blend_seconds")]
    pub blend_seconds: f32,
    #[serde(default)]
    pub follow_player_yaw: bool,
    #[serde(default)]
    pub follow_offset: Vec3,
    #[serde(default = "default_true")]
    pub line_of_sight: bool,
    #[serde(default)]
    pub collision_mask: CollisionMask,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl AnchorDescription {
    /// Build the runtime anchor
    pub fn to_anchor(&self) -> Anchor {
        let pose = match self.look_at {
            Some(target) => Pose::looking_at(self.position, target),
            None => Pose::new(
                self.position,
                Quat::from_euler(
                    EulerRot::YXZ,
                    self.yaw_degrees.to_radians(),
                    self.pitch_degrees.to_radians(),
                    0.0,
                ),
            ),
        };

        let mut anchor = Anchor::new(self.name.clone(), pose)
            .with_field_of_view(self.field_of_view)
            .with_priority(self.priority)
            .with_blend_duration(self.blend_seconds)
            .with_line_of_sight(self.line_of_sight)
            .with_collision_mask(self.collision_mask);
        if self.follow_player_yaw {
            anchor = anchor.following_player_yaw(self.follow_offset);
        }
        anchor.enabled = self.enabled;
        anchor
    }
}
