//! Core types used throughout Vantage

use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for actors that can occupy camera zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Bit mask selecting which scene geometry a query may hit.
///
/// Bit `n` corresponds to collision group `n` in the physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    pub const ALL: CollisionMask = CollisionMask(u32::MAX);
    pub const NONE: CollisionMask = CollisionMask(0);

    /// Mask containing a single group bit. Indices past 31 give an empty mask.
    pub const fn group(index: u32) -> Self {
        match 1u32.checked_shl(index) {
            Some(bit) => Self(bit),
            None => Self::NONE,
        }
    }

    /// Whether the two masks share at least one group
    pub fn intersects(self, other: CollisionMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Position and orientation in world space.
///
/// Forward is -Z and up is +Y in local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Create a new pose
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create a pose at the given position with identity rotation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a pose at `position` facing `target`.
    ///
    /// Falls back to identity rotation when the two points coincide.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let rotation = look_rotation(target - position).unwrap_or(Quat::IDENTITY);
        Self { position, rotation }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotation about world up matching this pose's heading
    pub fn yaw_rotation(&self) -> Quat {
        yaw_of(self.rotation)
    }

    /// Interpolate between two poses (shortest-arc slerp for rotation)
    pub fn lerp(a: &Pose, b: &Pose, t: f32) -> Pose {
        Pose {
            position: a.position.lerp(b.position, t),
            rotation: a.rotation.slerp(b.rotation, t),
        }
    }
}

/// Rotation whose forward (-Z) axis points along `direction`, with +Y as up.
///
/// Returns `None` for a zero-length direction. Looking straight up or down
/// uses world -Z as the reference up axis instead.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize()?;
    let reference_up = if forward.cross(Vec3::Y).length_squared() < 1e-6 {
        -Vec3::Z
    } else {
        Vec3::Y
    };

    let right = forward.cross(reference_up).normalize();
    let up = right.cross(forward);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize())
}

/// Heading component of a rotation, as a rotation about world up
pub fn yaw_of(rotation: Quat) -> Quat {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    Quat::from_rotation_y(yaw)
}
