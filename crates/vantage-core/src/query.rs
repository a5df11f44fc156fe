//! Scene query interface consumed by collision-safe camera placement

use glam::Vec3;

use crate::types::CollisionMask;

/// Opaque identifier of the surface a query struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Result of a swept query against scene geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    /// Distance travelled along the sweep direction before contact
    pub distance: f32,
    /// The surface that was hit
    pub surface: SurfaceId,
}

/// Synchronous geometry queries against the running scene.
///
/// Implementations must ignore trigger/sensor volumes.
pub trait SceneQuery {
    /// Sweep a sphere of `radius` from `origin` along the unit vector
    /// `direction` for at most `max_distance`, hitting only geometry whose
    /// groups intersect `mask`.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<SceneHit>;
}

/// A scene with no blocking geometry; every sweep is clear
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenScene;

impl SceneQuery for OpenScene {
    fn sphere_cast(&self, _: Vec3, _: f32, _: Vec3, _: f32, _: CollisionMask) -> Option<SceneHit> {
        None
    }
}
