//! Keeps the camera on the player's side of scene geometry

use glam::Vec3;
use vantage_core::{CollisionMask, SceneQuery};

use crate::config::CollisionConfig;

/// Pulls a desired camera position in along the focus-to-camera ray when
/// geometry blocks it. Holds no state across frames.
#[derive(Debug, Clone, Default)]
pub struct CollisionSafety {
    pub config: CollisionConfig,
}

impl CollisionSafety {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    /// Point near the player's eyes/chest that the camera must be able to see
    pub fn focus_point(&self, player_position: Vec3) -> Vec3 {
        player_position + Vec3::Y * self.config.focus_height
    }

    /// Return `desired`, or a position just short of the first obstruction
    /// between `focus` and `desired`.
    ///
    /// The result never lies beyond the hit point. It stays at least
    /// `min_distance` from the focus point unless the obstruction itself is
    /// within that distance, in which case the camera settles halfway to it.
    pub fn resolve(
        &self,
        query: &dyn SceneQuery,
        focus: Vec3,
        desired: Vec3,
        mask: CollisionMask,
    ) -> Vec3 {
        let offset = desired - focus;
        let distance = offset.length();

        if distance < self.config.min_check_distance {
            return desired;
        }

        let direction = offset / distance;
        let radius = self.config.probe_radius;
        let Some(hit) = query.sphere_cast(focus, radius, direction, distance, mask) else {
            return desired;
        };

        if hit.distance >= distance {
            return desired;
        }

        let safe_distance = if hit.distance > self.config.min_distance {
            (hit.distance - self.config.margin).max(self.config.min_distance)
        } else {
            hit.distance * 0.5
        };
        focus + direction * safe_distance
    }
}

#[cfg(test)]
mod tests {
    use vantage_core::{OpenScene, SceneHit, SurfaceId};
    use vantage_physics::PhysicsWorld;

    use super::*;

    /// An infinite wall facing the focus point at a fixed distance
    struct WallAt(f32);

    impl SceneQuery for WallAt {
        fn sphere_cast(
            &self,
            _origin: Vec3,
            _radius: f32,
            _direction: Vec3,
            max_distance: f32,
            mask: CollisionMask,
        ) -> Option<SceneHit> {
            let blocks = mask.intersects(CollisionMask::group(0)) && self.0 <= max_distance;
            blocks.then_some(SceneHit {
                distance: self.0,
                surface: SurfaceId(1),
            })
        }
    }

    fn safety() -> CollisionSafety {
        CollisionSafety::default()
    }

    #[test]
    fn test_unobstructed_returns_desired() {
        let desired = Vec3::new(0.0, 4.0, 6.0);
        let focus = Vec3::new(0.0, 1.5, 0.0);
        let result = safety().resolve(&OpenScene, focus, desired, CollisionMask::ALL);
        assert_eq!(result, desired);
    }

    #[test]
    fn test_obstruction_pulls_in_short_of_hit() {
        let focus = Vec3::new(0.0, 1.5, 0.0);
        let desired = Vec3::new(0.0, 1.5, 8.0);
        let result = safety().resolve(&WallAt(5.0), focus, desired, CollisionMask::ALL);

        let travelled = (result - focus).length();
        assert!((travelled - 4.95).abs() < 1e-4);
        // Stays on the focus-to-desired ray
        assert!((result - focus).normalize().abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_result_never_beyond_hit() {
        let focus = Vec3::ZERO;
        let desired = Vec3::new(10.0, 0.0, 0.0);
        for hit in [0.05_f32, 0.3, 0.5, 0.55, 1.0, 3.0, 9.9] {
            let result = safety().resolve(&WallAt(hit), focus, desired, CollisionMask::ALL);
            let travelled = (result - focus).length();
            assert!(travelled < hit, "hit {hit}: travelled {travelled}");
            assert!(travelled > 0.0);
        }
    }

    #[test]
    fn test_min_distance_floor() {
        let focus = Vec3::ZERO;
        let desired = Vec3::new(0.0, 0.0, 10.0);
        // Hit at 0.52: margin would leave 0.47, floor keeps 0.5
        let result = safety().resolve(&WallAt(0.52), focus, desired, CollisionMask::ALL);
        assert!(((result - focus).length() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_coincident_points_unchanged() {
        let focus = Vec3::new(1.0, 1.5, 1.0);
        let desired = focus + Vec3::splat(0.001);
        let result = safety().resolve(&WallAt(0.0), focus, desired, CollisionMask::ALL);
        assert_eq!(result, desired);
    }

    #[test]
    fn test_mask_excludes_geometry() {
        let focus = Vec3::ZERO;
        let desired = Vec3::new(0.0, 0.0, 8.0);
        let result = safety().resolve(&WallAt(2.0), focus, desired, CollisionMask::group(4));
        assert_eq!(result, desired);
    }

    #[test]
    fn test_against_physics_world() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        // Wall between player and camera, front face at z = 3.0
        world.create_static_box(Vec3::new(3.0, 3.0, 0.25), Vec3::new(0.0, 3.0, 3.25));
        world.update_query_pipeline();

        let safety = safety();
        let focus = safety.focus_point(Vec3::ZERO);
        let desired = Vec3::new(0.0, 1.5, 7.0);
        let result = safety.resolve(&world, focus, desired, CollisionMask::ALL);

        // Sphere touches at 3.0 - radius; camera sits margin short of that
        let expected = 3.0 - 0.15 - 0.05;
        assert!((result.z - expected).abs() < 1e-3, "z = {}", result.z);
        assert!(result.z < 3.0);
        assert!((result.y - 1.5).abs() < 1e-4);

        // Open line of sight: untouched
        let open = Vec3::new(0.0, 1.5, -5.0);
        assert_eq!(safety.resolve(&world, focus, open, CollisionMask::ALL), open);
    }

    #[test]
    fn test_wall_behind_focus_does_not_pull_in() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        // Thin wall at the player's back, overlapping the probe at the focus
        world.create_static_box(Vec3::new(3.0, 3.0, 0.05), Vec3::new(0.0, 1.5, -0.15));
        world.update_query_pipeline();

        let safety = safety();
        let focus = safety.focus_point(Vec3::ZERO);
        let desired = Vec3::new(0.0, 2.5, 6.0);
        assert_eq!(safety.resolve(&world, focus, desired, CollisionMask::ALL), desired);
    }
}
