//! Vantage Physics - Scene geometry using rapier3d
//!
//! Provides static level geometry, trigger volumes, and the ray/sphere casts
//! the camera uses to keep its line of sight to the player clear.

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::parry::shape::Ball;
use rapier3d::prelude::*;
use vantage_core::{CollisionMask, SceneHit, SceneQuery, SurfaceId};

/// Static scene geometry and the query pipeline used by the camera
pub struct PhysicsWorld {
    /// Rigid body storage (static geometry has no bodies, but queries need the set)
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,

    /// Island manager, required for collider removal
    island_manager: IslandManager,
    /// Query pipeline for raycasts and shape casts
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Refresh the query pipeline after colliders were added or removed
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Remove a collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set
            .remove(handle, &mut self.island_manager, &mut self.rigid_body_set, true);
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider belonging to every collision group
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        self.create_static_box_in(half_extents, position, CollisionMask::ALL)
    }

    /// Create a static box collider belonging to the groups in `membership`
    pub fn create_static_box_in(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        membership: CollisionMask,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(membership.0),
                Group::ALL,
            ))
            .build();
        self.add_static_collider(collider)
    }

    /// Create a trigger box. Sensors never block camera queries.
    pub fn create_sensor_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .sensor(true)
            .build();
        self.add_static_collider(collider)
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, f32)> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(&self.rigid_body_set, &self.collider_set, &ray, max_distance, true, filter)
    }

    /// Sweep a sphere along a unit direction and return the first hit and
    /// the distance travelled before contact.
    ///
    /// Geometry the sphere already overlaps at `origin` only counts if the
    /// sweep moves further into it.
    pub fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, f32)> {
        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(origin.x, origin.y, origin.z);
        let shape_vel = vector![direction.x, direction.y, direction.z];
        let mut options = ShapeCastOptions::with_max_time_of_impact(max_distance);
        options.stop_at_penetration = false;

        self.query_pipeline
            .cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape_vel,
                &shape,
                options,
                filter,
            )
            .map(|(handle, hit)| (handle, hit.time_of_impact))
    }

    /// Trigger volumes containing `point`
    pub fn sensors_containing(&self, position: Vec3) -> Vec<ColliderHandle> {
        let filter = QueryFilter {
            flags: QueryFilterFlags::EXCLUDE_SOLIDS,
            ..QueryFilter::default()
        };

        let mut found = Vec::new();
        self.query_pipeline.intersections_with_point(
            &self.rigid_body_set,
            &self.collider_set,
            &point![position.x, position.y, position.z],
            filter,
            |handle| {
                found.push(handle);
                true
            },
        );
        found
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Query filter hitting solid geometry in the groups selected by `mask`
pub fn camera_filter(mask: CollisionMask) -> QueryFilter<'static> {
    QueryFilter::new().exclude_sensors().groups(InteractionGroups::new(
        Group::ALL,
        Group::from_bits_truncate(mask.0),
    ))
}

/// Stable surface identifier for a collider handle
pub fn surface_id(handle: ColliderHandle) -> SurfaceId {
    let (index, generation) = handle.into_raw_parts();
    SurfaceId(((generation as u64) << 32) | index as u64)
}

impl SceneQuery for PhysicsWorld {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<SceneHit> {
        let filter = camera_filter(mask);
        PhysicsWorld::sphere_cast(self, origin, radius, direction, max_distance, filter).map(
            |(handle, distance)| SceneHit {
                distance,
                surface: surface_id(handle),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_world() -> (PhysicsWorld, ColliderHandle) {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let wall = world.create_static_box(Vec3::new(2.0, 2.0, 0.5), Vec3::new(0.0, 2.0, -5.0));
        world.update_query_pipeline();
        (world, wall)
    }

    #[test]
    fn test_ground_creation() {
        let mut world = PhysicsWorld::new();
        let ground = world.create_ground(0.0);
        assert!(world.get_collider(ground).is_some());
    }

    #[test]
    fn test_raycast() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world.update_query_pipeline();

        let hit = world.raycast(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            100.0,
            QueryFilter::default(),
        );
        assert!(hit.is_some());
    }

    #[test]
    fn test_sphere_cast_hits_wall() {
        let (world, wall) = wall_world();
        let (handle, distance) = world
            .sphere_cast(Vec3::new(0.0, 1.5, 0.0), 0.15, -Vec3::Z, 10.0, QueryFilter::default())
            .expect("wall should block the sweep");
        assert_eq!(handle, wall);
        // Front face at z = -4.5, minus the sphere radius
        assert!((distance - 4.35).abs() < 1e-3);
    }

    #[test]
    fn test_sphere_cast_respects_max_distance() {
        let (world, _) = wall_world();
        let origin = Vec3::new(0.0, 1.5, 0.0);
        let hit = world.sphere_cast(origin, 0.15, -Vec3::Z, 3.0, QueryFilter::default());
        assert!(hit.is_none());
    }

    #[test]
    fn test_scene_query_mask_filters_groups() {
        let mut world = PhysicsWorld::new();
        world.create_static_box_in(
            Vec3::new(2.0, 2.0, 0.5),
            Vec3::new(0.0, 2.0, -5.0),
            CollisionMask::group(2),
        );
        world.update_query_pipeline();

        let origin = Vec3::new(0.0, 1.5, 0.0);
        let cast = |mask| SceneQuery::sphere_cast(&world, origin, 0.15, -Vec3::Z, 10.0, mask);
        assert!(cast(CollisionMask::group(2)).is_some());
        assert!(cast(CollisionMask::group(0)).is_none());
    }

    #[test]
    fn test_sphere_cast_leaving_overlapped_geometry_is_clear() {
        let mut world = PhysicsWorld::new();
        // Thin wall right behind the origin, already touching the sphere
        world.create_static_box(Vec3::new(3.0, 3.0, 0.05), Vec3::new(0.0, 1.5, -0.15));
        world.update_query_pipeline();

        let origin = Vec3::new(0.0, 1.5, 0.0);
        let away = SceneQuery::sphere_cast(&world, origin, 0.15, Vec3::Z, 6.0, CollisionMask::ALL);
        assert!(away.is_none());
    }

    #[test]
    fn test_scene_query_ignores_sensors() {
        let mut world = PhysicsWorld::new();
        world.create_sensor_box(Vec3::splat(1.0), Vec3::new(0.0, 1.5, -3.0));
        world.update_query_pipeline();

        let hit = SceneQuery::sphere_cast(
            &world,
            Vec3::new(0.0, 1.5, 0.0),
            0.15,
            -Vec3::Z,
            10.0,
            CollisionMask::ALL,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_removed_collider_no_longer_blocks() {
        let (mut world, wall) = wall_world();
        world.remove_collider(wall);
        world.update_query_pipeline();
        let hit = SceneQuery::sphere_cast(
            &world,
            Vec3::new(0.0, 1.5, 0.0),
            0.15,
            -Vec3::Z,
            10.0,
            CollisionMask::ALL,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_sensors_containing_point() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let hall = world.create_sensor_box(Vec3::new(3.0, 2.0, 3.0), Vec3::new(0.0, 2.0, 0.0));
        let annex = world.create_sensor_box(Vec3::new(2.0, 2.0, 2.0), Vec3::new(4.0, 2.0, 0.0));
        world.update_query_pipeline();

        assert_eq!(world.sensors_containing(Vec3::new(0.0, 0.5, 0.0)), vec![hall]);

        let mut overlap = world.sensors_containing(Vec3::new(2.5, 0.5, 0.0));
        overlap.sort_by_key(|h| h.into_raw_parts());
        let mut expected = vec![hall, annex];
        expected.sort_by_key(|h| h.into_raw_parts());
        assert_eq!(overlap, expected);

        // Solid ground is never reported
        assert!(world.sensors_containing(Vec3::new(20.0, -1.0, 0.0)).is_empty());
    }
}
