//! Turns trigger-volume overlap into zone occupancy events

use std::collections::HashMap;

use glam::Vec3;
use rapier3d::prelude::ColliderHandle;
use vantage_camera::{OccupancyEvent, ZoneId};
use vantage_core::EntityId;
use vantage_physics::PhysicsWorld;

/// Tracks which camera zone volumes an actor stands in
#[derive(Default)]
pub struct OccupancyTracker {
    volumes: HashMap<ColliderHandle, ZoneId>,
    /// Zones currently occupied, in the order they were entered
    inside: Vec<ZoneId>,
}

impl OccupancyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a sensor collider to the zone it triggers
    pub fn add_volume(&mut self, sensor: ColliderHandle, zone: ZoneId) {
        self.volumes.insert(sensor, zone);
    }

    pub fn inside(&self) -> &[ZoneId] {
        &self.inside
    }

    /// Compare the actor's current overlaps with last frame's and report
    /// the difference as events
    pub fn update(
        &mut self,
        world: &PhysicsWorld,
        position: Vec3,
        instigator: EntityId,
    ) -> Vec<OccupancyEvent> {
        let mut current: Vec<ZoneId> = world
            .sensors_containing(position)
            .into_iter()
            .filter_map(|handle| self.volumes.get(&handle).copied())
            .collect();
        current.dedup();

        let mut events = Vec::new();
        self.inside.retain(|zone| {
            let still_inside = current.contains(zone);
            if !still_inside {
                events.push(OccupancyEvent::Exited {
                    zone: *zone,
                    instigator,
                });
            }
            still_inside
        });

        for zone in current {
            if !self.inside.contains(&zone) {
                self.inside.push(zone);
                events.push(OccupancyEvent::Entered { zone, instigator });
            }
        }

        events
    }
}
