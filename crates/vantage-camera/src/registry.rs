//! The set of camera zones the player currently occupies

use tracing::debug;

use crate::scene::CameraScene;
use crate::zone::ZoneId;

/// A registered zone and when it joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub zone: ZoneId,
    /// Monotonic registration stamp; higher means registered later
    pub sequence: u64,
}

/// Zones reported as occupied, kept in registration order.
///
/// Membership only changes through [`register`](Self::register),
/// [`unregister`](Self::unregister) and [`prune`](Self::prune); resolution
/// never mutates it.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    members: Vec<Membership>,
    next_sequence: u64,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone. No-op for stale handles or zones already present.
    /// Returns whether membership changed.
    pub fn register(&mut self, scene: &CameraScene, zone: ZoneId) -> bool {
        if scene.zone(zone).is_none() || self.contains(zone) {
            return false;
        }
        self.members.push(Membership {
            zone,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
        true
    }

    /// Remove a zone. No-op if absent. Returns whether membership changed.
    pub fn unregister(&mut self, zone: ZoneId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member.zone != zone);
        self.members.len() != before
    }

    /// Drop members that were destroyed or deactivated, returning them.
    ///
    /// Covers zones disabled without an exit event ever being delivered.
    pub fn prune(&mut self, scene: &CameraScene) -> Vec<ZoneId> {
        let mut removed = Vec::new();
        self.members.retain(|member| {
            let live = scene.is_zone_live(member.zone);
            if !live {
                removed.push(member.zone);
            }
            live
        });

        if !removed.is_empty() {
            debug!("Pruned {} stale camera zone(s)", removed.len());
        }
        removed
    }

    pub fn contains(&self, zone: ZoneId) -> bool {
        self.members.iter().any(|member| member.zone == zone)
    }

    /// Members in registration order (oldest first)
    pub fn members(&self) -> &[Membership] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
