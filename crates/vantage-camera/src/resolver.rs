//! Picks the single winning anchor across all occupied zones

use crate::anchor::AnchorId;
use crate::registry::ZoneRegistry;
use crate::scene::CameraScene;
use crate::zone::ZoneId;

/// The winning shot and the zone that supplied it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub zone: ZoneId,
    pub anchor: AnchorId,
}

/// Priority resolution over the zone registry.
///
/// Each zone contributes at most one candidate (its best anchor). The
/// candidate with the greatest priority wins; equal priorities go to the
/// zone with the highest registration sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityResolver;

impl PriorityResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the winning anchor, or `None` when no zone yields a candidate
    pub fn resolve(&self, registry: &ZoneRegistry, scene: &CameraScene) -> Option<Resolution> {
        let mut best: Option<(Resolution, i32, u64)> = None;

        for member in registry.members() {
            if !scene.is_zone_live(member.zone) {
                continue;
            }
            let Some(anchor) = scene.best_anchor(member.zone) else {
                continue;
            };
            let Some(priority) = scene.anchor(anchor).map(|a| a.priority()) else {
                continue;
            };

            let wins = best.map_or(true, |(_, best_priority, best_sequence)| {
                (priority, member.sequence) > (best_priority, best_sequence)
            });
            if wins {
                let resolution = Resolution {
                    zone: member.zone,
                    anchor,
                };
                best = Some((resolution, priority, member.sequence));
            }
        }

        best.map(|(resolution, _, _)| resolution)
    }
}
