//! Camera zones: regions that make a set of anchors eligible while occupied

use vantage_core::{Arena, Handle};

use crate::anchor::{Anchor, AnchorId};

/// Handle to a zone stored in a [`crate::CameraScene`]
pub type ZoneId = Handle<Zone>;

/// A camera zone. Owns references to its anchors, never the player.
#[derive(Debug, Clone)]
pub struct Zone {
    name: String,
    /// Anchors in registration order
    anchors: Vec<AnchorId>,
    pub(crate) active: bool,
    pub(crate) discovered: bool,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anchors: Vec::new(),
            active: true,
            discovered: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Anchor handles in registration order (may include removed anchors)
    pub fn anchors(&self) -> &[AnchorId] {
        &self.anchors
    }

    /// Whether the zone's volume is live
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Add an anchor; returns `false` if it was already attached
    pub(crate) fn attach(&mut self, anchor: AnchorId) -> bool {
        if self.anchors.contains(&anchor) {
            return false;
        }
        self.anchors.push(anchor);
        true
    }

    /// Pick this zone's shot: the enabled anchor with the greatest priority.
    ///
    /// Equal priorities go to the most recently registered anchor. Computed on
    /// demand since enable state can change between frames.
    pub fn best_anchor(&self, anchors: &Arena<Anchor>) -> Option<AnchorId> {
        let mut best: Option<(AnchorId, i32)> = None;

        for &id in &self.anchors {
            let Some(anchor) = anchors.get(id) else {
                continue;
            };
            if !anchor.is_enabled() {
                continue;
            }
            if best.map_or(true, |(_, priority)| anchor.priority() >= priority) {
                best = Some((id, anchor.priority()));
            }
        }

        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_core::Pose;

    fn anchor(name: &str, priority: i32) -> Anchor {
        Anchor::new(name, Pose::default()).with_priority(priority)
    }

    #[test]
    fn test_highest_priority_wins() {
        let mut anchors = Arena::new();
        let low = anchors.insert(anchor("low", 1));
        let high = anchors.insert(anchor("high", 7));
        let mid = anchors.insert(anchor("mid", 3));

        let mut zone = Zone::new("hall");
        zone.attach(low);
        zone.attach(high);
        zone.attach(mid);

        assert_eq!(zone.best_anchor(&anchors), Some(high));
    }

    #[test]
    fn test_tie_goes_to_latest_registered() {
        let mut anchors = Arena::new();
        let first = anchors.insert(anchor("first", 2));
        let second = anchors.insert(anchor("second", 2));

        let mut zone = Zone::new("hall");
        zone.attach(second);
        zone.attach(first);

        // Registration order, not arena order, decides the tie
        assert_eq!(zone.best_anchor(&anchors), Some(first));
    }

    #[test]
    fn test_disabled_and_removed_anchors_skipped() {
        let mut anchors = Arena::new();
        let removed = anchors.insert(anchor("removed", 9));
        let disabled = anchors.insert(anchor("disabled", 8).disabled());
        let live = anchors.insert(anchor("live", 0));
        anchors.remove(removed);

        let mut zone = Zone::new("hall");
        zone.attach(removed);
        zone.attach(disabled);
        zone.attach(live);

        assert_eq!(zone.best_anchor(&anchors), Some(live));
    }

    #[test]
    fn test_no_enabled_anchor() {
        let mut anchors = Arena::new();
        let disabled = anchors.insert(anchor("disabled", 0).disabled());
        let mut zone = Zone::new("empty");
        assert_eq!(zone.best_anchor(&anchors), None);
        zone.attach(disabled);
        assert_eq!(zone.best_anchor(&anchors), None);
    }

    #[test]
    fn test_attach_is_deduplicated() {
        let mut anchors = Arena::new();
        let a = anchors.insert(anchor("a", 0));
        let mut zone = Zone::new("hall");
        assert!(zone.attach(a));
        assert!(!zone.attach(a));
        assert_eq!(zone.anchors().len(), 1);
    }
}
