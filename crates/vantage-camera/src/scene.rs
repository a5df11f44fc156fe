//! Scene-owned camera data: anchor and zone arenas plus the shared fallback shot

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use vantage_core::Arena;

use crate::anchor::{Anchor, AnchorDescription, AnchorId};
use crate::error::CameraError;
use crate::zone::{Zone, ZoneId};

/// All anchors and zones of the loaded scene.
///
/// Zones and anchors are addressed by generational handles; removing one
/// ("destroying" it) invalidates every handle that still refers to it.
#[derive(Default)]
pub struct CameraScene {
    anchors: Arena<Anchor>,
    zones: Arena<Zone>,
    fallback_anchor: Option<AnchorId>,
}

impl CameraScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from its serialized description
    pub fn from_description(description: &SceneDescription) -> Result<Self, CameraError> {
        let mut scene = Self::new();
        let mut anchor_ids = HashMap::new();

        for anchor in &description.anchors {
            if anchor_ids.contains_key(anchor.name.as_str()) {
                return Err(CameraError::DuplicateName {
                    kind: "anchor",
                    name: anchor.name.clone(),
                });
            }
            let id = scene.add_anchor(anchor.to_anchor());
            anchor_ids.insert(anchor.name.as_str(), id);
        }

        let mut zone_names = HashSet::new();
        for zone in &description.zones {
            if !zone_names.insert(zone.name.as_str()) {
                return Err(CameraError::DuplicateName {
                    kind: "zone",
                    name: zone.name.clone(),
                });
            }

            let id = scene.add_zone(zone.name.clone());
            for anchor_name in &zone.anchors {
                let Some(&anchor) = anchor_ids.get(anchor_name.as_str()) else {
                    return Err(CameraError::UnknownAnchor {
                        zone: zone.name.clone(),
                        anchor: anchor_name.clone(),
                    });
                };
                scene.attach_anchor(id, anchor);
            }
            scene.set_zone_active(id, zone.active);
        }

        if let Some(name) = &description.fallback_anchor {
            let Some(&anchor) = anchor_ids.get(name.as_str()) else {
                return Err(CameraError::UnknownFallbackAnchor(name.clone()));
            };
            scene.set_fallback_anchor(Some(anchor));
        }

        debug!(
            "Built camera scene with {} zones and {} anchors",
            scene.zones.len(),
            scene.anchors.len()
        );
        Ok(scene)
    }

    pub fn add_anchor(&mut self, anchor: Anchor) -> AnchorId {
        self.anchors.insert(anchor)
    }

    pub fn add_zone(&mut self, name: impl Into<String>) -> ZoneId {
        self.zones.insert(Zone::new(name))
    }

    /// Add a zone together with its anchors (in registration order)
    pub fn add_zone_with_anchors(
        &mut self,
        name: impl Into<String>,
        anchors: impl IntoIterator<Item = Anchor>,
    ) -> (ZoneId, Vec<AnchorId>) {
        let zone = self.add_zone(name);
        let ids: Vec<_> = anchors
            .into_iter()
            .map(|anchor| {
                let id = self.add_anchor(anchor);
                self.attach_anchor(zone, id);
                id
            })
            .collect();
        (zone, ids)
    }

    /// Attach an existing anchor to a zone. Returns `false` if either handle
    /// is stale or the anchor is already attached.
    pub fn attach_anchor(&mut self, zone: ZoneId, anchor: AnchorId) -> bool {
        if !self.anchors.contains(anchor) {
            return false;
        }
        self.zones
            .get_mut(zone)
            .map_or(false, |zone| zone.attach(anchor))
    }

    /// Attach anchors found at activation time (e.g. on child objects).
    ///
    /// Only the first call per zone has any effect. Returns how many anchors
    /// were newly attached.
    pub fn adopt_discovered_anchors(
        &mut self,
        zone: ZoneId,
        discovered: impl IntoIterator<Item = AnchorId>,
    ) -> usize {
        let Some(entry) = self.zones.get_mut(zone) else {
            return 0;
        };
        if entry.discovered {
            return 0;
        }
        entry.discovered = true;

        let mut adopted = 0;
        for anchor in discovered {
            if self.anchors.contains(anchor) && entry.attach(anchor) {
                adopted += 1;
            }
        }
        adopted
    }

    /// Enable or disable a zone's volume. Returns `false` for a stale handle.
    pub fn set_zone_active(&mut self, zone: ZoneId, active: bool) -> bool {
        match self.zones.get_mut(zone) {
            Some(zone) => {
                zone.active = active;
                true
            }
            None => false,
        }
    }

    /// Enable or disable an anchor. Returns `false` for a stale handle.
    pub fn set_anchor_enabled(&mut self, anchor: AnchorId, enabled: bool) -> bool {
        match self.anchors.get_mut(anchor) {
            Some(anchor) => {
                anchor.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Destroy a zone; outstanding handles to it stop resolving
    pub fn remove_zone(&mut self, zone: ZoneId) -> Option<Zone> {
        self.zones.remove(zone)
    }

    /// Destroy an anchor; zones referencing it skip it from now on
    pub fn remove_anchor(&mut self, anchor: AnchorId) -> Option<Anchor> {
        self.anchors.remove(anchor)
    }

    pub fn zone(&self, zone: ZoneId) -> Option<&Zone> {
        self.zones.get(zone)
    }

    pub fn anchor(&self, anchor: AnchorId) -> Option<&Anchor> {
        self.anchors.get(anchor)
    }

    /// Whether a zone exists and is active
    pub fn is_zone_live(&self, zone: ZoneId) -> bool {
        self.zones.get(zone).is_some_and(Zone::is_active)
    }

    /// The zone's best anchor, or `None` if the zone is gone or has no
    /// enabled anchor
    pub fn best_anchor(&self, zone: ZoneId) -> Option<AnchorId> {
        self.zones.get(zone)?.best_anchor(&self.anchors)
    }

    pub fn zone_by_name(&self, name: &str) -> Option<ZoneId> {
        self.zones
            .iter()
            .find(|(_, zone)| zone.name() == name)
            .map(|(id, _)| id)
    }

    pub fn anchor_by_name(&self, name: &str) -> Option<AnchorId> {
        self.anchors
            .iter()
            .find(|(_, anchor)| anchor.name() == name)
            .map(|(id, _)| id)
    }

    /// Shared shot used when no zone yields a candidate
    pub fn fallback_anchor(&self) -> Option<AnchorId> {
        self.fallback_anchor
            .filter(|&id| self.anchors.get(id).is_some_and(Anchor::is_enabled))
    }

    pub fn set_fallback_anchor(&mut self, anchor: Option<AnchorId>) {
        self.fallback_anchor = anchor;
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }
}

fn default_active() -> bool {
    true
}

/// Serialized zone: a name, its anchors by name, and the initial enable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDescription {
    pub name: String,
    #[serde(default)]
    pub anchors: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Serialized camera scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub anchors: Vec<AnchorDescription>,
    #[serde(default)]
    pub zones: Vec<ZoneDescription>,
    #[serde(default)]
    pub fallback_anchor: Option<String>,
}

impl SceneDescription {
    pub fn from_toml_str(content: &str) -> Result<Self, CameraError> {
        Ok(toml::from_str(content)?)
    }
}
