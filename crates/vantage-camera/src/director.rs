//! Per-frame camera orchestration

use std::collections::VecDeque;

use tracing::{debug, info, warn};
use vantage_core::{CollisionMask, EntityId, Pose, SceneQuery};

use crate::anchor::AnchorId;
use crate::blend::BlendEngine;
use crate::collision::CollisionSafety;
use crate::config::CameraSettings;
use crate::follow::FollowCamera;
use crate::registry::ZoneRegistry;
use crate::resolver::{PriorityResolver, Resolution};
use crate::scene::CameraScene;
use crate::transform::{CameraReferenceFrame, CameraTransform};
use crate::zone::ZoneId;

/// Zone occupancy change reported by the trigger system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyEvent {
    Entered { zone: ZoneId, instigator: EntityId },
    Exited { zone: ZoneId, instigator: EntityId },
}

impl OccupancyEvent {
    pub fn zone(&self) -> ZoneId {
        match *self {
            OccupancyEvent::Entered { zone, .. } | OccupancyEvent::Exited { zone, .. } => zone,
        }
    }

    pub fn instigator(&self) -> EntityId {
        match *self {
            OccupancyEvent::Entered { instigator, .. }
            | OccupancyEvent::Exited { instigator, .. } => instigator,
        }
    }
}

/// Supplies the player's pose each frame
pub trait PlayerPoseSource {
    /// `None` while the player is not spawned or otherwise unavailable
    fn player_pose(&self) -> Option<Pose>;
}

impl PlayerPoseSource for Pose {
    fn player_pose(&self) -> Option<Pose> {
        Some(*self)
    }
}

impl PlayerPoseSource for Option<Pose> {
    fn player_pose(&self) -> Option<Pose> {
        *self
    }
}

/// Owns the camera scene and decides, once per frame, what the camera shows.
///
/// The player pose source and the scene query are handed over at creation;
/// callers mutate them through [`player_source_mut`](Self::player_source_mut)
/// and [`query_mut`](Self::query_mut). Call [`update`](Self::update) after
/// player motion has been applied.
pub struct CameraDirector<P, Q> {
    scene: CameraScene,
    registry: ZoneRegistry,
    resolver: PriorityResolver,
    blend: BlendEngine,
    follow: FollowCamera,
    collision: CollisionSafety,
    player: EntityId,
    player_source: P,
    query: Q,
    pending: VecDeque<OccupancyEvent>,
    current: CameraTransform,
    active: Option<Resolution>,
    player_pose_missing: bool,
}

impl<P: PlayerPoseSource, Q: SceneQuery> CameraDirector<P, Q> {
    pub fn new(
        settings: CameraSettings,
        scene: CameraScene,
        player: EntityId,
        player_source: P,
        query: Q,
        initial: CameraTransform,
    ) -> Self {
        info!(
            "Camera director ready ({} zones, {} anchors)",
            scene.zone_count(),
            scene.anchor_count()
        );

        Self {
            scene,
            registry: ZoneRegistry::new(),
            resolver: PriorityResolver::new(),
            blend: BlendEngine::new(settings.blend),
            follow: FollowCamera::new(settings.follow),
            collision: CollisionSafety::new(settings.collision),
            player,
            player_source,
            query,
            pending: VecDeque::new(),
            current: initial,
            active: None,
            player_pose_missing: false,
        }
    }

    /// Queue an occupancy event; it takes effect at the next update
    pub fn post(&mut self, event: OccupancyEvent) {
        self.pending.push_back(event);
    }

    /// Report that the player entered a zone
    pub fn register_zone(&mut self, zone: ZoneId) {
        self.post(OccupancyEvent::Entered {
            zone,
            instigator: self.player,
        });
    }

    /// Report that the player left a zone
    pub fn unregister_zone(&mut self, zone: ZoneId) {
        self.post(OccupancyEvent::Exited {
            zone,
            instigator: self.player,
        });
    }

    /// Place the camera on its resolved shot immediately, without blending
    pub fn start(&mut self) -> CameraTransform {
        let player_pose = self.observe_player();
        self.apply_pending();
        self.registry.prune(&self.scene);
        self.blend.release();

        self.active = self.resolver.resolve(&self.registry, &self.scene);
        match self.target_anchor() {
            Some(anchor) => {
                if let Some(snapped) = self.blend.snap_to(&self.scene, anchor, player_pose.as_ref())
                {
                    self.current = snapped;
                    self.current = self.step_blend(anchor, player_pose.as_ref(), 0.0);
                }
            }
            None => {
                if let Some(pose) = player_pose {
                    let target = self.follow.target(&self.current, &pose);
                    self.current = self.keep_line_of_sight(&pose, target);
                }
            }
        }

        self.current
    }

    /// Advance the camera by one frame and return the transform to render
    pub fn update(&mut self, dt: f32) -> CameraTransform {
        let player_pose = self.observe_player();

        self.apply_pending();
        self.registry.prune(&self.scene);

        if let Some(active) = self.active {
            if !self.registry.contains(active.zone) {
                debug!("Winning zone {} left the registry", active.zone);
                self.blend.discard_progress();
                self.active = None;
            }
        }

        let resolution = self.resolver.resolve(&self.registry, &self.scene);
        if resolution.map(|r| r.anchor) != self.active.map(|r| r.anchor) {
            match resolution.and_then(|r| self.scene.anchor(r.anchor)) {
                Some(anchor) => debug!("Camera target changed to '{}'", anchor.name()),
                None => debug!("No camera zone candidate"),
            }
        }
        self.active = resolution;

        self.current = match self.target_anchor() {
            Some(anchor) => self.step_blend(anchor, player_pose.as_ref(), dt),
            None => {
                if self.blend.target().is_some() {
                    self.blend.release();
                }
                match player_pose {
                    Some(pose) => {
                        let next = self.follow.step(&self.current, &pose, dt);
                        self.keep_line_of_sight(&pose, next)
                    }
                    None => self.current,
                }
            }
        };

        self.current
    }

    pub fn current_camera_transform(&self) -> CameraTransform {
        self.current
    }

    pub fn current_camera_reference_frame(&self) -> CameraReferenceFrame {
        self.current.reference_frame()
    }

    /// The zone and anchor that won the last resolution
    pub fn active_resolution(&self) -> Option<Resolution> {
        self.active
    }

    pub fn scene(&self) -> &CameraScene {
        &self.scene
    }

    /// Mutable scene access for enabling/disabling zones and anchors
    pub fn scene_mut(&mut self) -> &mut CameraScene {
        &mut self.scene
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn blend(&self) -> &BlendEngine {
        &self.blend
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn player_source(&self) -> &P {
        &self.player_source
    }

    pub fn player_source_mut(&mut self) -> &mut P {
        &mut self.player_source
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut Q {
        &mut self.query
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    pub fn is_player_pose_missing(&self) -> bool {
        self.player_pose_missing
    }

    fn target_anchor(&self) -> Option<AnchorId> {
        self.active
            .map(|r| r.anchor)
            .or_else(|| self.scene.fallback_anchor())
    }

    fn step_blend(&mut self, anchor: AnchorId, player: Option<&Pose>, dt: f32) -> CameraTransform {
        self.blend.step(
            &self.scene,
            anchor,
            &self.current,
            player,
            Some(&self.query as &dyn SceneQuery),
            &self.collision,
            dt,
        )
    }

    fn keep_line_of_sight(&self, player: &Pose, mut transform: CameraTransform) -> CameraTransform {
        let focus = self.collision.focus_point(player.position);
        let desired = transform.position;
        transform.position = self
            .collision
            .resolve(&self.query, focus, desired, CollisionMask::ALL);
        transform
    }

    fn apply_pending(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            if event.instigator() != self.player {
                continue;
            }
            match event {
                OccupancyEvent::Entered { zone, .. } => {
                    if self.registry.register(&self.scene, zone) {
                        debug!("Entered camera zone {}", zone);
                    }
                }
                OccupancyEvent::Exited { zone, .. } => {
                    if self.registry.unregister(zone) {
                        debug!("Exited camera zone {}", zone);
                    }
                }
            }
        }
    }

    fn observe_player(&mut self) -> Option<Pose> {
        let pose = self.player_source.player_pose();
        match (pose.is_some(), self.player_pose_missing) {
            (false, false) => {
                warn!("Player pose unavailable, holding camera");
                self.player_pose_missing = true;
            }
            (true, true) => {
                info!("Player pose available again");
                self.player_pose_missing = false;
            }
            _ => {}
        }
        pose
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::anchor::Anchor;
    use crate::blend::BlendState;
    use vantage_core::OpenScene;

    const DT: f32 = 1.0 / 60.0;

    fn shot(name: &str, x: f32, priority: i32) -> Anchor {
        Anchor::new(name, Pose::looking_at(Vec3::new(x, 5.0, 10.0), Vec3::new(x, 0.0, 0.0)))
            .with_priority(priority)
            .with_blend_duration(0.4)
    }

    fn director(scene: CameraScene) -> CameraDirector<Option<Pose>, OpenScene> {
        CameraDirector::new(
            CameraSettings::default(),
            scene,
            EntityId::new(),
            Some(Pose::default()),
            OpenScene,
            CameraTransform::default(),
        )
    }

    #[test]
    fn test_events_apply_on_update() {
        let mut scene = CameraScene::new();
        let (hall, _) = scene.add_zone_with_anchors("hall", [shot("hall", 0.0, 0)]);
        let mut director = director(scene);

        director.register_zone(hall);
        assert!(director.registry().is_empty());
        assert_eq!(director.pending_events(), 1);

        director.update(DT);
        assert!(director.registry().contains(hall));
        assert_eq!(director.pending_events(), 0);
    }

    #[test]
    fn test_foreign_instigator_ignored() {
        let mut scene = CameraScene::new();
        let (hall, _) = scene.add_zone_with_anchors("hall", [shot("hall", 0.0, 0)]);
        let mut director = director(scene);

        director.post(OccupancyEvent::Entered {
            zone: hall,
            instigator: EntityId::new(),
        });
        director.update(DT);
        assert!(director.registry().is_empty());
        assert_eq!(director.active_resolution(), None);
    }

    #[test]
    fn test_start_snaps_to_resolved_anchor() {
        let mut scene = CameraScene::new();
        let (hall, ids) = scene.add_zone_with_anchors("hall", [shot("hall", 3.0, 0)]);
        let expected = scene.anchor(ids[0]).unwrap().pose();
        let mut director = director(scene);

        director.register_zone(hall);
        let transform = director.start();
        assert_eq!(transform.position, expected.position);
        assert_eq!(transform.rotation, expected.rotation);
        assert_eq!(*director.blend().state(), BlendState::Snapped { target: Some(ids[0]) });
    }

    #[test]
    fn test_empty_registry_runs_follow_camera() {
        let mut director = director(CameraScene::new());
        let transform = director.update(1000.0);
        assert!((transform.position - Vec3::new(0.0, 4.0, 6.0)).length() < 1e-3);
        assert_eq!(director.blend().target(), None);
    }

    #[test]
    fn test_fallback_anchor_used_without_zones() {
        let mut scene = CameraScene::new();
        let overview = scene.add_anchor(shot("overview", 0.0, 0).with_line_of_sight(false));
        scene.set_fallback_anchor(Some(overview));
        let mut director = director(scene);

        director.update(DT);
        assert_eq!(director.blend().target(), Some(overview));
        assert_eq!(director.active_resolution(), None);
    }

    #[test]
    fn test_disabled_winner_pruned_and_blend_restarts() {
        let mut scene = CameraScene::new();
        let (low, low_ids) = scene.add_zone_with_anchors("low", [shot("low", 0.0, 0)]);
        let (high, high_ids) = scene.add_zone_with_anchors("high", [shot("high", 8.0, 5)]);
        let mut director = director(scene);

        director.register_zone(low);
        director.register_zone(high);
        director.start();
        assert_eq!(director.blend().target(), Some(high_ids[0]));

        // Zone switched off without an exit event
        director.scene_mut().set_zone_active(high, false);
        let before = director.current_camera_transform();
        director.update(0.0);

        assert!(!director.registry().contains(high));
        match *director.blend().state() {
            BlendState::Blending { from, to, elapsed, .. } => {
                assert_eq!(from, before);
                assert_eq!(to, low_ids[0]);
                assert_eq!(elapsed, 0.0);
            }
            state => panic!("expected a fresh blend, got {state:?}"),
        }
    }

    #[test]
    fn test_missing_player_holds_follow_camera() {
        let mut director = director(CameraScene::new());
        let placed = director.update(1000.0);

        *director.player_source_mut() = None;
        let held = director.update(DT);
        assert_eq!(held, placed);
        assert!(director.is_player_pose_missing());

        director.update(DT);
        assert!(director.is_player_pose_missing());

        *director.player_source_mut() = Some(Pose::default());
        director.update(DT);
        assert!(!director.is_player_pose_missing());
    }

    #[test]
    fn test_reference_frame_tracks_transform() {
        let mut director = director(CameraScene::new());
        director.update(1000.0);
        let frame = director.current_camera_reference_frame();
        let transform = director.current_camera_transform();
        assert_eq!(frame.forward, transform.forward());
        assert_eq!(frame.right, transform.right());
    }
}
