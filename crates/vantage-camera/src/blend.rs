//! Timed transitions between the rendered camera and the resolved shot

use tracing::debug;
use vantage_core::{Pose, SceneQuery};

use crate::anchor::{Anchor, AnchorId};
use crate::collision::CollisionSafety;
use crate::config::BlendConfig;
use crate::scene::CameraScene;
use crate::transform::CameraTransform;

/// Ease-out cubic: fast start, gentle arrival
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// What the blend engine is currently doing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendState {
    /// Sitting on a shot, or on nothing when the follow camera is in charge
    Snapped { target: Option<AnchorId> },
    /// Moving from a captured transform toward an anchor
    Blending {
        from: CameraTransform,
        to: AnchorId,
        elapsed: f32,
        duration: f32,
    },
}

impl BlendState {
    /// The anchor being tracked, if any
    pub fn target(&self) -> Option<AnchorId> {
        match *self {
            BlendState::Snapped { target } => target,
            BlendState::Blending { to, .. } => Some(to),
        }
    }
}

/// Blends the camera toward the winning anchor.
///
/// A change of target always restarts from the transform that was last
/// rendered; nothing from an interrupted blend carries over.
#[derive(Debug, Clone)]
pub struct BlendEngine {
    config: BlendConfig,
    state: BlendState,
    /// Last evaluated pose of a yaw-following target, reused while the
    /// player pose is unavailable
    held: Option<(AnchorId, Pose)>,
}

impl BlendEngine {
    pub fn new(config: BlendConfig) -> Self {
        Self {
            config,
            state: BlendState::Snapped { target: None },
            held: None,
        }
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    pub fn state(&self) -> &BlendState {
        &self.state
    }

    pub fn target(&self) -> Option<AnchorId> {
        self.state.target()
    }

    pub fn is_blending(&self) -> bool {
        matches!(self.state, BlendState::Blending { .. })
    }

    /// Normalized blend progress in `[0, 1]`; 1 when snapped
    pub fn progress(&self) -> f32 {
        match self.state {
            BlendState::Snapped { .. } => 1.0,
            BlendState::Blending {
                elapsed, duration, ..
            } => (elapsed / duration).clamp(0.0, 1.0),
        }
    }

    /// Hand the camera back to the follow fallback
    pub fn release(&mut self) {
        self.state = BlendState::Snapped { target: None };
        self.held = None;
    }

    /// Forget the tracked target so the next step starts a fresh blend from
    /// the rendered transform
    pub fn discard_progress(&mut self) {
        if let Some(target) = self.state.target() {
            debug!("Discarding blend progress toward {}", target);
            self.state = BlendState::Snapped { target: None };
        }
    }

    /// Jump straight onto an anchor with no blend.
    ///
    /// Returns `None` if the anchor no longer exists.
    pub fn snap_to(
        &mut self,
        scene: &CameraScene,
        target: AnchorId,
        player: Option<&Pose>,
    ) -> Option<CameraTransform> {
        let anchor = scene.anchor(target)?;
        let pose = self.evaluate_target(target, anchor, player);
        self.state = BlendState::Snapped {
            target: Some(target),
        };
        Some(CameraTransform::new(pose, anchor.field_of_view()))
    }

    /// Advance one frame toward `target` and return the transform to render.
    ///
    /// `rendered` is the transform published last frame. Line of sight is
    /// enforced when the anchor asks for it and both a player pose and a
    /// scene query are available.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        scene: &CameraScene,
        target: AnchorId,
        rendered: &CameraTransform,
        player: Option<&Pose>,
        query: Option<&dyn SceneQuery>,
        collision: &CollisionSafety,
        dt: f32,
    ) -> CameraTransform {
        let Some(anchor) = scene.anchor(target) else {
            debug!("Blend target {} no longer exists", target);
            self.release();
            return *rendered;
        };

        let goal_pose = self.evaluate_target(target, anchor, player);
        let goal = CameraTransform::new(goal_pose, anchor.field_of_view());

        if self.state.target() != Some(target) {
            self.begin(target, anchor, rendered, &goal);
        }

        let mut output = self.advance(&goal, dt.max(0.0));

        if anchor.enforce_line_of_sight() {
            if let (Some(player), Some(query)) = (player, query) {
                let focus = collision.focus_point(player.position);
                output.position =
                    collision.resolve(query, focus, output.position, anchor.collision_mask());
            }
        }

        output
    }

    fn begin(
        &mut self,
        target: AnchorId,
        anchor: &Anchor,
        rendered: &CameraTransform,
        goal: &CameraTransform,
    ) {
        let distance = rendered.position.distance(goal.position);
        let duration = if distance > self.config.hard_cut_distance {
            debug!(
                "Hard cut to '{}' ({:.1} units away)",
                anchor.name(),
                distance
            );
            self.config.min_blend_seconds.max(f32::EPSILON)
        } else {
            self.config.duration_for(anchor.blend_duration())
        };

        debug!(
            "Blending to '{}' over {:.3}s (priority {})",
            anchor.name(),
            duration,
            anchor.priority()
        );
        self.state = BlendState::Blending {
            from: *rendered,
            to: target,
            elapsed: 0.0,
            duration,
        };
    }

    fn advance(&mut self, goal: &CameraTransform, dt: f32) -> CameraTransform {
        let BlendState::Blending {
            from,
            to,
            elapsed,
            duration,
        } = self.state
        else {
            return *goal;
        };

        let elapsed = elapsed + dt;
        let t = (elapsed / duration).clamp(0.0, 1.0);
        if t >= 1.0 {
            self.state = BlendState::Snapped { target: Some(to) };
            return *goal;
        }

        self.state = BlendState::Blending {
            from,
            to,
            elapsed,
            duration,
        };

        let eased = ease_out_cubic(t);
        CameraTransform {
            position: from.position.lerp(goal.position, eased),
            rotation: from.rotation.slerp(goal.rotation, eased),
            field_of_view: from.field_of_view + (goal.field_of_view - from.field_of_view) * eased,
        }
    }

    fn evaluate_target(&mut self, id: AnchorId, anchor: &Anchor, player: Option<&Pose>) -> Pose {
        if !anchor.follows_player_yaw() {
            return anchor.pose();
        }

        match player {
            Some(player) => {
                let pose = anchor.evaluate_pose(Some(player));
                self.held = Some((id, pose));
                pose
            }
            None => match self.held {
                Some((held_id, pose)) if held_id == id => pose,
                _ => anchor.pose(),
            },
        }
    }
}
