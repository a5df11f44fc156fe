//! Scripted walkthrough: a scene, its trigger volumes and walls, and a
//! sequence of stick inputs for the player

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vantage_camera::{
    CameraDirector, CameraScene, CameraSettings, CameraTransform, SceneDescription,
};
use vantage_core::{CollisionMask, EntityId};
use vantage_physics::PhysicsWorld;

use crate::occupancy::OccupancyTracker;
use crate::walker::{Walker, WalkerConfig};

fn default_frame_rate() -> f32 {
    60.0
}

/// Trigger box for a zone
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeDescription {
    pub zone: String,
    pub center: Vec3,
    pub half_extents: Vec3,
}

/// Solid box that blocks the camera
#[derive(Debug, Clone, Deserialize)]
pub struct WallDescription {
    pub center: Vec3,
    pub half_extents: Vec3,
    #[serde(default)]
    pub groups: CollisionMask,
}

/// Hold a stick input for some time
#[derive(Debug, Clone, Deserialize)]
pub struct WalkStep {
    /// x = right, y = forward
    pub input: Vec2,
    pub seconds: f32,
}

/// A demo file
#[derive(Debug, Clone, Deserialize)]
pub struct DemoFile {
    pub scene: SceneDescription,
    #[serde(default)]
    pub volumes: Vec<VolumeDescription>,
    #[serde(default)]
    pub walls: Vec<WallDescription>,
    #[serde(default)]
    pub walk: Vec<WalkStep>,
    #[serde(default)]
    pub player_start: Vec3,
    #[serde(default)]
    pub walker: WalkerConfig,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
}

impl DemoFile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse demo file")
    }
}

/// One line of demo output
#[derive(Debug, Serialize)]
pub struct FrameRecord<'a> {
    pub frame: u32,
    pub time: f32,
    pub player: Vec3,
    pub zone: Option<&'a str>,
    pub camera: CameraTransform,
}

/// Everything needed to play a demo file
pub struct Demo {
    director: CameraDirector<Walker, PhysicsWorld>,
    occupancy: OccupancyTracker,
    walk: Vec<WalkStep>,
    dt: f32,
    player: EntityId,
}

impl Demo {
    pub fn new(file: DemoFile, settings: CameraSettings) -> Result<Self> {
        let scene =
            CameraScene::from_description(&file.scene).context("Invalid camera scene")?;

        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        for wall in &file.walls {
            world.create_static_box_in(wall.half_extents, wall.center, wall.groups);
        }

        let mut occupancy = OccupancyTracker::new();
        for volume in &file.volumes {
            let zone = scene
                .zone_by_name(&volume.zone)
                .with_context(|| format!("Volume refers to unknown zone '{}'", volume.zone))?;
            let sensor = world.create_sensor_box(volume.half_extents, volume.center);
            occupancy.add_volume(sensor, zone);
        }
        world.update_query_pipeline();

        info!(
            "Demo loaded: {} walls, {} volumes, {} walk steps",
            file.walls.len(),
            file.volumes.len(),
            file.walk.len()
        );

        let player = EntityId::new();
        let walker = Walker::new(file.walker, file.player_start);
        let director = CameraDirector::new(
            settings,
            scene,
            player,
            walker,
            world,
            CameraTransform::default(),
        );

        Ok(Self {
            director,
            occupancy,
            walk: file.walk,
            dt: 1.0 / file.frame_rate.max(1.0),
            player,
        })
    }

    /// Run the script, handing every frame to `emit`
    pub fn run(&mut self, mut emit: impl FnMut(&FrameRecord) -> Result<()>) -> Result<()> {
        self.post_occupancy();
        let start = self.director.start();

        let mut frame = 0;
        self.emit_frame(frame, 0.0, start, &mut emit)?;

        let walk = self.walk.clone();
        for step in &walk {
            let frames = (step.seconds / self.dt).round() as u32;
            debug!("Walking {:?} for {} frames", step.input, frames);

            for _ in 0..frames {
                frame += 1;

                // Player motion first, steered by last frame's camera
                let reference = self.director.current_camera_reference_frame();
                self.director
                    .player_source_mut()
                    .step(&reference, step.input, self.dt);
                self.post_occupancy();

                let camera = self.director.update(self.dt);
                self.emit_frame(frame, frame as f32 * self.dt, camera, &mut emit)?;
            }
        }

        info!(
            "Demo finished after {} frames, player inside {} volume(s)",
            frame,
            self.occupancy.inside().len()
        );
        Ok(())
    }

    fn post_occupancy(&mut self) {
        let position = self.director.player_source().pose().position;
        let events = self
            .occupancy
            .update(self.director.query(), position, self.player);
        for event in events {
            self.director.post(event);
        }
    }

    fn emit_frame(
        &self,
        frame: u32,
        time: f32,
        camera: CameraTransform,
        emit: &mut impl FnMut(&FrameRecord) -> Result<()>,
    ) -> Result<()> {
        let zone = self
            .director
            .active_resolution()
            .and_then(|r| self.director.scene().zone(r.zone))
            .map(|zone| zone.name());

        emit(&FrameRecord {
            frame,
            time,
            player: self.director.player_source().pose().position,
            zone,
            camera,
        })
    }

    pub fn director(&self) -> &CameraDirector<Walker, PhysicsWorld> {
        &self.director
    }
}
