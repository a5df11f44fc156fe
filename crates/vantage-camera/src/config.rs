//! Camera configuration
//!
//! Settings are read from `~/.config/vantage/camera.toml` by default. Every
//! field is optional in the file; missing values fall back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CameraError;

/// All camera director settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub blend: BlendConfig,
    pub follow: FollowConfig,
    pub collision: CollisionConfig,
}

impl CameraSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vantage"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("camera.toml"))
    }

    /// Load settings from the user config directory, or return defaults if
    /// the file is missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No camera settings file found, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("Loaded camera settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CameraError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, CameraError> {
        Ok(toml::from_str(content)?)
    }
}

/// Shot blending configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Blend time used when an anchor declares none (seconds)
    pub default_blend_seconds: f32,
    /// Shortest allowed blend; also the duration of a hard cut (seconds)
    pub min_blend_seconds: f32,
    /// Start distance above which a blend becomes a hard cut
    pub hard_cut_distance: f32,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            default_blend_seconds: 0.25,
            min_blend_seconds: 0.001,
            hard_cut_distance: 40.0,
        }
    }
}

impl BlendConfig {
    /// Blend duration for an anchor's requested time, never below the minimum
    pub fn duration_for(&self, requested: f32) -> f32 {
        let seconds = if requested > 0.0 {
            requested
        } else {
            self.default_blend_seconds
        };
        seconds.max(self.min_blend_seconds.max(f32::EPSILON))
    }
}

/// Space in which the follow camera offset is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetSpace {
    /// Rotated by the player's orientation (camera stays behind the player)
    #[default]
    PlayerLocal,
    /// Rotated by the camera's current heading
    CameraRelative,
    /// Applied as a world-space offset
    World,
}

/// Fallback follow camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    /// Offset from the player (forward is -Z, so +Z is behind)
    pub offset: Vec3,
    /// Space the offset is applied in
    pub offset_space: OffsetSpace,
    /// Exponential convergence rate for position and field of view (1/s)
    pub position_rate: f32,
    /// Exponential convergence rate for rotation (1/s)
    pub rotation_rate: f32,
    /// Height above the player's feet to look at (chest height)
    pub look_at_height: f32,
    /// Field of view in degrees
    pub field_of_view: f32,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 4.0, 6.0),
            offset_space: OffsetSpace::PlayerLocal,
            position_rate: 8.0,
            rotation_rate: 8.0,
            look_at_height: 1.0,
            field_of_view: 60.0,
        }
    }
}

/// Line-of-sight collision configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Height above the player's feet used as the focus point (eye/chest)
    pub focus_height: f32,
    /// Radius of the swept probe sphere
    pub probe_radius: f32,
    /// Distance kept between the camera and the surface it hit
    pub margin: f32,
    /// Closest the camera may be pulled toward the focus point
    pub min_distance: f32,
    /// Desired positions nearer than this to the focus point are not checked
    pub min_check_distance: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            focus_height: 1.5,
            probe_radius: 0.15,
            margin: 0.05,
            min_distance: 0.5,
            min_check_distance: 0.01,
        }
    }
}
