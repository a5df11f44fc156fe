//! Vantage Camera - zone-driven third-person camera director
//!
//! Provides camera anchors and zones, the occupancy registry, priority
//! resolution, shot blending with line-of-sight safety, and the follow
//! camera used when no zone is occupied.

pub mod anchor;
pub mod blend;
pub mod collision;
pub mod config;
pub mod director;
pub mod error;
pub mod follow;
pub mod registry;
pub mod resolver;
pub mod scene;
pub mod transform;
pub mod zone;

pub use anchor::{Anchor, AnchorDescription, AnchorId, MAX_FIELD_OF_VIEW, MIN_FIELD_OF_VIEW};
pub use blend::{BlendEngine, BlendState};
pub use collision::CollisionSafety;
pub use config::{BlendConfig, CameraSettings, CollisionConfig, FollowConfig, OffsetSpace};
pub use director::{CameraDirector, OccupancyEvent, PlayerPoseSource};
pub use error::CameraError;
pub use follow::FollowCamera;
pub use registry::{Membership, ZoneRegistry};
pub use resolver::{PriorityResolver, Resolution};
pub use scene::{CameraScene, SceneDescription, ZoneDescription};
pub use transform::{CameraReferenceFrame, CameraTransform};
pub use zone::{Zone, ZoneId};
