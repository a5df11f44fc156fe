//! Vantage Core - Core types and utilities for the Vantage camera director
//!
//! This crate provides the foundational types shared by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - `Pose` for camera and player placement
//! - Generational handles and arenas for scene-owned data
//! - The scene query trait implemented by the physics layer

pub mod arena;
pub mod query;
pub mod types;

pub use arena::{Arena, Handle};
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
pub use query::{OpenScene, SceneHit, SceneQuery, SurfaceId};
pub use types::{CollisionMask, EntityId, Pose};
