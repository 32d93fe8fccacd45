//! Squadron Sim - Simulation Core
//!
//! A deterministic, fixed-timestep ECS simulation of flocking ship squadrons
//! with projectile combat. Uses `bevy_ecs` for the entity-component-system
//! architecture.

pub mod api;
pub mod components;
pub mod config;
pub mod math;
pub mod profiler;
pub mod spatial;
pub mod systems;
pub mod world;

pub use api::SimWorld;
pub use components::*;
pub use config::{BoidConfig, CombatConfig, SimConfig, SpawnConfig, WeaponConfig};
pub use math::Vec2;
pub use spatial::SpatialHash;
pub use systems::*;
pub use world::Snapshot;
