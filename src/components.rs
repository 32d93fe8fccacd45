//! ECS components for the squadron simulation.
//!
//! Components are pure data containers attached to entities.
//! All game logic lives in systems that query these components.

use crate::math::Vec2;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 2D world position.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// 2D velocity vector, in world units per second.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Faction group identifier. Agents of the same faction never target or
/// damage each other. Any number of factions is allowed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FactionId(pub i32);

/// Ship agent stats. Present on every flockable/targetable agent.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ship {
    /// Speed cap applied after steering integration.
    pub max_speed: f32,
}

impl Default for Ship {
    fn default() -> Self {
        Self { max_speed: 10.0 }
    }
}

/// Marker for the player-controlled agent. Player ships skip the flocking
/// engine (their velocity comes from the host via `SimWorld::set_player_velocity`)
/// and act as the flock's seek target.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerTag;

// ============================================================================
// COMBAT COMPONENTS
// ============================================================================

/// Health of an agent.
///
/// `current` may go negative between damage application and the lifecycle
/// sweep of the same tick; destruction happens at the tick's checkpoint, not
/// at the moment damage lands.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Unclamped subtraction; the lifecycle system sweeps entities at <= 0.
    pub fn damage(&mut self, amount: f32) {
        self.current -= amount;
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Projectile parameters carried by a weapon, applied to every projectile it
/// fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub speed: f32,
    pub lifetime: f32,
    pub collision_radius: f32,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            speed: 1.0,
            lifetime: 6.0,
            collision_radius: 1.0,
        }
    }
}

/// Ranged weapon mounted on an agent.
#[derive(Component, Debug, Clone, Copy)]
pub struct Weapon {
    pub attack_range: f32,
    pub damage: f32,
    pub cooldown: f32,
    /// Elapsed-sim-time stamp of the last shot.
    pub last_fire_time: f32,
    /// Resolved by the targeting system each tick; cleared when the handle
    /// goes stale or the target leaves range.
    pub target: Option<Entity>,
    pub projectile: ProjectileSpec,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            attack_range: 8.0,
            damage: 25.0,
            cooldown: 1.0,
            last_fire_time: 0.0,
            target: None,
            projectile: ProjectileSpec::default(),
        }
    }
}

/// In-flight projectile. Created by a weapon, destroyed on first hit or when
/// its `DestroyTimer` expires.
#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    /// Unit flight direction.
    pub direction: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub collision_radius: f32,
    /// Inherited from the firer; same-faction agents are never hit.
    pub faction: i32,
    /// The firing entity, excluded from collision.
    pub fired_by: Entity,
}

/// Destroy the entity once the timer runs out.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DestroyTimer {
    pub remaining: f32,
}

impl DestroyTimer {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }
}

// ============================================================================
// BUNDLE HELPERS
// ============================================================================

/// Bundle for spawning a complete ship agent.
#[derive(Bundle, Default)]
pub struct ShipBundle {
    pub ship: Ship,
    pub faction: FactionId,
    pub position: Position,
    pub velocity: Velocity,
    pub health: Health,
}

impl ShipBundle {
    pub fn new(faction: i32, x: f32, y: f32, max_speed: f32, health: f32) -> Self {
        Self {
            ship: Ship { max_speed },
            faction: FactionId(faction),
            position: Position::new(x, y),
            velocity: Velocity::default(),
            health: Health::new(health),
        }
    }
}
