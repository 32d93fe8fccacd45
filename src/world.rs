//! Snapshot types for exporting simulation state.
//!
//! The `Snapshot` struct provides a serializable view of the simulation state
//! that a host (renderer, recorder, test harness) can consume without touching
//! the ECS world directly.

use crate::components::*;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single ship's state for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub id: u32,
    pub faction: i32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub health: f32,
    pub health_max: f32,
    pub is_player: bool,
}

/// Snapshot of an in-flight projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub x: f32,
    pub y: f32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub faction: i32,
}

/// Complete simulation state snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub time: f32,
    /// All ship states, player included.
    pub ships: Vec<ShipSnapshot>,
    /// All in-flight projectiles.
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &mut World, tick: u64, time: f32) -> Self {
        let mut ships = Vec::new();
        let mut query = world.query::<(
            Entity,
            &FactionId,
            &Position,
            &Velocity,
            &Health,
            Option<&PlayerTag>,
        )>();
        for (entity, faction, pos, vel, health, player) in query.iter(world) {
            ships.push(ShipSnapshot {
                id: entity.index(),
                faction: faction.0,
                x: pos.0.x,
                y: pos.0.y,
                vx: vel.0.x,
                vy: vel.0.y,
                health: health.current,
                health_max: health.max,
                is_player: player.is_some(),
            });
        }

        let mut projectiles = Vec::new();
        let mut proj_query = world.query::<(&Position, &Projectile)>();
        for (pos, proj) in proj_query.iter(world) {
            projectiles.push(ProjectileSnapshot {
                x: pos.0.x,
                y: pos.0.y,
                dir_x: proj.direction.x,
                dir_y: proj.direction.y,
                faction: proj.faction,
            });
        }

        Self {
            tick,
            time,
            ships,
            projectiles,
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn test_snapshot_captures_ships_and_projectiles() {
        let mut world = World::new();
        world.spawn((
            PlayerTag,
            Ship::default(),
            FactionId(0),
            Position::new(1.0, 2.0),
            Velocity::new(0.5, 0.0),
            Health::new(100.0),
        ));
        world.spawn(ShipBundle::new(1, 10.0, 0.0, 8.0, 50.0));
        let firer = world.spawn_empty().id();
        world.spawn((
            Position::new(5.0, 5.0),
            Projectile {
                direction: Vec2::new(0.0, 1.0),
                speed: 1.0,
                damage: 25.0,
                collision_radius: 1.0,
                faction: 1,
                fired_by: firer,
            },
        ));

        let snapshot = Snapshot::from_world(&mut world, 7, 0.5);
        assert_eq!(snapshot.tick, 7);
        assert_eq!(snapshot.ships.len(), 2);
        assert_eq!(snapshot.projectiles.len(), 1);
        assert_eq!(snapshot.ships.iter().filter(|s| s.is_player).count(), 1);
    }

    #[test]
    fn test_snapshot_json_has_expected_fields() {
        let mut world = World::new();
        world.spawn(ShipBundle::new(1, 0.0, 0.0, 10.0, 100.0));

        let json = Snapshot::from_world(&mut world, 0, 0.0).to_json().unwrap();
        assert!(json.contains("ships"));
        assert!(json.contains("projectiles"));
        assert!(json.contains("health_max"));
    }
}
